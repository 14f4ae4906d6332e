pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::app::App;
use crate::error::ClientError;
use crate::models::Credentials;

#[derive(Parser)]
#[command(name = "projectdesk")]
#[command(about = "Projectdesk CLI - projects, checklists and discussion boards")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, env = "PROJECTDESK_API_URL", help = "Base URL of the project service API")]
    pub api_url: Option<String>,

    #[arg(long, global = true, env = "PROJECTDESK_USERNAME", help = "Log in as this user before running the command")]
    pub username: Option<String>,

    #[arg(long, global = true, env = "PROJECTDESK_PASSWORD", hide_env_values = true, help = "Password for --username")]
    pub password: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Login, logout and current identity")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Project management")]
    Project {
        #[command(subcommand)]
        cmd: commands::project::ProjectCommands,
    },

    #[command(about = "Per-project checklists")]
    Checklist {
        #[command(subcommand)]
        cmd: commands::checklist::ChecklistCommands,
    },

    #[command(about = "Per-project discussion board")]
    Board {
        #[command(subcommand)]
        cmd: commands::board::BoardCommands,
    },

    #[command(about = "Open a client path (e.g. /projects/42/board) and print the page")]
    Open {
        #[arg(help = "Client path")]
        path: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

impl Cli {
    /// Credentials from the global flags, when both are present
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let credentials = cli.credentials();

    let mut config = crate::config::config().clone();
    if let Some(api_url) = cli.api_url {
        config.api.base_url = api_url;
    }
    let app = App::from_config(&config)?;

    let json_errors = matches!(output_format, OutputFormat::Json);
    let result = match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &app, credentials, output_format).await,
        Commands::Project { cmd } => {
            commands::start_session(&app, credentials).await?;
            commands::project::handle(cmd, &app, output_format).await
        }
        Commands::Checklist { cmd } => {
            commands::start_session(&app, credentials).await?;
            commands::checklist::handle(cmd, &app, output_format).await
        }
        Commands::Board { cmd } => {
            commands::start_session(&app, credentials).await?;
            commands::board::handle(cmd, &app, output_format).await
        }
        Commands::Open { path } => {
            commands::start_session(&app, credentials).await?;
            commands::open::handle(&path, &app, output_format).await
        }
    };

    // Scripted callers get a machine-readable error on stdout as well
    if let Err(e) = &result {
        if let (true, Some(client_error)) = (json_errors, e.downcast_ref::<ClientError>()) {
            utils::output_error(&OutputFormat::Json, &client_error.message(), Some(client_error.error_code()))?;
        }
    }
    result
}
