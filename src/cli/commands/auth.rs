use clap::Subcommand;
use serde_json::json;

use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::Credentials;
use crate::session::SessionState;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login and show where the client would land")]
    Login {
        #[arg(help = "Username (defaults to --username)")]
        username: Option<String>,
        #[arg(long, help = "Password (defaults to --password)")]
        password: Option<String>,
    },

    #[command(about = "Logout from the service")]
    Logout,

    #[command(about = "Show current user information")]
    Whoami,
}

pub async fn handle(
    cmd: AuthCommands,
    app: &App,
    credentials: Option<Credentials>,
    output_format: OutputFormat,
) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { username, password } => {
            let credentials = login_credentials(username, password, credentials)?;

            let (user, landing) = app.login(&credentials, None).await?;
            output_success(
                &output_format,
                &format!("Logged in as {} ({})", user.name, user.id),
                Some(json!({ "user": user, "landing": landing.path() })),
            )
        }
        AuthCommands::Logout => {
            app.start().await;
            app.logout().await;
            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Whoami => {
            super::start_session(app, credentials).await?;
            match app.session().snapshot() {
                SessionState::Authenticated(user) => match output_format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&json!({ "user": user }))?);
                        Ok(())
                    }
                    OutputFormat::Text => {
                        println!("{} ({})", user.name, user.id);
                        Ok(())
                    }
                },
                SessionState::Anonymous => anyhow::bail!("Not logged in"),
            }
        }
    }
}

/// Merge `auth login` arguments with the global `--username`/`--password`
fn login_credentials(
    username: Option<String>,
    password: Option<String>,
    global: Option<Credentials>,
) -> anyhow::Result<Credentials> {
    let (global_username, global_password) = global.map(|c| (c.username, c.password)).unzip();
    let Some(username) = username.or(global_username) else {
        anyhow::bail!("No username given: pass it as an argument or with --username");
    };
    let Some(password) = password.or(global_password) else {
        anyhow::bail!("No password given for {}: pass --password", username);
    };
    Ok(Credentials::new(username, password))
}
