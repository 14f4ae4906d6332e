use clap::Subcommand;
use serde_json::json;

use super::{project_view, projects_view};
use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{display_date, Id, Project, ProjectInput, ProjectStatus};
use crate::views::{DetailBody, Listing, Page};

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List all projects")]
    List,

    #[command(about = "Show one project")]
    Show {
        #[arg(help = "Project ID")]
        id: Id,
    },

    #[command(about = "Create a project")]
    Create {
        #[arg(long, help = "Project name")]
        name: String,
        #[arg(long, default_value = "", help = "Description")]
        description: String,
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        start: String,
        #[arg(long, help = "End date (YYYY-MM-DD)")]
        end: String,
    },

    #[command(about = "Update a project; unset fields keep their current value")]
    Update {
        #[arg(help = "Project ID")]
        id: Id,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long, help = "Status, e.g. IN_PROGRESS or COMPLETED")]
        status: Option<ProjectStatus>,
    },

    #[command(about = "Delete a project")]
    Delete {
        #[arg(help = "Project ID")]
        id: Id,
    },
}

pub async fn handle(cmd: ProjectCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProjectCommands::List => {
            let view = projects_view(app).await?;
            print_projects(&output_format, &view.render())
        }
        ProjectCommands::Show { id } => {
            let view = project_view(app, id).await?;
            print_project(&output_format, &view.render())
        }
        ProjectCommands::Create {
            name,
            description,
            start,
            end,
        } => {
            let view = projects_view(app).await?;
            let project = view
                .create(ProjectInput {
                    name,
                    description,
                    start_date: start,
                    end_date: end,
                    status: None,
                })
                .await?;

            output_success(
                &output_format,
                &format!("Project '{}' created ({})", project.name, project.id),
                Some(json!({ "project": project })),
            )?;
            if let OutputFormat::Text = output_format {
                print_projects(&output_format, &view.render())?;
            }
            Ok(())
        }
        ProjectCommands::Update {
            id,
            name,
            description,
            start,
            end,
            status,
        } => {
            let view = project_view(app, id.clone()).await?;
            let Some(mut form) = view.edit_form() else {
                anyhow::bail!("Project {} not found", id);
            };
            if let Some(name) = name {
                form.name = name;
            }
            if let Some(description) = description {
                form.description = description;
            }
            if let Some(start) = start {
                form.start_date = start;
            }
            if let Some(end) = end {
                form.end_date = end;
            }
            form.status = status;

            let project = view.update(form).await?;
            output_success(
                &output_format,
                &format!("Project '{}' updated", project.name),
                Some(json!({ "project": project })),
            )
        }
        ProjectCommands::Delete { id } => {
            let view = project_view(app, id.clone()).await?;
            let next = view.delete().await?;
            output_success(
                &output_format,
                &format!("Project {} deleted", id),
                Some(json!({ "next": next.path() })),
            )
        }
    }
}

pub fn print_projects(output_format: &OutputFormat, page: &Page<Listing<Project>>) -> anyhow::Result<()> {
    if page.body.is_empty_placeholder() {
        return output_empty_collection(output_format, "projects", "No projects yet");
    }

    output_page(output_format, page, |body| match body {
        Listing::Loading => println!("Loading..."),
        Listing::Unavailable => println!("Projects are unavailable"),
        Listing::Empty => println!("No projects yet"),
        Listing::Items(projects) => {
            println!("{:<12} {:<30} {:<12} {:<12} {}", "ID", "NAME", "STATUS", "START", "END");
            println!("{}", "-".repeat(80));
            for project in projects {
                println!(
                    "{:<12} {:<30} {:<12} {:<12} {}",
                    cell(&project.id.to_string(), 12),
                    cell(&project.name, 30),
                    project.status.as_ref().map(ProjectStatus::as_str).unwrap_or("-"),
                    project.start_date.as_deref().map(display_date).unwrap_or_default(),
                    project.end_date.as_deref().map(display_date).unwrap_or_default(),
                );
            }
        }
    })
}

pub fn print_project(output_format: &OutputFormat, page: &Page<DetailBody>) -> anyhow::Result<()> {
    output_page(output_format, page, |body| match body {
        DetailBody::Loading => println!("Loading..."),
        DetailBody::NotFound => println!("Project not found"),
        DetailBody::Project(project) => {
            println!("{} ({})", project.name, project.id);
            if let Some(status) = &project.status {
                println!("Status: {}", status.as_str());
            }
            if let Some(description) = project.description.as_deref().filter(|d| !d.is_empty()) {
                println!("Description: {}", description);
            }
            println!(
                "Period: {} - {}",
                project.start_date.as_deref().map(display_date).unwrap_or_default(),
                project.end_date.as_deref().map(display_date).unwrap_or_default(),
            );
            println!("Checklist: /projects/{}/checklist", project.id);
            println!("Board: /projects/{}/board", project.id);
        }
    })
}
