use serde_json::json;

use super::board::print_board;
use super::checklist::print_checklist;
use super::project::{print_project, print_projects};
use crate::app::{App, Page};
use crate::cli::utils::*;
use crate::cli::OutputFormat;

/// Open a client path the way the browser would and print what it shows
pub async fn handle(path: &str, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    let page = app.open(path).await;
    let result = print(&page, &output_format);
    page.unmount();
    result
}

fn print(page: &Page, output_format: &OutputFormat) -> anyhow::Result<()> {
    match page {
        Page::Redirect { to, requested } => {
            output_success(
                output_format,
                &format!("{} requires login, redirected to {}", requested, to),
                Some(json!({ "redirect": to.path(), "requested": requested.path() })),
            )
        }
        Page::NotFound(path) => anyhow::bail!("No page at {}", path),
        Page::Home { sidebar: None } => {
            output_success(output_format, "Welcome! Log in to see your projects", None)
        }
        Page::Home { sidebar: Some(sidebar) } => {
            let model = sidebar.render();
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "sidebar": model }))?);
                }
                OutputFormat::Text => {
                    println!("In progress");
                    for project in &model.in_progress {
                        println!("  {} ({})", project.name, project.id);
                    }
                    println!("Completed");
                    for project in &model.completed {
                        println!("  {} ({})", project.name, project.id);
                    }
                }
            }
            Ok(())
        }
        Page::Login => output_success(output_format, "Login page", None),
        Page::Projects(view) => print_projects(output_format, &view.render()),
        Page::ProjectDetail(view) => print_project(output_format, &view.render()),
        Page::Checklist(view) => print_checklist(output_format, &view.render()),
        Page::Board(view) => print_board(output_format, &view.render()),
    }
}
