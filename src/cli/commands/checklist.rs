use clap::Subcommand;
use serde_json::json;

use super::checklist_view;
use crate::app::App;
use crate::cli::utils::*;
use crate::cli::OutputFormat;
use crate::models::{display_date, ChecklistItem, ChecklistItemPatch, Id, ItemStatus, NewChecklistItem, Priority};
use crate::views::{Listing, Page};

#[derive(Subcommand)]
pub enum ChecklistCommands {
    #[command(about = "List checklist items of a project")]
    List {
        #[arg(help = "Project ID")]
        project: Id,
    },

    #[command(about = "Add a checklist item")]
    Add {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(long, help = "Item title")]
        title: String,
        #[arg(long, help = "Due date (YYYY-MM-DD)")]
        due: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value = "MEDIUM", help = "LOW, MEDIUM or HIGH")]
        priority: Priority,
    },

    #[command(about = "Toggle an item between PENDING and COMPLETED")]
    Toggle {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Item ID")]
        item: Id,
    },

    #[command(about = "Change fields of an item")]
    Set {
        #[arg(help = "Project ID")]
        project: Id,
        #[arg(help = "Item ID")]
        item: Id,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        status: Option<ItemStatus>,
    },
}

pub async fn handle(cmd: ChecklistCommands, app: &App, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ChecklistCommands::List { project } => {
            let view = checklist_view(app, project).await?;
            print_checklist(&output_format, &view.render())
        }
        ChecklistCommands::Add {
            project,
            title,
            due,
            description,
            priority,
        } => {
            let view = checklist_view(app, project).await?;
            let item = view
                .add_item(NewChecklistItem {
                    title,
                    description,
                    due_date: due,
                    priority,
                })
                .await?;
            output_success(
                &output_format,
                &format!("Added '{}' ({})", item.title, item.id),
                Some(json!({ "item": item })),
            )
        }
        ChecklistCommands::Toggle { project, item } => {
            let view = checklist_view(app, project).await?;
            let item = view.toggle(&item).await?;
            output_success(
                &output_format,
                &format!("'{}' is now {}", item.title, item.status.as_str()),
                Some(json!({ "item": item })),
            )?;
            if let OutputFormat::Text = output_format {
                print_checklist(&output_format, &view.render())?;
            }
            Ok(())
        }
        ChecklistCommands::Set {
            project,
            item,
            title,
            description,
            due,
            priority,
            status,
        } => {
            let view = checklist_view(app, project).await?;
            let patch = ChecklistItemPatch {
                title,
                description,
                due_date: due,
                priority,
                status,
            };
            let item = view.update_item(&item, patch).await?;
            output_success(
                &output_format,
                &format!("Updated '{}'", item.title),
                Some(json!({ "item": item })),
            )
        }
    }
}

pub fn print_checklist(output_format: &OutputFormat, page: &Page<Listing<ChecklistItem>>) -> anyhow::Result<()> {
    if page.body.is_empty_placeholder() {
        return output_empty_collection(output_format, "items", "No checklist items yet");
    }

    output_page(output_format, page, |body| match body {
        Listing::Loading => println!("Loading..."),
        Listing::Unavailable => println!("Checklist is unavailable"),
        Listing::Empty => println!("No checklist items yet"),
        Listing::Items(items) => {
            for item in items {
                let mark = if item.is_completed() { "x" } else { " " };
                println!(
                    "[{}] {:<36} {:<7} {:<12} ({})",
                    mark,
                    cell(&item.title, 36),
                    item.priority.as_str(),
                    item.due_date.as_deref().map(display_date).unwrap_or_default(),
                    item.id,
                );
            }
            let done = items.iter().filter(|item| item.is_completed()).count();
            println!("{}/{} completed", done, items.len());
        }
    })
}
