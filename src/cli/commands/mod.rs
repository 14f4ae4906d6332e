pub mod auth;
pub mod board;
pub mod checklist;
pub mod open;
pub mod project;

use anyhow::Context;
use tracing::debug;

use crate::app::{App, Page};
use crate::gate::Route;
use crate::models::{Credentials, Id};
use crate::views::{BoardView, ChecklistView, ProjectDetailView, ProjectsView};

/// Log in with the global credentials, or pick up an existing session
pub async fn start_session(app: &App, credentials: Option<Credentials>) -> anyhow::Result<()> {
    match credentials {
        Some(credentials) => {
            let user = app
                .session()
                .login(&credentials)
                .await
                .context("Login failed")?;
            debug!("logged in as {}", user.name);
        }
        None => {
            app.start().await;
        }
    }
    Ok(())
}

/// Navigate through the gate; a redirect becomes an error for one-shot commands
pub async fn open_route(app: &App, route: Route) -> anyhow::Result<Page> {
    match app.navigate(route).await {
        Page::Redirect { requested, to } => Err(anyhow::anyhow!(
            "Login required to open {} (redirected to {}); pass --username and --password",
            requested,
            to
        )),
        page => Ok(page),
    }
}

pub async fn projects_view(app: &App) -> anyhow::Result<ProjectsView> {
    match open_route(app, Route::Projects).await? {
        Page::Projects(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for {}", Route::Projects),
    }
}

pub async fn project_view(app: &App, project_id: Id) -> anyhow::Result<ProjectDetailView> {
    match open_route(app, Route::ProjectDetail(project_id)).await? {
        Page::ProjectDetail(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for project detail"),
    }
}

pub async fn checklist_view(app: &App, project_id: Id) -> anyhow::Result<ChecklistView> {
    match open_route(app, Route::Checklist(project_id)).await? {
        Page::Checklist(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for checklist"),
    }
}

pub async fn board_view(app: &App, project_id: Id) -> anyhow::Result<BoardView> {
    match open_route(app, Route::Board(project_id)).await? {
        Page::Board(view) => Ok(view),
        _ => anyhow::bail!("unexpected page for board"),
    }
}
