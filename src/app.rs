//! Application shell: wires the session, the gate and the views together
//!
//! Opening a path consults the gate with the current session snapshot and,
//! when allowed, mounts the matching view (which fetches on mount).

use std::sync::Arc;

use tracing::{debug, info};

use crate::api::Api;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::gate::{AuthorizationGate, GateDecision, Route};
use crate::models::{Credentials, User};
use crate::session::{SessionState, SessionStore};
use crate::views::{BoardView, ChecklistView, ProjectDetailView, ProjectSidebar, ProjectsView};

/// A mounted page, or the reason none was mounted
pub enum Page {
    Redirect { to: Route, requested: Route },
    NotFound(String),
    Home { sidebar: Option<ProjectSidebar> },
    Login,
    Projects(ProjectsView),
    ProjectDetail(ProjectDetailView),
    Checklist(ChecklistView),
    Board(BoardView),
}

impl Page {
    pub fn route(&self) -> Option<Route> {
        match self {
            Page::Redirect { to, .. } => Some(to.clone()),
            Page::NotFound(_) => None,
            Page::Home { .. } => Some(Route::Home),
            Page::Login => Some(Route::Login),
            Page::Projects(_) => Some(Route::Projects),
            Page::ProjectDetail(view) => Some(Route::ProjectDetail(view.project_id().clone())),
            Page::Checklist(view) => Some(Route::Checklist(view.project_id().clone())),
            Page::Board(view) => Some(Route::Board(view.project_id().clone())),
        }
    }

    /// Tear down whatever views this page mounted
    pub fn unmount(&self) {
        match self {
            Page::Home { sidebar: Some(sidebar) } => sidebar.unmount(),
            Page::Projects(view) => view.unmount(),
            Page::ProjectDetail(view) => view.unmount(),
            Page::Checklist(view) => view.unmount(),
            Page::Board(view) => view.unmount(),
            _ => {}
        }
    }
}

#[derive(Clone)]
pub struct App {
    api: Api,
    session: SessionStore,
    gate: AuthorizationGate,
}

impl App {
    pub fn new(api: Api, gate: AuthorizationGate) -> Self {
        let session = SessionStore::new(Arc::new(api.auth.clone()));
        Self { api, session, gate }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(Api::from_config(config)?, AuthorizationGate::new(&config.session)))
    }

    pub fn api(&self) -> &Api {
        &self.api
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn gate(&self) -> &AuthorizationGate {
        &self.gate
    }

    /// Recover a session left by an earlier login, if the service still has one
    pub async fn start(&self) -> SessionState {
        self.session.restore().await
    }

    /// Log in and return the route to land on
    pub async fn login(&self, credentials: &Credentials, requested: Option<Route>) -> Result<(User, Route), ClientError> {
        let user = self.session.login(credentials).await?;
        Ok((user, self.gate.after_login(requested)))
    }

    pub async fn logout(&self) {
        self.session.logout().await;
    }

    pub async fn open(&self, path: &str) -> Page {
        match Route::parse(path) {
            Some(route) => self.navigate(route).await,
            None => {
                debug!("no page at {}", path);
                Page::NotFound(path.to_string())
            }
        }
    }

    pub async fn navigate(&self, route: Route) -> Page {
        let session = self.session.snapshot();
        let route = match self.gate.check(&session, route) {
            GateDecision::Allow(route) => route,
            GateDecision::Redirect { to, requested } => {
                info!("{} requires login, redirecting to {}", requested, to);
                return Page::Redirect { to, requested };
            }
        };

        match route {
            Route::Home => {
                let sidebar = if session.is_authenticated() {
                    Some(ProjectSidebar::mount(self.api.projects.clone()).await)
                } else {
                    None
                };
                Page::Home { sidebar }
            }
            Route::Login => Page::Login,
            Route::Projects => Page::Projects(ProjectsView::mount(self.api.projects.clone()).await),
            Route::ProjectDetail(id) => {
                Page::ProjectDetail(ProjectDetailView::mount(self.api.projects.clone(), id).await)
            }
            Route::Checklist(id) => Page::Checklist(ChecklistView::mount(self.api.projects.clone(), id).await),
            Route::Board(id) => {
                Page::Board(BoardView::mount(self.api.board.clone(), self.session.clone(), id).await)
            }
        }
    }
}
