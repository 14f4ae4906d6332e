//! Page-level views
//!
//! Each view owns its data lifecycle, exposes the user actions of its page,
//! and renders a markup-free model of what the page shows.

pub mod board;
pub mod checklist;
pub mod project_detail;
pub mod projects;
pub mod sidebar;

pub use board::{BoardView, CommentCard, PostCard};
pub use checklist::ChecklistView;
pub use project_detail::{DetailBody, ProjectDetailView};
pub use projects::ProjectsView;
pub use sidebar::{ProjectSidebar, SidebarModel};

use serde::Serialize;

use crate::lifecycle::LoadState;

/// What a view renders, plus the inline error message if any
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<B> {
    pub body: B,
    pub notice: Option<String>,
}

/// Body of a collection page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "items", rename_all = "snake_case")]
pub enum Listing<T> {
    Loading,
    /// Nothing loaded and the load failed; the notice says why
    Unavailable,
    /// Loaded, zero entries: the placeholder state
    Empty,
    Items(Vec<T>),
}

impl<T> Listing<T> {
    pub fn from_state<S>(state: &LoadState<Vec<S>>, map: impl Fn(&S) -> T) -> Self {
        match &state.data {
            Some(items) if items.is_empty() => Listing::Empty,
            Some(items) => Listing::Items(items.iter().map(map).collect()),
            None if state.loading => Listing::Loading,
            None if state.error.is_some() => Listing::Unavailable,
            None => Listing::Loading,
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            Listing::Items(items) => items,
            _ => &[],
        }
    }

    pub fn is_empty_placeholder(&self) -> bool {
        matches!(self, Listing::Empty)
    }
}

pub(crate) fn notice_of<T>(state: &LoadState<T>) -> Option<String> {
    state.notice().map(str::to_string)
}
