//! Authorization gate
//!
//! Consulted before any view mounts. Two session states, anonymous and
//! authenticated; a protected route is only ever allowed in the latter.

use std::fmt;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;

use crate::config::SessionConfig;
use crate::models::Id;
use crate::session::SessionState;

/// Characters escaped when an id is written into a client path
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", content = "projectId", rename_all = "snake_case")]
pub enum Route {
    Home,
    Login,
    Projects,
    ProjectDetail(Id),
    Checklist(Id),
    Board(Id),
}

impl Route {
    /// Match a client path; unknown paths yield `None`. Ids come back
    /// percent-decoded.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["projects"] => Some(Route::Projects),
            ["projects", id] => Some(Route::ProjectDetail(decode_id(id))),
            ["projects", id, "checklist"] => Some(Route::Checklist(decode_id(id))),
            ["projects", id, "board"] => Some(Route::Board(decode_id(id))),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Projects => "/projects".to_string(),
            Route::ProjectDetail(id) => format!("/projects/{}", encode_id(id)),
            Route::Checklist(id) => format!("/projects/{}/checklist", encode_id(id)),
            Route::Board(id) => format!("/projects/{}/board", encode_id(id)),
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Home | Route::Login)
    }

    pub fn project_id(&self) -> Option<&Id> {
        match self {
            Route::ProjectDetail(id) | Route::Checklist(id) | Route::Board(id) => Some(id),
            _ => None,
        }
    }
}

fn decode_id(segment: &str) -> Id {
    Id::from(percent_decode_str(segment).decode_utf8_lossy().into_owned())
}

fn encode_id(id: &Id) -> String {
    utf8_percent_encode(&id.to_string(), SEGMENT).to_string()
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow(Route),
    Redirect { to: Route, requested: Route },
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allow(_))
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    replay_after_login: bool,
    landing: Route,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self {
            replay_after_login: false,
            landing: Route::Projects,
        }
    }
}

impl AuthorizationGate {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            replay_after_login: config.replay_after_login,
            ..Self::default()
        }
    }

    pub fn with_replay(mut self, replay: bool) -> Self {
        self.replay_after_login = replay;
        self
    }

    pub fn check(&self, session: &SessionState, route: Route) -> GateDecision {
        if route.is_protected() && !session.is_authenticated() {
            GateDecision::Redirect {
                to: Route::Login,
                requested: route,
            }
        } else {
            GateDecision::Allow(route)
        }
    }

    /// Where to go once a login succeeds
    pub fn after_login(&self, requested: Option<Route>) -> Route {
        match requested {
            Some(route) if self.replay_after_login && route != Route::Login => route,
            _ => self.landing.clone(),
        }
    }
}
