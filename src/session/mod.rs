//! Session store
//!
//! Holds the authenticated identity for the current run. The store is an
//! explicitly passed handle: clone it into whatever needs the session, read
//! immutable snapshots, and mutate only through [`SessionStore::login`] and
//! [`SessionStore::logout`] (plus [`SessionStore::restore`] at startup).

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::models::{Credentials, User};

/// Remote identity service the store delegates to
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<User, ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;
    async fn current_user(&self) -> Result<User, ClientError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl SessionState {
    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

#[derive(Clone)]
pub struct SessionStore {
    identity: Arc<dyn IdentityService>,
    state: Arc<watch::Sender<SessionState>>,
}

impl SessionStore {
    pub fn new(identity: Arc<dyn IdentityService>) -> Self {
        let (state, _) = watch::channel(SessionState::Anonymous);
        Self {
            identity,
            state: Arc::new(state),
        }
    }

    /// Immutable copy of the session for one render
    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Authenticate against the identity service
    ///
    /// On failure the session is left as it was and the service's error is
    /// returned as-is.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        credentials.validate()?;

        let user = self.identity.login(credentials).await?;
        info!("session started for {} ({})", user.name, user.id);
        self.state.send_replace(SessionState::Authenticated(user.clone()));
        Ok(user)
    }

    /// End the session; local state always returns to anonymous
    pub async fn logout(&self) {
        if let Err(e) = self.identity.logout().await {
            warn!("remote logout failed, ending local session anyway: {}", e);
        }
        self.state.send_replace(SessionState::Anonymous);
        info!("session ended");
    }

    /// Recover an existing session at startup
    pub async fn restore(&self) -> SessionState {
        let next = match self.identity.current_user().await {
            Ok(user) => {
                info!("restored session for {} ({})", user.name, user.id);
                SessionState::Authenticated(user)
            }
            Err(e) => {
                debug!("no session to restore: {}", e);
                SessionState::Anonymous
            }
        };
        self.state.send_replace(next.clone());
        next
    }
}
