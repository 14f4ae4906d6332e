//! Resource client modules
//!
//! One thin wrapper per resource family over a shared [`ApiClient`]. Errors
//! are never swallowed: non-2xx responses surface the service's error body,
//! everything else a non-empty transport message.

pub mod auth;
pub mod board;
pub mod client;
pub mod projects;

pub use auth::AuthApi;
pub use board::BoardApi;
pub use client::ApiClient;
pub use projects::ProjectsApi;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// All resource modules over one transport
#[derive(Clone)]
pub struct Api {
    pub client: ApiClient,
    pub auth: AuthApi,
    pub projects: ProjectsApi,
    pub board: BoardApi,
}

impl Api {
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: AuthApi::new(client.clone()),
            projects: ProjectsApi::new(client.clone()),
            board: BoardApi::new(client.clone()),
            client,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::new(ApiClient::from_config(config)?))
    }
}
