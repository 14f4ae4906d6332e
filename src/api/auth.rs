use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::client::ApiClient;
use crate::error::ClientError;
use crate::models::{Credentials, User};
use crate::session::IdentityService;

/// Identity service calls: /auth/login, /auth/logout, /auth/me
#[derive(Clone)]
pub struct AuthApi {
    client: ApiClient,
}

/// The service answers either with the bare user or with `{ user, token }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IdentityResponse {
    Session {
        user: User,
        #[serde(default)]
        token: Option<String>,
    },
    Bare(User),
}

impl IdentityResponse {
    pub fn into_parts(self) -> (User, Option<String>) {
        match self {
            IdentityResponse::Session { user, token } => (user, token),
            IdentityResponse::Bare(user) => (user, None),
        }
    }
}

impl AuthApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a session; a returned token is installed on
    /// the shared transport
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        credentials.validate()?;

        let response: IdentityResponse = self.client.post(&["auth", "login"], credentials).await?;
        let (user, token) = response.into_parts();

        if token.is_some() {
            debug!("installing bearer token for user {}", user.id);
        }
        self.client.set_token(token).await;

        Ok(user)
    }

    /// End the session; the local token is dropped even if the call fails
    pub async fn logout(&self) -> Result<(), ClientError> {
        let result = self.client.post_empty(&["auth", "logout"]).await;
        self.client.set_token(None).await;
        result
    }

    pub async fn current_user(&self) -> Result<User, ClientError> {
        let response: IdentityResponse = self.client.get(&["auth", "me"]).await?;
        Ok(response.into_parts().0)
    }
}

#[async_trait]
impl IdentityService for AuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        AuthApi::login(self, credentials).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        AuthApi::logout(self).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        AuthApi::current_user(self).await
    }
}
