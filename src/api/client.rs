use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Shared HTTP transport for every resource module
///
/// Cheap to clone; clones share the connection pool, the cookie jar and the
/// bearer token installed at login. Every call issues a fresh request: no
/// caching, no retries, no timeouts.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<String>>,
    request_logging: bool,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::build(base_url, true)
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::build(&config.api.base_url, config.api.enable_request_logging)
    }

    fn build(base_url: &str, request_logging: bool) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::transport(format!("Invalid API base URL: {}", base_url)));
        }

        let http = reqwest::Client::builder().cookie_store(true).build()?;

        Ok(Self {
            inner: Arc::new(Inner {
                http,
                base_url,
                token: RwLock::new(None),
                request_logging,
            }),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    pub async fn set_token(&self, token: Option<String>) {
        *self.inner.token.write().await = token;
    }

    pub async fn has_token(&self) -> bool {
        self.inner.token.read().await.is_some()
    }

    /// Resolve path segments against the base URL, percent-encoding each one
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::transport(format!("Invalid API base URL: {}", self.inner.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let body = self.send::<()>(Method::GET, segments, None).await?;
        decode(&body)
    }

    pub async fn post<B, T>(&self, segments: &[&str], payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::POST, segments, Some(payload)).await?;
        decode(&body)
    }

    /// POST without a request body, ignoring whatever the service answers
    pub async fn post_empty(&self, segments: &[&str]) -> Result<(), ClientError> {
        self.send::<()>(Method::POST, segments, None).await?;
        Ok(())
    }

    pub async fn put<B, T>(&self, segments: &[&str], payload: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.send(Method::PUT, segments, Some(payload)).await?;
        decode(&body)
    }

    pub async fn delete(&self, segments: &[&str]) -> Result<(), ClientError> {
        self.send::<()>(Method::DELETE, segments, None).await?;
        Ok(())
    }

    /// Issue one request and return the raw 2xx body, or the normalized
    /// service error for anything else
    async fn send<B>(&self, method: Method, segments: &[&str], payload: Option<&B>) -> Result<Vec<u8>, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        if self.inner.request_logging {
            debug!("{} {}", method, url);
        }

        let mut request = self.inner.http.request(method.clone(), url.clone());
        if let Some(token) = self.inner.token.read().await.as_deref() {
            request = request.bearer_auth(token);
        }
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        if self.inner.request_logging {
            debug!("{} {} -> {}", method, url, status);
        }

        if status.is_success() {
            Ok(body)
        } else {
            Err(service_error(status, &body))
        }
    }
}

fn service_error(status: StatusCode, body: &[u8]) -> ClientError {
    ClientError::from_response(status.as_u16(), body)
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ClientError> {
    // An empty 2xx body decodes as JSON null, so `()` and `Option<_>` accept it
    if body.iter().all(u8::is_ascii_whitespace) {
        return serde_json::from_value(serde_json::Value::Null).map_err(ClientError::from);
    }
    serde_json::from_slice(body).map_err(ClientError::from)
}
