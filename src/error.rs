// Client Error Types
use serde_json::Value;
use thiserror::Error;

/// Failure of a remote call or of a client-side check, normalized so that
/// every variant carries a non-empty human-readable message
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    // Network unreachable, connection refused, broken body stream
    #[error("{0}")]
    Transport(String),

    // Non-2xx response, with the service's error body when it sent one
    #[error("{message}")]
    Service {
        status: u16,
        payload: Option<Value>,
        message: String,
    },

    // Required field missing, caught before any request is issued
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    // 2xx response whose body does not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build a service error from a non-2xx status and its raw body
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let payload = if body.iter().all(u8::is_ascii_whitespace) {
            None
        } else {
            // A non-JSON body is still the service's payload, kept as a string
            Some(
                serde_json::from_slice::<Value>(body)
                    .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned())),
            )
        };

        let message = payload
            .as_ref()
            .and_then(payload_message)
            .unwrap_or_else(|| generic_message(status));

        ClientError::Service {
            status,
            payload,
            message,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ClientError::Transport("Network Error".to_string())
        } else {
            ClientError::Transport(message)
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn required(field: &'static str) -> Self {
        Self::validation(field, format!("{} is required", field))
    }

    /// Client-safe message, never empty
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// HTTP status for service errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Service { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Error body exactly as the service sent it
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ClientError::Service { payload, .. } => payload.as_ref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Stable code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Service { .. } => "SERVICE_ERROR",
            ClientError::Validation { .. } => "VALIDATION_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
        }
    }
}

fn generic_message(status: u16) -> String {
    format!("Request failed with status code {}", status)
}

/// Pick the human-readable part of a service error body
fn payload_message(payload: &Value) -> Option<String> {
    let text = match payload {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| payload.to_string()),
        Value::Null => return None,
        other => other.to_string(),
    };

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::transport(format!("Invalid request URL: {}", err))
    }
}
