use serde::{Deserialize, Serialize};

use super::{Id, Snapshot};
use crate::error::ClientError;

/// Authenticated identity, owned by the identity service
pub type User = Snapshot<UserData>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.username.trim().is_empty() {
            return Err(ClientError::required("username"));
        }
        if self.password.is_empty() {
            return Err(ClientError::required("password"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_require_both_fields() {
        assert!(Credentials::new("alice", "secret").validate().is_ok());

        let err = Credentials::new("  ", "secret").validate().unwrap_err();
        assert!(matches!(err, ClientError::Validation { field: "username", .. }));

        let err = Credentials::new("alice", "").validate().unwrap_err();
        assert!(matches!(err, ClientError::Validation { field: "password", .. }));
    }
}
