//! HTTP Basic credentials for the management API

use crate::error::{
    Error,
    Result,
};
use reqwest::RequestBuilder;
use std::fmt;

/// Username/password pair sent with every management API request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting an empty username
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        let credentials = Self {
            username: username.into(),
            password: password.into(),
        };
        credentials.validate()?;
        Ok(credentials)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::AuthError("Username cannot be empty".to_string()));
        }
        if self.username.contains(':') {
            return Err(Error::AuthError(
                "Username cannot contain ':' in basic auth".to_string(),
            ));
        }
        Ok(())
    }

    /// Attach an `Authorization: Basic ...` header to the request
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }
}

impl Default for Credentials {
    /// The broker's stock `guest`/`guest` account
    fn default() -> Self {
        Self {
            username: "guest".to_string(),
            password: "guest".to_string(),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}
