use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the client authenticates against the RT host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RtAuth {
    /// Username/password form login against the auth endpoint.
    Credentials { username: String, password: String },
    /// Token from the RT::Authen::Token extension.
    Token(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RtConfig {
    /// Base URL of the host RT system, e.g. `https://rt.host.com/`.
    pub base_url: String,
    /// Endpoint the login form is POSTed to.
    pub auth_endpoint: String,
    /// Root of the REST 2.0 API, relative to `base_url`.
    pub api_endpoint: String,
    pub auth: RtAuth,
    pub timeout: Duration,
    /// Skip TLS certificate verification. RT installations behind internal
    /// CAs are common; off unless explicitly requested.
    pub accept_invalid_certs: bool,
}

impl RtConfig {
    pub fn new(base_url: impl Into<String>, auth: RtAuth) -> Self {
        Self {
            base_url: base_url.into(),
            auth_endpoint: "NoAuth/Login.html".to_string(),
            api_endpoint: "REST/2.0/".to_string(),
            auth,
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }

    pub fn with_credentials(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self::new(
            base_url,
            RtAuth::Credentials {
                username: username.into(),
                password: password.into(),
            },
        )
    }

    pub fn with_token(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(base_url, RtAuth::Token(token.into()))
    }

    pub fn with_auth_endpoint(mut self, auth_endpoint: impl Into<String>) -> Self {
        self.auth_endpoint = auth_endpoint.into();
        self
    }

    pub fn with_api_endpoint(mut self, api_endpoint: impl Into<String>) -> Self {
        self.api_endpoint = api_endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("Base URL cannot be empty".to_string());
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err("Base URL must start with http:// or https://".to_string());
        }

        if self.api_endpoint.is_empty() {
            return Err("API endpoint cannot be empty".to_string());
        }

        if self.timeout.is_zero() {
            return Err("Timeout must be greater than 0".to_string());
        }

        if let RtAuth::Credentials { username, .. } = &self.auth {
            if username.is_empty() {
                return Err("Username cannot be empty".to_string());
            }
        }
        if let RtAuth::Token(token) = &self.auth {
            if token.is_empty() {
                return Err("Auth token cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// `base_url` with a guaranteed trailing slash.
    pub(crate) fn base(&self) -> String {
        if self.base_url.ends_with('/') {
            self.base_url.clone()
        } else {
            format!("{}/", self.base_url)
        }
    }
}
