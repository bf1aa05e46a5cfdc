//! Configuration Management
//!
//! An explicit configuration struct threaded into the client at
//! construction time. Values are sourced from environment variables and
//! overridable programmatically; explicit values win over the environment.

use std::env;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// The id that the default Flatcar application is created with.
pub const FLATCAR_APPLICATION_ID: &str = "e96281a6-d1af-4bde-9a0a-97b76e56dc57";

const DEFAULT_USER_AGENT: &str = concat!("nebraska-provider/", env!("CARGO_PKG_VERSION"));

/// Provider configuration.
///
/// All fields are optional; unset fields fall back to their defaults at
/// client construction. Basic credentials take precedence over the bearer
/// token when both are present.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Address of the Nebraska server.
    pub endpoint: Option<String>,
    /// Username for HTTP Basic authentication.
    pub username: Option<String>,
    /// Password for HTTP Basic authentication.
    pub password: Option<String>,
    /// Bearer token, used when Basic credentials are not configured.
    pub bearer_token: Option<String>,
    /// Default application to create resources for. If unset, every
    /// resource must carry its own `application_id`.
    pub application_id: Option<String>,
    /// User-Agent header sent with every request.
    pub user_agent: Option<String>,
}

impl Config {
    /// Build a configuration from the `NEBRASKA_*` environment variables.
    ///
    /// Empty variables are treated as unset.
    pub fn from_env() -> Self {
        Self {
            endpoint: env_var("NEBRASKA_ENDPOINT"),
            username: env_var("NEBRASKA_USERNAME"),
            password: env_var("NEBRASKA_PASSWORD"),
            bearer_token: env_var("NEBRASKA_BEARER_TOKEN"),
            application_id: env_var("NEBRASKA_APPLICATION_ID"),
            user_agent: None,
        }
    }

    /// Set the endpoint, overriding any environment value.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    /// Set Basic credentials, overriding any environment values.
    pub fn with_basic_auth(mut self, username: &str, password: &str) -> Self {
        self.username = Some(username.to_string());
        self.password = Some(password.to_string());
        self
    }

    /// Set a bearer token, overriding any environment value.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    /// Set the default application id, overriding any environment value.
    pub fn with_application_id(mut self, id: &str) -> Self {
        self.application_id = Some(id.to_string());
        self
    }

    /// Set the User-Agent header value.
    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }

    /// Get the effective endpoint (configured > default).
    pub fn effective_endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    /// Get the effective User-Agent (configured > default).
    pub fn effective_user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

fn env_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(v) if !v.is_empty() => Some(v),
        _ => None,
    }
}
