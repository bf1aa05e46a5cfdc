//! Resource mappers
//!
//! Translation between the typed state structs a provider works with and
//! the Nebraska wire model. Each resource kind gets the same lifecycle
//! surface: `create`, `read`, `update`, `delete`, plus a read-only `lookup`
//! for data sources. Operations take a mutable state struct and write the
//! observed attributes back into it; an empty `id` means the resource has
//! no upstream identity.
//!
//! # Module Structure
//!
//! - [`channel`] - release channel lifecycle
//! - [`group`] - deployment group lifecycle
//! - [`package`] - software package lifecycle

pub mod channel;
pub mod group;
pub mod package;

use crate::api::client::Client;
use crate::config::Config;
use crate::error::Error;

/// The client handle passed to every resource operation: the API client
/// plus the provider-level default application id.
#[derive(Clone)]
pub struct ProviderClient {
    pub api: Client,
    pub application_id: Option<String>,
}

impl ProviderClient {
    /// Create a provider client from the given configuration.
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            api: Client::new(config)?,
            application_id: config.application_id.clone(),
        })
    }
}

/// Resolve the application id owning a resource.
///
/// An explicit per-resource value wins over the provider-level default;
/// having neither is a fatal input error.
pub(crate) fn resolve_application_id(
    explicit: Option<&str>,
    client: &ProviderClient,
) -> Result<String, Error> {
    if let Some(id) = explicit {
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }
    if let Some(id) = client.application_id.as_deref() {
        if !id.is_empty() {
            return Ok(id.to_string());
        }
    }

    Err(Error::Validation(
        "application_id: required field is not set".to_string(),
    ))
}

/// Validate that a required string attribute is non-empty.
pub(crate) fn require_nonempty(field: &'static str, value: &str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::Validation(format!(
            "{field}: required field is not set"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_client(application_id: Option<&str>) -> ProviderClient {
        let mut config = Config::default();
        config.application_id = application_id.map(str::to_string);
        ProviderClient::new(&config).unwrap()
    }

    #[test]
    fn explicit_id_wins_over_default() {
        let client = provider_client(Some("default-app"));
        let id = resolve_application_id(Some("explicit-app"), &client).unwrap();
        assert_eq!(id, "explicit-app");
    }

    #[test]
    fn falls_back_to_client_default() {
        let client = provider_client(Some("default-app"));
        let id = resolve_application_id(None, &client).unwrap();
        assert_eq!(id, "default-app");
    }

    #[test]
    fn empty_explicit_id_falls_through() {
        let client = provider_client(Some("default-app"));
        let id = resolve_application_id(Some(""), &client).unwrap();
        assert_eq!(id, "default-app");
    }

    #[test]
    fn missing_id_is_fatal() {
        let client = provider_client(None);
        let err = resolve_application_id(None, &client).unwrap_err();
        assert_eq!(err.to_string(), "application_id: required field is not set");
    }
}
