//! Typed client core for managing Nebraska update server resources.
//!
//! Nebraska serves updates to Flatcar Container Linux machines. This crate
//! maps create/read/update/delete operations on three resource kinds -
//! release channels, deployment groups, and software packages - onto REST
//! calls against a Nebraska server, keeping everything strongly typed from
//! the resource state structs down to the wire.
//!
//! # Module Structure
//!
//! - [`config`] - provider configuration and environment sourcing
//! - [`api`] - HTTP transport, wire models, enum codecs, API calls
//! - [`resource`] - per-resource-kind lifecycle mappers
//! - [`error`] - the shared typed error enum
//!
//! # Example
//!
//! ```ignore
//! use nebraska_provider::{Config, ProviderClient};
//! use nebraska_provider::resource::channel::{self, ChannelState};
//!
//! async fn example() -> Result<(), nebraska_provider::Error> {
//!     let client = ProviderClient::new(
//!         &Config::from_env().with_endpoint("http://localhost:8000"),
//!     )?;
//!
//!     let mut state = ChannelState {
//!         name: "stable".to_string(),
//!         arch: "amd64".to_string(),
//!         ..Default::default()
//!     };
//!     channel::create(&client, &mut state).await?;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod resource;

pub use api::client::Client;
pub use config::{Config, DEFAULT_ENDPOINT, FLATCAR_APPLICATION_ID};
pub use error::Error;
pub use resource::ProviderClient;
