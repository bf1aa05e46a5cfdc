//! Nebraska API interaction module
//!
//! This module provides the core functionality for talking to a Nebraska
//! update server: the HTTP transport client, the typed wire models, and the
//! per-resource API calls.
//!
//! # Module Structure
//!
//! - [`client`] - HTTP transport client with authentication
//! - [`arch`] - architecture enum codec
//! - [`channels`] - release channel model and API calls
//! - [`groups`] - deployment group model and API calls
//! - [`packages`] - software package model and API calls
//!
//! # Example
//!
//! ```ignore
//! use nebraska_provider::api::client::Client;
//! use nebraska_provider::config::Config;
//!
//! async fn example() -> Result<(), nebraska_provider::Error> {
//!     let client = Client::new(&Config::from_env())?;
//!     let page = client.list_channels("e96281a6-d1af-4bde-9a0a-97b76e56dc57").await?;
//!     Ok(())
//! }
//! ```

pub mod arch;
pub mod channels;
pub mod client;
pub mod groups;
pub mod packages;
