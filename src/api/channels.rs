//! Release channels
//!
//! Wire model and API calls for channels, scoped under an application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::arch::Arch;
use super::client::Client;
use crate::error::Error;

/// A release channel in Nebraska.
#[derive(Debug, Clone, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_ts: DateTime<Utc>,
    pub application_id: String,
    /// Absent when the channel does not point at a package yet.
    #[serde(default)]
    pub package_id: Option<String>,
    pub arch: Arch,
}

/// One page of a channel listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPage {
    pub count: i64,
    pub total_count: i64,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// The supported arguments when adding a channel.
#[derive(Debug, Clone, Serialize)]
pub struct AddChannelInput {
    pub name: String,
    pub color: String,
    pub package_id: String,
    pub arch: Arch,
}

/// The supported arguments when updating a channel.
///
/// The arch is immutable after creation and deliberately absent here.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateChannelInput {
    pub name: String,
    pub color: String,
    pub package_id: String,
}

impl Client {
    /// Retrieve a channel by its id.
    pub async fn get_channel(&self, app_id: &str, id: &str) -> Result<Channel, Error> {
        self.get_json(&format!("/api/apps/{app_id}/channels/{id}"))
            .await
    }

    /// List the channels of an application.
    pub async fn list_channels(&self, app_id: &str) -> Result<ChannelPage, Error> {
        self.get_json(&format!("/api/apps/{app_id}/channels")).await
    }

    /// Add a new channel.
    pub async fn add_channel(
        &self,
        app_id: &str,
        input: &AddChannelInput,
    ) -> Result<Channel, Error> {
        self.post_json(&format!("/api/apps/{app_id}/channels"), input)
            .await
    }

    /// Update an existing channel.
    pub async fn update_channel(
        &self,
        app_id: &str,
        id: &str,
        input: &UpdateChannelInput,
    ) -> Result<Channel, Error> {
        self.put_json(&format!("/api/apps/{app_id}/channels/{id}"), input)
            .await
    }

    /// Remove a channel.
    pub async fn delete_channel(&self, app_id: &str, id: &str) -> Result<(), Error> {
        self.delete(&format!("/api/apps/{app_id}/channels/{id}"))
            .await
    }
}
