//! Deployment groups
//!
//! Wire model and API calls for groups. A group subscribes a cohort of
//! update clients to a channel and carries the update policy that rate
//! limits and schedules their updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::client::Client;
use crate::error::Error;

/// A deployment group in Nebraska.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_ts: DateTime<Utc>,
    /// Server-computed; true while a rollout is underway for this group.
    pub rollout_in_progress: bool,
    pub application_id: String,
    #[serde(default)]
    pub channel_id: Option<String>,
    pub policy_updates_enabled: bool,
    pub policy_safe_mode: bool,
    pub policy_office_hours: bool,
    pub policy_timezone: String,
    pub policy_period_interval: String,
    pub policy_max_updates_per_period: i64,
    pub policy_update_timeout: String,
    /// Client-facing identifier; the server defaults it to the group id.
    pub track: String,
}

/// One page of a group listing.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupPage {
    pub count: i64,
    pub total_count: i64,
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// The supported arguments when adding a group.
#[derive(Debug, Clone, Serialize)]
pub struct AddGroupInput {
    pub name: String,
    pub description: String,
    pub channel_id: String,
    pub policy_updates_enabled: bool,
    pub policy_safe_mode: bool,
    pub policy_office_hours: bool,
    pub policy_timezone: String,
    pub policy_period_interval: String,
    pub policy_max_updates_per_period: i64,
    pub policy_update_timeout: String,
    pub track: String,
}

/// The supported arguments when updating a group.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateGroupInput {
    pub name: String,
    pub description: String,
    pub channel_id: String,
    pub policy_updates_enabled: bool,
    pub policy_safe_mode: bool,
    pub policy_office_hours: bool,
    pub policy_timezone: String,
    pub policy_period_interval: String,
    pub policy_max_updates_per_period: i64,
    pub policy_update_timeout: String,
    pub track: String,
}

impl Client {
    /// Retrieve a group by its id.
    pub async fn get_group(&self, app_id: &str, id: &str) -> Result<Group, Error> {
        self.get_json(&format!("/api/apps/{app_id}/groups/{id}"))
            .await
    }

    /// List the groups of an application.
    pub async fn list_groups(&self, app_id: &str) -> Result<GroupPage, Error> {
        self.get_json(&format!("/api/apps/{app_id}/groups")).await
    }

    /// Add a new group.
    pub async fn add_group(&self, app_id: &str, input: &AddGroupInput) -> Result<Group, Error> {
        self.post_json(&format!("/api/apps/{app_id}/groups"), input)
            .await
    }

    /// Update an existing group.
    pub async fn update_group(
        &self,
        app_id: &str,
        id: &str,
        input: &UpdateGroupInput,
    ) -> Result<Group, Error> {
        self.put_json(&format!("/api/apps/{app_id}/groups/{id}"), input)
            .await
    }

    /// Delete a group.
    pub async fn delete_group(&self, app_id: &str, id: &str) -> Result<(), Error> {
        self.delete(&format!("/api/apps/{app_id}/groups/{id}")).await
    }
}
