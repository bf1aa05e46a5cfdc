//! Deployment group lifecycle
//!
//! Same shape as the channel mapper, additionally carrying the update
//! policy field set through expand and flatten verbatim.

use super::{require_nonempty, resolve_application_id, ProviderClient};
use crate::api::groups::{AddGroupInput, Group, UpdateGroupInput};
use crate::error::Error;

/// Desired and observed attributes of a group resource.
///
/// An empty `id` means the resource has no upstream identity. `Default`
/// encodes the schema defaults for the policy fields.
#[derive(Debug, Clone)]
pub struct GroupState {
    pub id: String,
    /// Name of the group.
    pub name: String,
    /// Owning application; falls back to the provider-level default.
    pub application_id: Option<String>,
    /// A description of the group.
    pub description: String,
    /// The channel this group provides.
    pub channel_id: String,
    /// Identifier for clients; the server defaults it to the group id.
    pub track: String,
    /// Server-computed; true while a rollout is underway.
    pub rollout_in_progress: bool,
    /// Creation timestamp, server-computed.
    pub created_ts: String,
    /// Are updates enabled?
    pub policy_updates_enabled: bool,
    /// Safe mode updates one instance at a time and stops on failure.
    pub policy_safe_mode: bool,
    /// Only update between 9am and 5pm.
    pub policy_office_hours: bool,
    /// Timezone used to inform office hours.
    pub policy_timezone: String,
    /// Period used in combination with the max-updates limit.
    pub policy_period_interval: String,
    /// Maximum updates performed within the period interval.
    pub policy_max_updates_per_period: i64,
    /// Timeout for updates.
    pub policy_update_timeout: String,
}

impl Default for GroupState {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            application_id: None,
            description: String::new(),
            channel_id: String::new(),
            track: String::new(),
            rollout_in_progress: false,
            created_ts: String::new(),
            policy_updates_enabled: true,
            policy_safe_mode: false,
            policy_office_hours: false,
            policy_timezone: String::new(),
            policy_period_interval: "1 minutes".to_string(),
            policy_max_updates_per_period: 9999999,
            policy_update_timeout: "60 minutes".to_string(),
        }
    }
}

/// Create the group and read back its computed attributes.
pub async fn create(client: &ProviderClient, state: &mut GroupState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    require_nonempty("name", &state.name)?;

    let input = AddGroupInput {
        name: state.name.clone(),
        description: state.description.clone(),
        channel_id: state.channel_id.clone(),
        policy_updates_enabled: state.policy_updates_enabled,
        policy_safe_mode: state.policy_safe_mode,
        policy_office_hours: state.policy_office_hours,
        policy_timezone: state.policy_timezone.clone(),
        policy_period_interval: state.policy_period_interval.clone(),
        policy_max_updates_per_period: state.policy_max_updates_per_period,
        policy_update_timeout: state.policy_update_timeout.clone(),
        track: state.track.clone(),
    };

    let group = client.api.add_group(&app_id, &input).await?;
    state.id = group.id;

    read(client, state).await
}

/// Refresh the state from the server.
///
/// A not-found response clears the identity and reports success.
pub async fn read(client: &ProviderClient, state: &mut GroupState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    let group = match client.api.get_group(&app_id, &state.id).await {
        Ok(group) => group,
        Err(Error::NotFound) => {
            state.id.clear();
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    flatten_group(group, state);

    Ok(())
}

/// Update the group's full mutable field set and read back.
pub async fn update(client: &ProviderClient, state: &mut GroupState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;

    require_nonempty("name", &state.name)?;

    let input = UpdateGroupInput {
        name: state.name.clone(),
        description: state.description.clone(),
        channel_id: state.channel_id.clone(),
        policy_updates_enabled: state.policy_updates_enabled,
        policy_safe_mode: state.policy_safe_mode,
        policy_office_hours: state.policy_office_hours,
        policy_timezone: state.policy_timezone.clone(),
        policy_period_interval: state.policy_period_interval.clone(),
        policy_max_updates_per_period: state.policy_max_updates_per_period,
        policy_update_timeout: state.policy_update_timeout.clone(),
        track: state.track.clone(),
    };

    client.api.update_group(&app_id, &state.id, &input).await?;

    read(client, state).await
}

/// Delete the group.
pub async fn delete(client: &ProviderClient, state: &mut GroupState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;

    client.api.delete_group(&app_id, &state.id).await
}

/// Data-source lookup by name.
///
/// Takes the first name match; a truncated listing is fatal.
pub async fn lookup(client: &ProviderClient, state: &mut GroupState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    require_nonempty("name", &state.name)?;

    let page = client.api.list_groups(&app_id).await?;
    if page.count != page.total_count {
        return Err(Error::Truncated {
            resource: "groups",
            count: page.count,
            total_count: page.total_count,
        });
    }

    let name = state.name.clone();
    for group in page.groups {
        if group.name == name {
            state.id = group.id.clone();
            flatten_group(group, state);

            return Ok(());
        }
    }

    Err(Error::LookupMiss(format!("couldn't find group {name}")))
}

fn flatten_group(group: Group, state: &mut GroupState) {
    state.name = group.name;
    state.description = group.description;
    state.created_ts = group.created_ts.to_string();
    state.rollout_in_progress = group.rollout_in_progress;
    state.channel_id = group.channel_id.unwrap_or_default();
    state.policy_updates_enabled = group.policy_updates_enabled;
    state.policy_safe_mode = group.policy_safe_mode;
    state.policy_office_hours = group.policy_office_hours;
    state.policy_timezone = group.policy_timezone;
    state.policy_period_interval = group.policy_period_interval;
    state.policy_max_updates_per_period = group.policy_max_updates_per_period;
    state.policy_update_timeout = group.policy_update_timeout;
    state.track = group.track;
}
