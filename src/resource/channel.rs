//! Release channel lifecycle
//!
//! Maps channel state onto the Nebraska API: create, read, update, delete,
//! and the data-source lookup by name and arch.

use super::{require_nonempty, resolve_application_id, ProviderClient};
use crate::api::arch::Arch;
use crate::api::channels::{AddChannelInput, UpdateChannelInput};
use crate::error::Error;

/// Desired and observed attributes of a channel resource.
///
/// An empty `id` means the resource has no upstream identity.
#[derive(Debug, Clone, Default)]
pub struct ChannelState {
    pub id: String,
    /// Name of the channel. Can collide with an existing one as long as the
    /// arch differs.
    pub name: String,
    /// Arch name. Cannot be changed once created.
    pub arch: String,
    /// Owning application; falls back to the provider-level default.
    pub application_id: Option<String>,
    /// Hex color code shown for the channel in the UI.
    pub color: String,
    /// The id of the package this channel provides.
    pub package_id: String,
    /// Creation timestamp, server-computed.
    pub created_ts: String,
}

/// Create the channel and read back its computed attributes.
pub async fn create(client: &ProviderClient, state: &mut ChannelState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    require_nonempty("name", &state.name)?;
    let arch = Arch::from_name(&state.arch)?;

    let input = AddChannelInput {
        name: state.name.clone(),
        color: state.color.clone(),
        package_id: state.package_id.clone(),
        arch,
    };

    let channel = client.api.add_channel(&app_id, &input).await?;
    state.id = channel.id;

    read(client, state).await
}

/// Refresh the state from the server.
///
/// A not-found response clears the identity and reports success, so the
/// caller's reconciliation treats the resource as already gone.
pub async fn read(client: &ProviderClient, state: &mut ChannelState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    let channel = match client.api.get_channel(&app_id, &state.id).await {
        Ok(channel) => channel,
        Err(Error::NotFound) => {
            state.id.clear();
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    state.name = channel.name;
    state.color = channel.color;
    state.created_ts = channel.created_ts.to_string();
    state.package_id = channel.package_id.unwrap_or_default();

    Ok(())
}

/// Update the channel's mutable fields and read back.
///
/// The arch is immutable and not part of the update payload.
pub async fn update(client: &ProviderClient, state: &mut ChannelState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;

    require_nonempty("name", &state.name)?;

    let input = UpdateChannelInput {
        name: state.name.clone(),
        color: state.color.clone(),
        package_id: state.package_id.clone(),
    };

    client.api.update_channel(&app_id, &state.id, &input).await?;

    read(client, state).await
}

/// Delete the channel.
pub async fn delete(client: &ProviderClient, state: &mut ChannelState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;

    client.api.delete_channel(&app_id, &state.id).await
}

/// Data-source lookup by `(name, arch)`.
///
/// Lists all channels of the application and takes the first exact match.
/// A truncated listing is fatal: this client does not paginate, so a
/// partial page could silently hide the match.
pub async fn lookup(client: &ProviderClient, state: &mut ChannelState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    require_nonempty("name", &state.name)?;
    let arch = Arch::from_name(&state.arch)?;

    let page = client.api.list_channels(&app_id).await?;
    if page.count != page.total_count {
        return Err(Error::Truncated {
            resource: "channels",
            count: page.count,
            total_count: page.total_count,
        });
    }

    for channel in page.channels {
        if channel.name == state.name && channel.arch == arch {
            state.id = channel.id;
            state.color = channel.color;
            state.created_ts = channel.created_ts.to_string();
            state.package_id = channel.package_id.unwrap_or_default();

            return Ok(());
        }
    }

    Err(Error::LookupMiss(format!(
        "couldn't find channel {} ({})",
        state.name, state.arch
    )))
}
