//! Software package lifecycle
//!
//! The package mapper adds two nested-structure concerns on top of the
//! channel/group shape: the channels blacklist, copied verbatim into the
//! request, and the optional Flatcar action record, of which only the
//! sha256 is accepted on write.

use super::{require_nonempty, resolve_application_id, ProviderClient};
use crate::api::arch::Arch;
use crate::api::packages::{
    AddPackageInput, FlatcarAction, FlatcarActionInput, Package, PackageType, UpdatePackageInput,
};
use crate::error::Error;
use url::Url;

/// Desired and observed attributes of a package resource.
///
/// An empty `id` means the resource has no upstream identity.
#[derive(Debug, Clone)]
pub struct PackageState {
    pub id: String,
    /// Package version.
    pub version: String,
    /// URL where the package is available.
    pub url: String,
    /// Package arch name. Cannot be changed once created.
    pub arch: String,
    /// Package type name.
    pub package_type: String,
    /// Owning application; falls back to the provider-level default.
    pub application_id: Option<String>,
    /// The filename of the package.
    pub filename: String,
    /// A description of the package.
    pub description: String,
    /// The size, in bytes, string-encoded.
    pub size: String,
    /// A base64 encoded sha1 hash of the package digest.
    pub hash: String,
    /// Channels (by id) that cannot point to this package.
    pub channels_blacklist: Vec<String>,
    /// Flatcar-specific Omaha action attached to the package.
    pub flatcar_action: Option<FlatcarActionState>,
    /// Creation timestamp, server-computed.
    pub created_ts: String,
}

impl Default for PackageState {
    fn default() -> Self {
        Self {
            id: String::new(),
            version: String::new(),
            url: String::new(),
            arch: Arch::All.as_str().to_string(),
            package_type: PackageType::Flatcar.as_str().to_string(),
            application_id: None,
            filename: String::new(),
            description: String::new(),
            size: String::new(),
            hash: String::new(),
            channels_blacklist: Vec::new(),
            flatcar_action: None,
            created_ts: String::new(),
        }
    }
}

/// Observed attributes of a package's Flatcar action.
///
/// Only the sha256 is sent on write; everything else is server-computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatcarActionState {
    pub id: String,
    pub event: String,
    pub chromeos_version: String,
    /// A base64 encoded sha256 hash of the action.
    pub sha256: String,
    pub needs_admin: bool,
    pub is_delta: bool,
    pub disable_payload_backoff: bool,
    pub metadata_signature_rsa: String,
    pub metadata_size: String,
    pub deadline: String,
    pub created_ts: String,
}

/// Create the package and read back its computed attributes.
pub async fn create(client: &ProviderClient, state: &mut PackageState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    let (arch, package_type) = validate_inputs(state)?;

    let input = AddPackageInput {
        package_type,
        version: state.version.clone(),
        url: state.url.clone(),
        filename: state.filename.clone(),
        description: state.description.clone(),
        size: state.size.clone(),
        hash: state.hash.clone(),
        channels_blacklist: state.channels_blacklist.clone(),
        arch,
        flatcar_action: FlatcarActionInput {
            sha256: expand_flatcar_action_sha256(state.flatcar_action.as_ref()),
        },
    };

    let package = client.api.add_package(&app_id, &input).await?;
    state.id = package.id;

    read(client, state).await
}

/// Refresh the state from the server.
///
/// A not-found response clears the identity and reports success.
pub async fn read(client: &ProviderClient, state: &mut PackageState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    let package = match client.api.get_package(&app_id, &state.id).await {
        Ok(package) => package,
        Err(Error::NotFound) => {
            state.id.clear();
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    flatten_package(package, state);

    Ok(())
}

/// Update the package's full mutable field set and read back.
pub async fn update(client: &ProviderClient, state: &mut PackageState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    let (arch, package_type) = validate_inputs(state)?;

    let input = UpdatePackageInput {
        package_type,
        version: state.version.clone(),
        url: state.url.clone(),
        filename: state.filename.clone(),
        description: state.description.clone(),
        size: state.size.clone(),
        hash: state.hash.clone(),
        channels_blacklist: state.channels_blacklist.clone(),
        arch,
        flatcar_action: FlatcarActionInput {
            sha256: expand_flatcar_action_sha256(state.flatcar_action.as_ref()),
        },
    };

    client.api.update_package(&app_id, &state.id, &input).await?;

    read(client, state).await
}

/// Delete the package.
pub async fn delete(client: &ProviderClient, state: &mut PackageState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;

    client.api.delete_package(&app_id, &state.id).await
}

/// Data-source lookup by `(version, arch)`.
///
/// Fetches a version-filtered page and takes the first exact match; a
/// truncated page is fatal.
pub async fn lookup(client: &ProviderClient, state: &mut PackageState) -> Result<(), Error> {
    let app_id = resolve_application_id(state.application_id.as_deref(), client)?;
    state.application_id = Some(app_id.clone());

    require_nonempty("version", &state.version)?;
    let arch = Arch::from_name(&state.arch)?;

    let page = client.api.search_packages(&app_id, &state.version).await?;
    if page.count != page.total_count {
        return Err(Error::Truncated {
            resource: "packages",
            count: page.count,
            total_count: page.total_count,
        });
    }

    for package in page.packages {
        if package.version == state.version && package.arch == arch {
            state.id = package.id.clone();
            flatten_package(package, state);

            return Ok(());
        }
    }

    Err(Error::LookupMiss(format!(
        "couldn't find package {} ({})",
        state.version, state.arch
    )))
}

/// Validate and convert everything that must be checked before any network
/// call is made.
fn validate_inputs(state: &PackageState) -> Result<(Arch, PackageType), Error> {
    require_nonempty("version", &state.version)?;
    require_nonempty("url", &state.url)?;

    let valid_scheme = Url::parse(&state.url)
        .map(|u| u.scheme() == "http" || u.scheme() == "https")
        .unwrap_or(false);
    if !valid_scheme {
        return Err(Error::Validation(format!(
            "url: not an HTTP or HTTPS URL: {}",
            state.url
        )));
    }

    let arch = Arch::from_name(&state.arch)?;
    let package_type = PackageType::from_name(&state.package_type)?;

    Ok((arch, package_type))
}

/// The sha256 to send for the configured Flatcar action; empty when no
/// action is configured.
fn expand_flatcar_action_sha256(action: Option<&FlatcarActionState>) -> String {
    action.map(|a| a.sha256.clone()).unwrap_or_default()
}

/// Map a server-side Flatcar action into state attributes, timestamps
/// rendered as strings.
fn flatten_flatcar_action(action: Option<FlatcarAction>) -> Option<FlatcarActionState> {
    action.map(|action| FlatcarActionState {
        id: action.id,
        event: action.event,
        chromeos_version: action.chromeos_version,
        sha256: action.sha256,
        needs_admin: action.needs_admin,
        is_delta: action.is_delta,
        disable_payload_backoff: action.disable_payload_backoff,
        metadata_signature_rsa: action.metadata_signature_rsa,
        metadata_size: action.metadata_size,
        deadline: action.deadline,
        created_ts: action.created_ts.to_string(),
    })
}

fn flatten_package(package: Package, state: &mut PackageState) {
    state.package_type = package.package_type.as_str().to_string();
    state.version = package.version;
    state.url = package.url;
    state.filename = package.filename.unwrap_or_default();
    state.description = package.description.unwrap_or_default();
    state.size = package.size.unwrap_or_default();
    state.hash = package.hash.unwrap_or_default();
    state.created_ts = package.created_ts.to_string();
    state.channels_blacklist = package.channels_blacklist.unwrap_or_default();
    state.flatcar_action = flatten_flatcar_action(package.flatcar_action);
    state.arch = package.arch.as_str().to_string();
}
