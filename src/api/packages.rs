//! Software packages
//!
//! Wire model and API calls for packages: the package type codec, the
//! optional nested Flatcar action record, and the version-filtered search.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::arch::Arch;
use super::client::Client;
use crate::error::Error;

/// The package types that Nebraska supports, in wire-code order.
///
/// Wire codes are 1-based: `flatcar` is 1, `other` is 4.
pub const VALID_PACKAGE_TYPES: &[&str] = &["flatcar", "docker", "rkt", "other"];

/// The type of a package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PackageType {
    /// A Flatcar update payload.
    Flatcar = 1,
    /// A docker container.
    Docker = 2,
    /// An rkt container.
    Rocket = 3,
    /// A generic package.
    Other = 4,
}

impl PackageType {
    /// Parse a package type from its name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        VALID_PACKAGE_TYPES
            .iter()
            .position(|v| *v == name)
            .and_then(|i| Self::try_from(i as u8 + 1).ok())
            .ok_or_else(|| Error::InvalidPackageType(name.to_string()))
    }

    /// The name of this package type.
    pub fn as_str(self) -> &'static str {
        VALID_PACKAGE_TYPES[self as usize - 1]
    }
}

impl TryFrom<u8> for PackageType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(PackageType::Flatcar),
            2 => Ok(PackageType::Docker),
            3 => Ok(PackageType::Rocket),
            4 => Ok(PackageType::Other),
            other => Err(Error::InvalidPackageType(other.to_string())),
        }
    }
}

impl From<PackageType> for u8 {
    fn from(t: PackageType) -> u8 {
        t as u8
    }
}

impl std::fmt::Display for PackageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A package in Nebraska.
#[derive(Debug, Clone, Deserialize)]
pub struct Package {
    pub id: String,
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub version: String,
    pub url: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Byte size, string-encoded by the server.
    #[serde(default)]
    pub size: Option<String>,
    /// Base64 encoded content hash.
    #[serde(default)]
    pub hash: Option<String>,
    pub created_ts: DateTime<Utc>,
    /// Channels (by id) that cannot point to this package.
    #[serde(default)]
    pub channels_blacklist: Option<Vec<String>>,
    pub application_id: String,
    #[serde(default)]
    pub flatcar_action: Option<FlatcarAction>,
    pub arch: Arch,
}

/// Flatcar-specific Omaha action metadata attached to a package.
#[derive(Debug, Clone, Deserialize)]
pub struct FlatcarAction {
    pub id: String,
    pub event: String,
    pub chromeos_version: String,
    pub sha256: String,
    pub needs_admin: bool,
    pub is_delta: bool,
    pub disable_payload_backoff: bool,
    pub metadata_signature_rsa: String,
    pub metadata_size: String,
    pub deadline: String,
    pub created_ts: DateTime<Utc>,
}

/// One page of a package listing.
#[derive(Debug, Clone, Deserialize)]
pub struct PackagePage {
    pub count: i64,
    pub total_count: i64,
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// The supported arguments when assigning a Flatcar action to a package.
///
/// The sha256 is the only field accepted on write; everything else on
/// [`FlatcarAction`] is computed by the server.
#[derive(Debug, Clone, Serialize)]
pub struct FlatcarActionInput {
    pub sha256: String,
}

/// The supported arguments when adding a package.
#[derive(Debug, Clone, Serialize)]
pub struct AddPackageInput {
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub version: String,
    pub url: String,
    pub filename: String,
    pub description: String,
    pub size: String,
    pub hash: String,
    pub channels_blacklist: Vec<String>,
    pub arch: Arch,
    pub flatcar_action: FlatcarActionInput,
}

/// The supported arguments when updating a package.
#[derive(Debug, Clone, Serialize)]
pub struct UpdatePackageInput {
    #[serde(rename = "type")]
    pub package_type: PackageType,
    pub version: String,
    pub url: String,
    pub filename: String,
    pub description: String,
    pub size: String,
    pub hash: String,
    pub channels_blacklist: Vec<String>,
    pub arch: Arch,
    pub flatcar_action: FlatcarActionInput,
}

impl Client {
    /// Retrieve a package by its id.
    pub async fn get_package(&self, app_id: &str, id: &str) -> Result<Package, Error> {
        self.get_json(&format!("/api/apps/{app_id}/packages/{id}"))
            .await
    }

    /// List the packages of an application whose version matches the filter.
    pub async fn search_packages(&self, app_id: &str, version: &str) -> Result<PackagePage, Error> {
        self.get_json(&format!(
            "/api/apps/{app_id}/packages?searchVersion={}",
            urlencoding::encode(version)
        ))
        .await
    }

    /// Add a new package.
    pub async fn add_package(
        &self,
        app_id: &str,
        input: &AddPackageInput,
    ) -> Result<Package, Error> {
        self.post_json(&format!("/api/apps/{app_id}/packages"), input)
            .await
    }

    /// Update an existing package.
    pub async fn update_package(
        &self,
        app_id: &str,
        id: &str,
        input: &UpdatePackageInput,
    ) -> Result<Package, Error> {
        self.put_json(&format!("/api/apps/{app_id}/packages/{id}"), input)
            .await
    }

    /// Delete a package.
    pub async fn delete_package(&self, app_id: &str, id: &str) -> Result<(), Error> {
        self.delete(&format!("/api/apps/{app_id}/packages/{id}"))
            .await
    }
}
