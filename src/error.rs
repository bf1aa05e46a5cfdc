//! Error types
//!
//! A single typed error enum shared by the transport client, the enum
//! codecs, and the resource mappers. Every failure is surfaced to the
//! caller as the operation's outcome; nothing is retried or swallowed.

use thiserror::Error;

/// Errors returned by the Nebraska client core.
#[derive(Debug, Error)]
pub enum Error {
    /// An arch string outside the supported set.
    #[error("invalid/unsupported arch: {0}")]
    InvalidArch(String),

    /// A package type string outside the supported set.
    #[error("invalid/unsupported package type: {0}")]
    InvalidPackageType(String),

    /// Input failed validation before any network call was made.
    #[error("{0}")]
    Validation(String),

    /// The server returned a 404 for the requested resource.
    ///
    /// Read operations translate this into "clear identity, report success";
    /// every other operation propagates it as a normal failure.
    #[error("nebraska: not found")]
    NotFound,

    /// A non-2xx, non-404 response.
    #[error("bad response: req_uri={url}, response_code={status}, response={body}")]
    BadResponse {
        url: String,
        status: u16,
        body: String,
    },

    /// A list response was silently truncated by server-side pagination.
    ///
    /// This client has no pagination loop, so a partial page is fatal.
    #[error("GET {resource} returned {count}/{total_count} {resource}. We don't paginate.")]
    Truncated {
        resource: &'static str,
        count: i64,
        total_count: i64,
    },

    /// A data-source scan found no entry under the requested keys.
    ///
    /// Distinct from [`Error::NotFound`], which denotes a previously-known
    /// resource that has since been deleted upstream.
    #[error("{0}")]
    LookupMiss(String),

    /// The underlying HTTP transport failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// A response body could not be decoded as JSON.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
