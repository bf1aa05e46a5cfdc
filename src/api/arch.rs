//! Architecture enum codec
//!
//! Nebraska encodes architectures as integers on the wire and as names in
//! user-facing configuration. The ordered [`VALID_ARCHS`] list is the single
//! source of truth for parsing, rendering, and input validation.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The archs that Nebraska supports, in wire-code order.
pub const VALID_ARCHS: &[&str] = &["all", "amd64", "aarch64", "x86"];

/// A machine architecture supported by Nebraska.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Arch {
    All = 0,
    Amd64 = 1,
    Aarch64 = 2,
    X86 = 3,
}

impl Arch {
    /// Parse an arch from its name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        VALID_ARCHS
            .iter()
            .position(|v| *v == name)
            .and_then(|i| Self::try_from(i as u8).ok())
            .ok_or_else(|| Error::InvalidArch(name.to_string()))
    }

    /// The name of this arch.
    pub fn as_str(self) -> &'static str {
        VALID_ARCHS[self as usize]
    }
}

impl TryFrom<u8> for Arch {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Arch::All),
            1 => Ok(Arch::Amd64),
            2 => Ok(Arch::Aarch64),
            3 => Ok(Arch::X86),
            other => Err(Error::InvalidArch(other.to_string())),
        }
    }
}

impl From<Arch> for u8 {
    fn from(arch: Arch) -> u8 {
        arch as u8
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
