//! Type-safe identifier wrapper around [`Uuid`] for voxel worlds.
//!
//! A clock records which world it lives in by the host's world UUID. The
//! newtype keeps that identifier from being mixed up with any other UUID
//! flowing through the host boundary.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a voxel world hosted by the server.
///
/// Serializes as the canonical hyphenated UUID string, which is the shape
/// the registry file stores under `clockWorldUuid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorldId(pub Uuid);

impl WorldId {
    /// Create a new random world identifier (UUID v4).
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for WorldId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for WorldId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorldId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for WorldId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<WorldId> for Uuid {
    fn from(id: WorldId) -> Self {
        id.0
    }
}
