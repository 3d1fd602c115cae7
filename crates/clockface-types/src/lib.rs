//! Shared type definitions for Clockface voxel clocks.
//!
//! Every other crate in the workspace speaks in these types: the geometry
//! kernel translates into [`BlockPos`], the registry persists
//! [`ClockEntity`] records, and the world collaborator reads and writes
//! [`Material`] values.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrapper for world identifiers
//! - [`structs`] -- Positions, materials, facings, and the clock entity

pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::WorldId;
pub use structs::{BlockPos, ClockEntity, Facing, Material};
