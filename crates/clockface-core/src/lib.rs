//! Clock registry, render engine, and periodic driver for Clockface.
//!
//! This crate owns everything between a validated clock and the voxels it
//! paints: the time-to-angle dial, the clear-then-draw render cycle, the
//! name-keyed registry with its JSON persistence, and the driver pass that
//! renders every clock on a fixed cadence. The live world is injected
//! through the [`VoxelWorld`] and [`WorldHost`] traits.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `clockface-config.yaml` into
//!   strongly-typed structs.
//! - [`dial`] -- World time to hour and minute hand angles.
//! - [`driver`] -- [`run_tick`] over the registry and the Tokio
//!   [`Schedule`] that triggers it.
//! - [`registry`] -- [`ClockRegistry`] create, remove, load, and save.
//! - [`render`] -- Clear footprints, hand voxels, and render plans.
//! - [`request`] -- Boundary validation of clock creation requests.
//! - [`store`] -- [`ClockStore`] trait with JSON file and in-memory
//!   backends.
//! - [`world`] -- World collaborator traits and in-memory worlds.
//!
//! [`VoxelWorld`]: world::VoxelWorld
//! [`WorldHost`]: world::WorldHost
//! [`run_tick`]: driver::run_tick
//! [`Schedule`]: driver::Schedule
//! [`ClockRegistry`]: registry::ClockRegistry
//! [`ClockStore`]: store::ClockStore

pub mod config;
pub mod dial;
pub mod driver;
pub mod registry;
pub mod render;
pub mod request;
pub mod store;
pub mod world;
