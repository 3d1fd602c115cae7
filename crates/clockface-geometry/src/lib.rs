//! Integer geometry kernel for Clockface voxel clocks.
//!
//! Pure functions with no dependency on world state. Shapes are computed
//! in a clock-local frame (face in X/Y, depth along Z) and placed into a
//! world by an exact quarter-turn rotation about the vertical axis
//! followed by a translation onto the clock's anchor.
//!
//! # Modules
//!
//! - [`point`] -- [`Point3`] local coordinates, quarter-turn rotation,
//!   and placement onto a world anchor.
//! - [`raster`] -- Filled disks, midpoint circle outlines, Bresenham
//!   segments, and clock-hand lines.

pub mod point;
pub mod raster;

pub use point::{Point3, place, rotate_quarter_turns};
pub use raster::{circle_outline, filled_disk, hand_line, line_points};
