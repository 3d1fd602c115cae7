//! Render/update engine: turns a clock and a world time into block edits.
//!
//! Each clock is rendered in two phases. The **clear** phase resets the
//! clock's footprint to air; the **draw** phase paints both hands at the
//! angles for the current time. The footprint is two filled disks in the
//! clock's local frame:
//!
//! - the face disk of `radius` at depth 0, which holds the minute hand
//!   (length `radius`), and
//! - the inset disk of `round(0.8 * radius)` at depth -1, which holds the
//!   hour hand (length `round(0.75 * radius)`).
//!
//! Every cell a hand could ever occupy lies inside its disk, so clearing
//! the footprint erases the previous hands without remembering where they
//! were. The face itself is never repainted: the disks are only cleared.
//!
//! Planning is pure. [`plan_clear`], [`plan_draw`], and [`plan_update`]
//! return [`BlockEdit`] lists in the order they must be applied, and only
//! [`apply`] (or the [`clear_clock`] / [`update_clock`] wrappers) writes to
//! a world. A clock whose anchor region is not loaded is skipped outright.

use std::collections::BTreeSet;

use clockface_geometry::{Point3, filled_disk, hand_line, place};
use clockface_types::{BlockPos, ClockEntity, Material};
use tracing::debug;

use crate::dial::{Dial, HandAngles};
use crate::world::{VoxelWorld, WorldHost};

/// Depth of the face disk and the minute hand.
const FACE_DEPTH: i32 = 0;

/// Depth of the inset disk and the hour hand, one voxel behind the face.
const INSET_DEPTH: i32 = -1;

/// One voxel write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEdit {
    /// Target voxel.
    pub pos: BlockPos,
    /// Block to place there.
    pub material: Material,
}

/// World positions of both hands for one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandVoxels {
    /// Hour hand, one voxel behind the face.
    pub hour: Vec<BlockPos>,
    /// Minute hand, in the face plane.
    pub minute: Vec<BlockPos>,
}

/// Edits for one clock's full clear-then-draw cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    /// Footprint voxels that held a block and must become air.
    pub clears: Vec<BlockEdit>,
    /// Hand voxels to paint, applied after the clears.
    pub draws: Vec<BlockEdit>,
}

impl RenderPlan {
    /// All edits in application order.
    pub fn edits(&self) -> impl Iterator<Item = &BlockEdit> {
        self.clears.iter().chain(self.draws.iter())
    }
}

/// Why a clock was not rendered this time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The host has no world with the clock's identifier.
    UnknownWorld,
    /// The region containing the clock's anchor is not loaded.
    RegionUnloaded,
}

/// Result of rendering or clearing one clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Nothing was read or written.
    Skipped(SkipReason),
    /// The plan was applied.
    Rendered {
        /// Voxels reset to air.
        cleared: usize,
        /// Voxels painted with a hand material.
        drawn: usize,
    },
}

/// Every voxel the clock may have drawn into: the face disk and the
/// inset disk, rotated by the clock's facing and placed on its anchor.
pub fn clear_footprint(clock: &ClockEntity) -> BTreeSet<BlockPos> {
    let face = filled_disk(Point3::new(0, 0, FACE_DEPTH), clock.radius());
    let inset = filled_disk(Point3::new(0, 0, INSET_DEPTH), clock.inset_radius());
    place(face.into_iter().chain(inset), clock.facing(), clock.position())
        .into_iter()
        .collect()
}

/// World positions of both hands at the given angles.
pub fn hand_voxels(clock: &ClockEntity, angles: HandAngles) -> HandVoxels {
    let minute = hand_line(
        Point3::new(0, 0, FACE_DEPTH),
        angles.minute,
        clock.radius(),
    );
    let hour = hand_line(
        Point3::new(0, 0, INSET_DEPTH),
        angles.hour,
        clock.hour_hand_length(),
    );
    HandVoxels {
        hour: place(hour, clock.facing(), clock.position()),
        minute: place(minute, clock.facing(), clock.position()),
    }
}

/// Air edits for every footprint voxel that currently holds a block.
/// Voxels that are already air produce no edit.
pub fn plan_clear(clock: &ClockEntity, world: &dyn VoxelWorld) -> Vec<BlockEdit> {
    clear_footprint(clock)
        .into_iter()
        .filter(|&pos| !world.block_at(pos).is_air())
        .map(|pos| BlockEdit {
            pos,
            material: Material::air(),
        })
        .collect()
}

/// Hand edits at the given angles: the hour hand in the hour material and
/// the minute hand in the minute material.
pub fn plan_draw(clock: &ClockEntity, angles: HandAngles) -> Vec<BlockEdit> {
    let hands = hand_voxels(clock, angles);
    let hour = hands.hour.into_iter().map(|pos| BlockEdit {
        pos,
        material: clock.hour_hand_material().clone(),
    });
    let minute = hands.minute.into_iter().map(|pos| BlockEdit {
        pos,
        material: clock.minute_hand_material().clone(),
    });
    hour.chain(minute).collect()
}

/// The full clear-then-draw plan for the world's current time, or `None`
/// when the clock's anchor region is not loaded.
pub fn plan_update(clock: &ClockEntity, world: &dyn VoxelWorld, dial: &Dial) -> Option<RenderPlan> {
    if !world.is_region_loaded(clock.position()) {
        return None;
    }
    let angles = dial.angles_at(world.time());
    Some(RenderPlan {
        clears: plan_clear(clock, world),
        draws: plan_draw(clock, angles),
    })
}

/// Write a list of edits in order.
pub fn apply<'a, I>(world: &mut dyn VoxelWorld, edits: I)
where
    I: IntoIterator<Item = &'a BlockEdit>,
{
    for edit in edits {
        world.set_block(edit.pos, &edit.material);
    }
}

/// Resolve the clock's world and check that its anchor region is loaded.
fn loaded_world<'h>(
    clock: &ClockEntity,
    host: &'h mut dyn WorldHost,
) -> Result<&'h mut dyn VoxelWorld, SkipReason> {
    let world = host
        .world_mut(clock.world())
        .ok_or(SkipReason::UnknownWorld)?;
    if world.is_region_loaded(clock.position()) {
        Ok(world)
    } else {
        Err(SkipReason::RegionUnloaded)
    }
}

/// Reset the clock's footprint to air.
///
/// Used before a clock is replaced or removed. Skipped when the clock's
/// world is unknown or its region is unloaded, in which case its voxels
/// stay where they are.
pub fn clear_clock(clock: &ClockEntity, host: &mut dyn WorldHost) -> RenderOutcome {
    let world = match loaded_world(clock, host) {
        Ok(world) => world,
        Err(reason) => {
            debug!(clock = clock.name(), ?reason, "Clear skipped");
            return RenderOutcome::Skipped(reason);
        }
    };
    let clears = plan_clear(clock, world);
    apply(world, &clears);
    RenderOutcome::Rendered {
        cleared: clears.len(),
        drawn: 0,
    }
}

/// Run one clear-then-draw cycle for the clock at the world's current
/// time.
pub fn update_clock(clock: &ClockEntity, host: &mut dyn WorldHost, dial: &Dial) -> RenderOutcome {
    let world = match loaded_world(clock, host) {
        Ok(world) => world,
        Err(reason) => {
            debug!(clock = clock.name(), ?reason, "Update skipped");
            return RenderOutcome::Skipped(reason);
        }
    };
    let angles = dial.angles_at(world.time());
    let plan = RenderPlan {
        clears: plan_clear(clock, world),
        draws: plan_draw(clock, angles),
    };
    apply(world, plan.edits());
    RenderOutcome::Rendered {
        cleared: plan.clears.len(),
        drawn: plan.draws.len(),
    }
}
