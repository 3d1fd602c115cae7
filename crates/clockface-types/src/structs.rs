//! Core value types: voxel positions, materials, facings, and the clock
//! entity itself.
//!
//! [`ClockEntity`] is the durable record of one clock face. Its serde shape
//! is the flat record persisted in `clocks.json`:
//!
//! ```json
//! {
//!   "name": "spawn",
//!   "clockWorldUuid": "2b7e4f1c-8a4d-4c1e-9f3a-0d6b5e7c9a12",
//!   "x": 10, "y": 70, "z": -4,
//!   "hourHandMaterial": "STONE",
//!   "minuteHandMaterial": "IRON_BLOCK",
//!   "radius": 5,
//!   "angle": 0
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::ids::WorldId;

/// Number of quarter turns in a full revolution.
const QUARTER_TURNS_PER_REVOLUTION: i64 = 4;

/// An absolute voxel coordinate in a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct BlockPos {
    /// East-west axis.
    pub x: i32,
    /// Vertical axis.
    pub y: i32,
    /// North-south axis.
    pub z: i32,
}

impl BlockPos {
    /// Create a position from its three components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset this position by a relative vector, saturating at the
    /// coordinate limits.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            z: self.z.saturating_add(dz),
        }
    }
}

impl core::fmt::Display for BlockPos {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Opaque block-type identifier.
///
/// Names are stored in canonical upper case (`STONE`, `IRON_BLOCK`) no
/// matter how they were typed. Whether a material is a legal paintable
/// block is decided at the request boundary, not here. The only meaning
/// this type assigns is that [`Material::AIR`] is the empty block.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Material(String);

impl Material {
    /// Canonical name of the empty block.
    pub const AIR: &'static str = "AIR";

    /// Create a material from a block name, normalizing it to upper case.
    pub fn new(name: &str) -> Self {
        Self(name.trim().to_uppercase())
    }

    /// The empty block.
    pub fn air() -> Self {
        Self(Self::AIR.to_owned())
    }

    /// Whether this is the empty block.
    pub fn is_air(&self) -> bool {
        self.0 == Self::AIR
    }

    /// The canonical block name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Material {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl From<Material> for String {
    fn from(material: Material) -> Self {
        material.0
    }
}

impl core::fmt::Display for Material {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fixed rotation of a clock face, in quarter turns about the vertical axis.
///
/// Always normalized into `0..=3`. Stored integers outside that range are
/// accepted on load and folded back with `rem_euclid(4)`: a stored `4`
/// renders identically to `0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "u8")]
pub struct Facing(u8);

impl Facing {
    /// Build a facing from any quarter-turn count.
    pub const fn from_quarter_turns(turns: i64) -> Self {
        // rem_euclid(4) is always in 0..4, which fits a u8.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let normalized = turns.rem_euclid(QUARTER_TURNS_PER_REVOLUTION) as u8;
        Self(normalized)
    }

    /// Derive a facing from a look yaw in degrees.
    ///
    /// The face is turned toward the viewer:
    /// `round(((180 - yaw) mod 360) * 4 / 360)`, rounding ties to even,
    /// then folded into `0..=3`.
    pub fn from_yaw(yaw_degrees: f64) -> Self {
        let turns = ((180.0 - yaw_degrees) % 360.0) * (4.0 / 360.0);
        #[allow(clippy::cast_possible_truncation)]
        let turns = turns.round_ties_even() as i64;
        Self::from_quarter_turns(turns)
    }

    /// Quarter turns in `0..=3`.
    pub const fn quarter_turns(self) -> u8 {
        self.0
    }
}

impl From<i64> for Facing {
    fn from(turns: i64) -> Self {
        Self::from_quarter_turns(turns)
    }
}

impl From<Facing> for u8 {
    fn from(facing: Facing) -> Self {
        facing.0
    }
}

/// One named clock face placed in a world.
///
/// Immutable once built; a clock is changed by replacing its record in the
/// registry. Equality compares names only, because the name is the
/// registry key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockEntity {
    /// Unique registry key.
    name: String,
    /// World the clock lives in.
    clock_world_uuid: WorldId,
    /// Anchor X.
    x: i32,
    /// Anchor Y.
    y: i32,
    /// Anchor Z.
    z: i32,
    /// Block used to draw the hour hand.
    hour_hand_material: Material,
    /// Block used to draw the minute hand.
    minute_hand_material: Material,
    /// Face radius in voxels.
    radius: u32,
    /// Fixed facing in quarter turns.
    angle: Facing,
}

impl ClockEntity {
    /// Assemble a clock record. Callers are expected to have validated the
    /// radius and materials already.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        world: WorldId,
        position: BlockPos,
        facing: Facing,
        hour_hand_material: Material,
        minute_hand_material: Material,
        radius: u32,
    ) -> Self {
        Self {
            name: name.into(),
            clock_world_uuid: world,
            x: position.x,
            y: position.y,
            z: position.z,
            hour_hand_material,
            minute_hand_material,
            radius,
            angle: facing,
        }
    }

    /// Registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// World the clock lives in.
    pub const fn world(&self) -> WorldId {
        self.clock_world_uuid
    }

    /// Anchor voxel at the center of the face.
    pub const fn position(&self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    /// Fixed facing.
    pub const fn facing(&self) -> Facing {
        self.angle
    }

    /// Hour-hand block.
    pub const fn hour_hand_material(&self) -> &Material {
        &self.hour_hand_material
    }

    /// Minute-hand block.
    pub const fn minute_hand_material(&self) -> &Material {
        &self.minute_hand_material
    }

    /// Face radius in voxels.
    pub const fn radius(&self) -> u32 {
        self.radius
    }

    /// Length of the hour hand: `round(0.75 * radius)`.
    pub const fn hour_hand_length(&self) -> u32 {
        // round(3r/4) with ties away from zero.
        self.radius.saturating_mul(3).saturating_add(2) / 4
    }

    /// Radius of the inset disk behind the face: `round(0.8 * radius)`.
    pub const fn inset_radius(&self) -> u32 {
        // round(4r/5); a fifth can never land on .5.
        self.radius.saturating_mul(8).saturating_add(5) / 10
    }
}

impl PartialEq for ClockEntity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ClockEntity {}
