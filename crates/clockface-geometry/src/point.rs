//! Local clock-space points and their placement into a world.
//!
//! Clock geometry is computed in a local frame centered on the clock's
//! anchor: the face lies in the local X/Y plane and Z is the depth axis
//! that separates the hour hand from the minute hand. Placement rotates
//! the local frame about the vertical (Y) axis by the clock's facing and
//! then translates it onto the anchor voxel.
//!
//! Rotation is restricted to quarter turns, so it is an exact integer
//! axis swap and negation. Applying four quarter turns is the identity.

use clockface_types::{BlockPos, Facing};

/// Quarter turns in a full revolution.
const QUARTER_TURNS_PER_REVOLUTION: u8 = 4;

/// A point in clock-local integer coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point3 {
    /// Horizontal axis of the face.
    pub x: i32,
    /// Vertical axis of the face.
    pub y: i32,
    /// Depth axis, perpendicular to the face.
    pub z: i32,
}

impl Point3 {
    /// The local origin, where the anchor voxel sits.
    pub const ORIGIN: Self = Self::new(0, 0, 0);

    /// Create a point from its three components.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Rotate about the vertical axis through the origin by `turns`
    /// quarter turns. Y is unchanged.
    ///
    /// - 1 turn: `(x, z) -> (z, -x)`
    /// - 2 turns: `(x, z) -> (-x, -z)`
    /// - 3 turns: `(x, z) -> (-z, x)`
    pub const fn rotate_quarter_turns(self, turns: u8) -> Self {
        match turns % QUARTER_TURNS_PER_REVOLUTION {
            1 => Self::new(self.z, self.y, self.x.saturating_neg()),
            2 => Self::new(self.x.saturating_neg(), self.y, self.z.saturating_neg()),
            3 => Self::new(self.z.saturating_neg(), self.y, self.x),
            _ => self,
        }
    }

    /// Translate onto a world anchor.
    pub const fn to_world(self, anchor: BlockPos) -> BlockPos {
        anchor.offset(self.x, self.y, self.z)
    }
}

/// Rotate every point in a set by `turns` quarter turns about the vertical
/// axis through the local origin.
pub fn rotate_quarter_turns<I>(points: I, turns: u8) -> Vec<Point3>
where
    I: IntoIterator<Item = Point3>,
{
    points
        .into_iter()
        .map(|point| point.rotate_quarter_turns(turns))
        .collect()
}

/// Rotate a local point set by a clock's facing and translate it onto the
/// clock's anchor voxel.
pub fn place<I>(points: I, facing: Facing, anchor: BlockPos) -> Vec<BlockPos>
where
    I: IntoIterator<Item = Point3>,
{
    let turns = facing.quarter_turns();
    points
        .into_iter()
        .map(|point| point.rotate_quarter_turns(turns).to_world(anchor))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn sample() -> Vec<Point3> {
        vec![
            Point3::new(3, 1, 0),
            Point3::new(-2, 4, -1),
            Point3::new(0, -5, 2),
            Point3::new(7, 0, 7),
        ]
    }

    #[test]
    fn quarter_turn_mappings() {
        let p = Point3::new(2, 9, 5);
        assert_eq!(p.rotate_quarter_turns(0), p);
        assert_eq!(p.rotate_quarter_turns(1), Point3::new(5, 9, -2));
        assert_eq!(p.rotate_quarter_turns(2), Point3::new(-2, 9, -5));
        assert_eq!(p.rotate_quarter_turns(3), Point3::new(-5, 9, 2));
        assert_eq!(p.rotate_quarter_turns(4), p);
    }

    #[test]
    fn four_quarter_turns_is_identity() {
        let original = sample();
        let mut rotated = original.clone();
        for _ in 0..4 {
            rotated = rotate_quarter_turns(rotated, 1);
        }
        assert_eq!(rotated, original);
    }

    #[test]
    fn opposite_turns_cancel() {
        for turns in 0..4_u8 {
            let back = rotate_quarter_turns(rotate_quarter_turns(sample(), turns), 4 - turns);
            assert_eq!(back, sample());
        }
    }

    #[test]
    fn rotation_preserves_set_size() {
        let original: BTreeSet<Point3> = sample().into_iter().collect();
        for turns in 0..4_u8 {
            let rotated: BTreeSet<Point3> = rotate_quarter_turns(original.iter().copied(), turns)
                .into_iter()
                .collect();
            assert_eq!(rotated.len(), original.len());
        }
    }

    #[test]
    fn place_rotates_then_translates() {
        let anchor = BlockPos::new(100, 64, -20);
        let placed = place([Point3::new(1, 2, -1)], Facing::from_quarter_turns(1), anchor);
        // (1, 2, -1) rotated once is (-1, 2, -1), then shifted onto the anchor.
        assert_eq!(placed, vec![BlockPos::new(99, 66, -21)]);
    }
}
