//! The voxel-world collaborator and an in-memory implementation.
//!
//! Clockface never owns a world. The host hands the engine a
//! [`WorldHost`] that resolves world identifiers to live [`VoxelWorld`]
//! handles, and the engine reads and writes single voxels through them.
//! The traits abstract over whatever actually stores blocks: a game
//! server, a test double, or the headless simulation in the engine
//! binary.
//!
//! [`MemoryWorld`] and [`MemoryHost`] are the in-process implementation.
//! They model 16x16 column chunks that can be loaded and unloaded, a
//! wrapping day clock, and access counters so tests can assert exactly
//! how much world traffic an operation caused.

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap, HashSet};

use clockface_types::{BlockPos, Material, WorldId};

/// Chunk edge length as a power of two (16 voxels).
const CHUNK_SHIFT: u32 = 4;

/// A single live world.
pub trait VoxelWorld {
    /// Whether the region containing `pos` is loaded. Reads and writes
    /// outside loaded regions are not guaranteed to be observable.
    fn is_region_loaded(&self, pos: BlockPos) -> bool;

    /// The block at `pos`. Unset voxels are [`Material::AIR`].
    fn block_at(&self, pos: BlockPos) -> Material;

    /// Replace the block at `pos`.
    fn set_block(&mut self, pos: BlockPos, material: &Material);

    /// Current world time in host units, wrapping at the day length.
    fn time(&self) -> u64;
}

/// Resolves world identifiers to live worlds.
pub trait WorldHost {
    /// The live world for `id`, or `None` if the host has no such world.
    fn world_mut(&mut self, id: WorldId) -> Option<&mut dyn VoxelWorld>;
}

/// Column coordinates of a 16x16 chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkPos {
    /// Chunk X (block X divided by 16, rounded down).
    pub x: i32,
    /// Chunk Z (block Z divided by 16, rounded down).
    pub z: i32,
}

impl ChunkPos {
    /// The chunk containing a block position.
    pub const fn containing(pos: BlockPos) -> Self {
        Self {
            x: pos.x >> CHUNK_SHIFT,
            z: pos.z >> CHUNK_SHIFT,
        }
    }
}

/// An in-memory world with explicit chunk loading and a wrapping clock.
#[derive(Debug, Clone)]
pub struct MemoryWorld {
    /// Non-air blocks.
    blocks: HashMap<BlockPos, Material>,
    /// Chunks currently loaded.
    loaded: HashSet<ChunkPos>,
    /// Current time, always below `day_length`.
    time: u64,
    /// Time units per day. Never zero.
    day_length: u64,
    /// Reads and loaded-region queries served so far.
    reads: Cell<u64>,
    /// Block writes served so far.
    writes: u64,
}

impl MemoryWorld {
    /// Create an empty world with no chunks loaded. A zero day length is
    /// treated as one.
    pub fn new(day_length: u64) -> Self {
        Self {
            blocks: HashMap::new(),
            loaded: HashSet::new(),
            time: 0,
            day_length: day_length.max(1),
            reads: Cell::new(0),
            writes: 0,
        }
    }

    /// Load the chunk containing `pos`.
    pub fn load_chunk_at(&mut self, pos: BlockPos) {
        self.loaded.insert(ChunkPos::containing(pos));
    }

    /// Unload the chunk containing `pos`. Blocks in it are kept.
    pub fn unload_chunk_at(&mut self, pos: BlockPos) {
        self.loaded.remove(&ChunkPos::containing(pos));
    }

    /// Load every chunk overlapping the square of half-width `radius`
    /// around `center`.
    pub fn load_area(&mut self, center: BlockPos, radius: u32) {
        let reach = i32::try_from(radius).unwrap_or(i32::MAX);
        let low = ChunkPos::containing(center.offset(reach.saturating_neg(), 0, reach.saturating_neg()));
        let high = ChunkPos::containing(center.offset(reach, 0, reach));
        for x in low.x..=high.x {
            for z in low.z..=high.z {
                self.loaded.insert(ChunkPos { x, z });
            }
        }
    }

    /// Set the world time, wrapped into the day.
    pub fn set_time(&mut self, time: u64) {
        self.time = time.checked_rem(self.day_length).unwrap_or(0);
    }

    /// Advance the world time by `ticks`, wrapping at the day length.
    pub fn advance(&mut self, ticks: u64) {
        let ticks = ticks.checked_rem(self.day_length).unwrap_or(0);
        self.set_time(self.time.saturating_add(ticks));
    }

    /// Positions currently holding `material`, sorted.
    pub fn positions_of(&self, material: &Material) -> Vec<BlockPos> {
        let mut positions: Vec<BlockPos> = self
            .blocks
            .iter()
            .filter(|(_, block)| *block == material)
            .map(|(pos, _)| *pos)
            .collect();
        positions.sort_unstable();
        positions
    }

    /// Number of non-air blocks.
    pub fn solid_count(&self) -> usize {
        self.blocks.len()
    }

    /// Reads and loaded-region queries served so far.
    pub fn reads(&self) -> u64 {
        self.reads.get()
    }

    /// Block writes served so far.
    pub const fn writes(&self) -> u64 {
        self.writes
    }

    /// Record one read.
    fn count_read(&self) {
        self.reads.set(self.reads.get().saturating_add(1));
    }
}

impl VoxelWorld for MemoryWorld {
    fn is_region_loaded(&self, pos: BlockPos) -> bool {
        self.count_read();
        self.loaded.contains(&ChunkPos::containing(pos))
    }

    fn block_at(&self, pos: BlockPos) -> Material {
        self.count_read();
        self.blocks.get(&pos).cloned().unwrap_or_else(Material::air)
    }

    fn set_block(&mut self, pos: BlockPos, material: &Material) {
        self.writes = self.writes.saturating_add(1);
        if material.is_air() {
            self.blocks.remove(&pos);
        } else {
            self.blocks.insert(pos, material.clone());
        }
    }

    fn time(&self) -> u64 {
        self.count_read();
        self.time
    }
}

/// A set of in-memory worlds keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemoryHost {
    /// Worlds by identifier.
    worlds: BTreeMap<WorldId, MemoryWorld>,
    /// World lookups served so far.
    lookups: u64,
}

impl MemoryHost {
    /// Create a host with no worlds.
    pub const fn new() -> Self {
        Self {
            worlds: BTreeMap::new(),
            lookups: 0,
        }
    }

    /// Add or replace a world.
    pub fn insert_world(&mut self, id: WorldId, world: MemoryWorld) {
        self.worlds.insert(id, world);
    }

    /// Borrow a world for inspection.
    pub fn world(&self, id: WorldId) -> Option<&MemoryWorld> {
        self.worlds.get(&id)
    }

    /// Borrow a world for setup, without counting a lookup.
    pub fn memory_world_mut(&mut self, id: WorldId) -> Option<&mut MemoryWorld> {
        self.worlds.get_mut(&id)
    }

    /// Iterate over all worlds mutably.
    pub fn worlds_mut(&mut self) -> impl Iterator<Item = (&WorldId, &mut MemoryWorld)> {
        self.worlds.iter_mut()
    }

    /// World lookups served so far.
    pub const fn lookups(&self) -> u64 {
        self.lookups
    }
}

impl WorldHost for MemoryHost {
    fn world_mut(&mut self, id: WorldId) -> Option<&mut dyn VoxelWorld> {
        self.lookups = self.lookups.saturating_add(1);
        self.worlds
            .get_mut(&id)
            .map(|world| world as &mut dyn VoxelWorld)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_coordinates_round_down() {
        assert_eq!(ChunkPos::containing(BlockPos::new(0, 5, 15)), ChunkPos { x: 0, z: 0 });
        assert_eq!(ChunkPos::containing(BlockPos::new(16, 5, -1)), ChunkPos { x: 1, z: -1 });
        assert_eq!(ChunkPos::containing(BlockPos::new(-17, 0, -16)), ChunkPos { x: -2, z: -1 });
    }

    #[test]
    fn unset_blocks_are_air() {
        let world = MemoryWorld::new(24_000);
        assert!(world.block_at(BlockPos::new(1, 2, 3)).is_air());
    }

    #[test]
    fn writing_air_removes_block() {
        let mut world = MemoryWorld::new(24_000);
        let pos = BlockPos::new(1, 2, 3);
        world.set_block(pos, &Material::new("stone"));
        assert_eq!(world.solid_count(), 1);
        world.set_block(pos, &Material::air());
        assert_eq!(world.solid_count(), 0);
        assert_eq!(world.writes(), 2);
    }

    #[test]
    fn chunks_load_and_unload() {
        let mut world = MemoryWorld::new(24_000);
        let pos = BlockPos::new(40, 64, -3);
        assert!(!world.is_region_loaded(pos));
        world.load_chunk_at(pos);
        assert!(world.is_region_loaded(pos));
        assert!(world.is_region_loaded(BlockPos::new(47, 0, -16)));
        world.unload_chunk_at(pos);
        assert!(!world.is_region_loaded(pos));
    }

    #[test]
    fn load_area_spans_chunk_borders() {
        let mut world = MemoryWorld::new(24_000);
        world.load_area(BlockPos::new(15, 0, 0), 2);
        assert!(world.is_region_loaded(BlockPos::new(17, 0, 0)));
        assert!(world.is_region_loaded(BlockPos::new(13, 0, -2)));
        assert!(!world.is_region_loaded(BlockPos::new(40, 0, 0)));
    }

    #[test]
    fn time_wraps_at_day_length() {
        let mut world = MemoryWorld::new(24_000);
        world.set_time(23_990);
        world.advance(20);
        assert_eq!(world.time(), 10);
        world.advance(48_005);
        assert_eq!(world.time(), 15);
    }

    #[test]
    fn reads_are_counted() {
        let world = MemoryWorld::new(24_000);
        let _ = world.time();
        let _ = world.block_at(BlockPos::default());
        let _ = world.is_region_loaded(BlockPos::default());
        assert_eq!(world.reads(), 3);
    }

    #[test]
    fn host_resolves_known_worlds_only() {
        let id = WorldId::new();
        let mut host = MemoryHost::new();
        host.insert_world(id, MemoryWorld::new(24_000));
        assert!(host.world_mut(id).is_some());
        assert!(host.world_mut(WorldId::new()).is_none());
        assert_eq!(host.lookups(), 2);
    }
}
