//! End-to-end clock lifecycle tests: create, render, replace, remove, and
//! reload, against in-memory worlds and a JSON registry file on disk.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects,
    clippy::missing_panics_doc
)]

use clockface_core::dial::Dial;
use clockface_core::driver::{TickReport, run_tick};
use clockface_core::registry::{ClockRegistry, CreateOutcome};
use clockface_core::render::clear_footprint;
use clockface_core::store::JsonFileStore;
use clockface_core::world::{MemoryHost, MemoryWorld, VoxelWorld};
use clockface_types::{BlockPos, ClockEntity, Facing, Material, WorldId};

// =============================================================================
// Helpers
// =============================================================================

fn stone() -> Material {
    Material::new("stone")
}

fn iron() -> Material {
    Material::new("iron_block")
}

fn clock(name: &str, world: WorldId, radius: u32) -> ClockEntity {
    ClockEntity::new(
        name,
        world,
        BlockPos::new(0, 0, 0),
        Facing::from_quarter_turns(0),
        stone(),
        iron(),
        radius,
    )
}

/// A host with one world whose chunks around the origin are loaded.
fn loaded_host() -> (MemoryHost, WorldId) {
    let id = WorldId::new();
    let mut world = MemoryWorld::new(24_000);
    world.load_area(BlockPos::new(0, 0, 0), 32);
    let mut host = MemoryHost::new();
    host.insert_world(id, world);
    (host, id)
}

fn file_registry(dir: &tempfile::TempDir) -> ClockRegistry<JsonFileStore> {
    let store = JsonFileStore::new(dir.path().join("Clockface").join("clocks.json"));
    ClockRegistry::load(store).unwrap()
}

// =============================================================================
// Rendering
// =============================================================================

#[test]
fn new_clock_renders_hands_at_time_zero() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(&dir);

    registry.create(clock("A", id, 5), &mut host).unwrap();
    let report = run_tick(&registry, &mut host, &Dial::default());
    assert_eq!(report.rendered, 1);

    let world = host.world(id).unwrap();
    let minute = world.positions_of(&iron());
    assert_eq!(minute, (0..=5).map(|x| BlockPos::new(x, 0, 0)).collect::<Vec<_>>());

    let hour = world.positions_of(&stone());
    assert_eq!(hour.len(), 5);
    assert!(hour.iter().all(|p| p.z == -1 && p.y <= 0 && p.y >= -4));
}

#[test]
fn face_disk_is_cleared_but_never_painted() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(&dir);
    registry.create(clock("A", id, 6), &mut host).unwrap();

    // Damage the face with a block no hand uses.
    let quartz = Material::new("quartz_block");
    host.memory_world_mut(id)
        .unwrap()
        .set_block(BlockPos::new(-5, 2, 0), &quartz);

    let dial = Dial::default();
    for _ in 0..5 {
        host.memory_world_mut(id).unwrap().advance(50);
        run_tick(&registry, &mut host, &dial);
    }

    // The face does not heal: only hand voxels remain inside the footprint.
    let world = host.world(id).unwrap();
    assert!(world.positions_of(&quartz).is_empty());
    let hands = world.positions_of(&stone()).len() + world.positions_of(&iron()).len();
    assert_eq!(world.solid_count(), hands);
}

// =============================================================================
// Registry lifecycle
// =============================================================================

#[test]
fn replacing_a_clock_clears_the_old_one_first() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(&dir);
    let dial = Dial::default();

    registry.create(clock("A", id, 8), &mut host).unwrap();
    run_tick(&registry, &mut host, &dial);
    assert!(host.world(id).unwrap().solid_count() > 0);

    let gold = Material::new("gold_block");
    let replacement = ClockEntity::new(
        "A",
        id,
        BlockPos::new(0, 0, 0),
        Facing::from_quarter_turns(1),
        gold.clone(),
        gold.clone(),
        3,
    );
    let outcome = registry.create(replacement, &mut host).unwrap();
    assert_eq!(outcome, CreateOutcome::Replaced);
    // Nothing of the old clock survives the replacement.
    assert_eq!(host.world(id).unwrap().solid_count(), 0);

    host.memory_world_mut(id).unwrap().advance(400);
    run_tick(&registry, &mut host, &dial);
    let world = host.world(id).unwrap();
    assert!(world.positions_of(&stone()).is_empty());
    assert!(world.positions_of(&iron()).is_empty());
    assert_eq!(world.solid_count(), world.positions_of(&gold).len());
}

#[test]
fn removed_clock_is_cleared_and_not_reloaded() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let dial = Dial::default();
    let a = clock("A", id, 5);
    let b = ClockEntity::new(
        "B",
        id,
        BlockPos::new(30, 0, 0),
        Facing::from_quarter_turns(0),
        stone(),
        iron(),
        3,
    );
    {
        let mut registry = file_registry(&dir);
        registry.create(a.clone(), &mut host).unwrap();
        registry.create(b.clone(), &mut host).unwrap();
        run_tick(&registry, &mut host, &dial);

        assert!(registry.remove("A", &mut host).unwrap());
        assert!(!registry.remove("A", &mut host).unwrap());
    }

    let world = host.world(id).unwrap();
    let a_footprint = clear_footprint(&a);
    let b_footprint = clear_footprint(&b);
    let remaining: Vec<BlockPos> = world
        .positions_of(&stone())
        .into_iter()
        .chain(world.positions_of(&iron()))
        .collect();
    // Only B's hands are left.
    assert!(!remaining.is_empty());
    for pos in &remaining {
        assert!(!a_footprint.contains(pos), "{pos}");
        assert!(b_footprint.contains(pos), "{pos}");
    }

    let reloaded = file_registry(&dir);
    assert_eq!(reloaded.names().collect::<Vec<_>>(), vec!["B"]);
}

#[test]
fn registry_file_uses_flat_records() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(&dir);
    registry.create(clock("A", id, 5), &mut host).unwrap();

    let raw = std::fs::read_to_string(registry.store().path()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let record = &json["A"];
    assert_eq!(record["name"], "A");
    assert_eq!(record["clockWorldUuid"], id.to_string());
    assert_eq!(record["x"], 0);
    assert_eq!(record["hourHandMaterial"], "STONE");
    assert_eq!(record["minuteHandMaterial"], "IRON_BLOCK");
    assert_eq!(record["radius"], 5);
    assert_eq!(record["angle"], 0);
}

#[test]
fn malformed_registry_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clocks.json");
    std::fs::write(&path, "not json").unwrap();
    assert!(ClockRegistry::load(JsonFileStore::new(path)).is_err());
}

// =============================================================================
// Driver guards
// =============================================================================

#[test]
fn empty_registry_does_no_world_access() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let registry = file_registry(&dir);

    let report = run_tick(&registry, &mut host, &Dial::default());
    assert_eq!(report, TickReport::default());
    assert_eq!(host.lookups(), 0);
    let world = host.world(id).unwrap();
    assert_eq!(world.reads(), 0);
    assert_eq!(world.writes(), 0);
}

#[test]
fn unloaded_region_leaves_clock_and_world_untouched() {
    let (mut host, id) = loaded_host();
    let dir = tempfile::tempdir().unwrap();
    let mut registry = file_registry(&dir);
    let original = ClockEntity::new(
        "far",
        id,
        BlockPos::new(4000, 64, 4000),
        Facing::from_quarter_turns(2),
        stone(),
        iron(),
        5,
    );
    registry.create(original, &mut host).unwrap();

    let report = run_tick(&registry, &mut host, &Dial::default());
    assert_eq!(report.skipped, 1);
    assert_eq!(host.world(id).unwrap().writes(), 0);

    let kept = registry.get("far").unwrap();
    assert_eq!(kept.position(), BlockPos::new(4000, 64, 4000));
    assert_eq!(kept.facing().quarter_turns(), 2);
    assert_eq!(kept.radius(), 5);

    // Loading the region lets the next tick render it.
    host.memory_world_mut(id)
        .unwrap()
        .load_chunk_at(BlockPos::new(4000, 64, 4000));
    let report = run_tick(&registry, &mut host, &Dial::default());
    assert_eq!(report.rendered, 1);
}
