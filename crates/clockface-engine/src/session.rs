//! Engine session: the registry, the simulated worlds, and the run loop.
//!
//! A [`Session`] owns everything that is mutated at runtime. The run loop
//! in [`run`] is the only place it is touched, so driver ticks and console
//! commands are serialized on one task and can never interleave.

use std::fmt::Write as _;
use std::future::Future;

use clockface_core::config::WorldConfig;
use clockface_core::dial::Dial;
use clockface_core::driver::{Schedule, TickReport, run_tick};
use clockface_core::registry::ClockRegistry;
use clockface_core::request::{CreateClockRequest, SolidBlockCatalog};
use clockface_core::store::ClockStore;
use clockface_core::world::{MemoryHost, MemoryWorld};
use clockface_types::{BlockPos, WorldId};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::console::{self, AddClock, ConsoleCommand, USAGE};
use crate::error::EngineError;

/// Runtime state of the headless engine.
#[derive(Debug)]
pub struct Session<S> {
    /// All clocks.
    registry: ClockRegistry<S>,
    /// Simulated worlds the clocks render into.
    host: MemoryHost,
    /// Time-to-angle mapping.
    dial: Dial,
    /// Materials accepted for hands.
    catalog: SolidBlockCatalog,
    /// Settings for newly created worlds.
    world: WorldConfig,
    /// World time added per driver tick.
    interval_ticks: u64,
    /// Driver ticks run so far.
    ticks: u64,
}

impl<S: ClockStore> Session<S> {
    /// Build a session around a loaded registry. The default world and the
    /// world of every registered clock are created, with the chunks under
    /// each clock loaded.
    pub fn new(registry: ClockRegistry<S>, world: WorldConfig, dial: Dial, interval_ticks: u64) -> Self {
        let areas: Vec<(WorldId, BlockPos, u32)> = registry
            .iter()
            .map(|clock| (clock.world(), clock.position(), clock.radius()))
            .collect();
        let default_world = world.default_world;

        let mut session = Self {
            registry,
            host: MemoryHost::new(),
            dial,
            catalog: SolidBlockCatalog::default(),
            world,
            interval_ticks,
            ticks: 0,
        };
        session.ensure_world(default_world);
        for (id, position, radius) in areas {
            session.load_clock_area(id, position, radius);
        }
        session
    }

    /// Advance every world by one driver interval and render all clocks.
    pub fn tick(&mut self) -> TickReport {
        for (_, world) in self.host.worlds_mut() {
            world.advance(self.interval_ticks);
        }
        self.ticks = self.ticks.saturating_add(1);
        run_tick(&self.registry, &mut self.host, &self.dial)
    }

    /// Parse and run one console line. Returns the reply to print, or
    /// `None` for a blank line.
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match console::parse_line(line) {
            Ok(Some(command)) => command,
            Ok(None) => return None,
            Err(e) => return Some(e.to_string()),
        };
        match self.execute(command) {
            Ok(reply) => Some(reply),
            Err(e) => {
                error!(error = %e, "Console command failed");
                Some(format!("command failed: {e}"))
            }
        }
    }

    /// Run one parsed command. User mistakes are replies, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Registry`] if the registry cannot be saved.
    pub fn execute(&mut self, command: ConsoleCommand) -> Result<String, EngineError> {
        match command {
            ConsoleCommand::Add(add) => self.add(add),
            ConsoleCommand::Delete { name } => {
                if self.registry.remove(&name, &mut self.host)? {
                    Ok(format!("Deleted clock '{name}'."))
                } else {
                    Ok(format!("No clock exists with the name '{name}'."))
                }
            }
            ConsoleCommand::List => Ok(self.list()),
            ConsoleCommand::Help => Ok(USAGE.to_owned()),
        }
    }

    /// Create a clock in the default world, refusing existing names.
    fn add(&mut self, add: AddClock) -> Result<String, EngineError> {
        if self.registry.contains(&add.name) {
            return Ok(format!(
                "A clock exists with the name '{name}'. Run 'delete {name}' to delete it.",
                name = add.name
            ));
        }
        let request = CreateClockRequest {
            name: add.name,
            world: self.world.default_world,
            position: add.position,
            yaw: add.yaw,
            hour_hand_material: add.hour_hand_material,
            minute_hand_material: add.minute_hand_material,
            radius: add.radius,
        };
        let clock = match request.validate(&self.catalog) {
            Ok(clock) => clock,
            Err(e) => return Ok(e.to_string()),
        };

        let reply = format!(
            "Created a new clock '{}' at {}.",
            clock.name(),
            clock.position()
        );
        self.load_clock_area(clock.world(), clock.position(), clock.radius());
        self.registry.create(clock, &mut self.host)?;
        Ok(reply)
    }

    /// One line per clock.
    fn list(&self) -> String {
        if self.registry.is_empty() {
            return "No clocks.".to_owned();
        }
        let mut out = String::new();
        for clock in &self.registry {
            let _ = writeln!(
                out,
                "{} at {} radius {} facing {} hands {}/{}",
                clock.name(),
                clock.position(),
                clock.radius(),
                clock.facing().quarter_turns(),
                clock.hour_hand_material(),
                clock.minute_hand_material(),
            );
        }
        out.trim_end().to_owned()
    }

    /// Make sure `id` exists as a simulated world.
    fn ensure_world(&mut self, id: WorldId) {
        if self.host.world(id).is_none() {
            let mut world = MemoryWorld::new(self.world.day_length);
            world.set_time(self.world.start_time);
            self.host.insert_world(id, world);
        }
    }

    /// Create the clock's world if needed and load the chunks under it.
    fn load_clock_area(&mut self, id: WorldId, position: BlockPos, radius: u32) {
        self.ensure_world(id);
        if let Some(world) = self.host.memory_world_mut(id) {
            world.load_area(position, radius.saturating_add(1));
        }
    }
}

impl<S> Session<S> {
    /// The clock registry.
    pub const fn registry(&self) -> &ClockRegistry<S> {
        &self.registry
    }

    /// The simulated worlds.
    pub const fn host(&self) -> &MemoryHost {
        &self.host
    }

    /// Driver ticks run so far.
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }
}

/// Drive `session` until the console closes or `shutdown` resolves.
///
/// Each interval tick renders every clock; each console line is handled
/// between ticks and its reply printed to stdout.
pub async fn run<S, F>(
    session: &mut Session<S>,
    schedule: &Schedule,
    mut lines: mpsc::Receiver<String>,
    shutdown: F,
) where
    S: ClockStore,
    F: Future<Output = ()>,
{
    let mut interval = schedule.interval();
    tokio::pin!(shutdown);

    info!(
        initial_delay_ms = schedule.initial_delay().as_millis(),
        period_ms = schedule.period().as_millis(),
        clocks = session.registry().len(),
        "Driver loop starting"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                session.tick();
            }
            line = lines.recv() => match line {
                Some(line) => {
                    if let Some(reply) = session.handle_line(&line) {
                        println!("{reply}");
                    }
                }
                None => {
                    info!("Console closed");
                    break;
                }
            },
            () = &mut shutdown => {
                info!("Shutdown requested");
                break;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use clockface_core::config::DriverConfig;
    use clockface_core::store::MemoryStore;
    use clockface_core::world::VoxelWorld;
    use clockface_types::Material;

    use super::*;

    fn session() -> Session<MemoryStore> {
        let registry = ClockRegistry::load(MemoryStore::new()).unwrap();
        Session::new(registry, WorldConfig::default(), Dial::default(), 10)
    }

    fn default_world(session: &Session<MemoryStore>) -> &MemoryWorld {
        session.host().world(WorldConfig::default().default_world).unwrap()
    }

    #[test]
    fn add_creates_and_persists() {
        let mut session = session();
        let reply = session.handle_line("add tower 5 stone iron_block").unwrap();
        assert!(reply.starts_with("Created a new clock 'tower'"), "{reply}");
        assert!(session.registry().contains("tower"));
        assert_eq!(session.registry().store().saves(), 1);
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut session = session();
        session.handle_line("add tower 5 stone iron_block");
        let reply = session.handle_line("add tower 9 gold_block iron_block").unwrap();
        assert!(reply.contains("A clock exists with the name 'tower'"), "{reply}");
        assert_eq!(session.registry().get("tower").unwrap().radius(), 5);
        assert_eq!(session.registry().store().saves(), 1);
    }

    #[test]
    fn invalid_requests_are_explained() {
        let mut session = session();
        let reply = session.handle_line("add tower 0 stone iron_block").unwrap();
        assert!(reply.contains("radius 0"), "{reply}");
        let reply = session.handle_line("add tower 4 water iron_block").unwrap();
        assert!(reply.contains("WATER"), "{reply}");
        assert!(session.registry().is_empty());
    }

    #[test]
    fn delete_clears_the_clock() {
        let mut session = session();
        session.handle_line("add tower 5 stone iron_block");
        session.tick();
        assert!(default_world(&session).solid_count() > 0);

        let reply = session.handle_line("delete tower").unwrap();
        assert_eq!(reply, "Deleted clock 'tower'.");
        assert_eq!(default_world(&session).solid_count(), 0);

        let reply = session.handle_line("delete tower").unwrap();
        assert_eq!(reply, "No clock exists with the name 'tower'.");
    }

    #[test]
    fn list_and_help() {
        let mut session = session();
        assert_eq!(session.handle_line("list").unwrap(), "No clocks.");
        session.handle_line("add b 3 stone iron_block 10 64 10 0");
        session.handle_line("add a 4 stone gold_block");
        let listing = session.handle_line("list").unwrap();
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines.first().unwrap().starts_with("a at (0, 64, 0)"), "{listing}");
        assert_eq!(session.handle_line("help").unwrap(), USAGE);
        assert!(session.handle_line("").is_none());
    }

    #[test]
    fn ticks_advance_world_time() {
        let mut session = session();
        session.handle_line("add tower 5 stone iron_block");
        let report = session.tick();
        assert_eq!(report.rendered, 1);
        assert_eq!(session.ticks(), 1);
        assert!(!default_world(&session).positions_of(&Material::new("iron_block")).is_empty());
    }

    #[test]
    fn restored_clocks_get_their_worlds_loaded() {
        let mut first = session();
        first.handle_line("add tower 5 stone iron_block 100 64 -300 0");
        let store = first.registry().store().clone();

        let registry = ClockRegistry::load(store).unwrap();
        let mut second = Session::new(registry, WorldConfig::default(), Dial::default(), 10);
        assert_eq!(second.tick().rendered, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_ticks_and_handles_commands() {
        let mut session = session();
        let config = DriverConfig {
            initial_delay_ticks: 10,
            interval_ticks: 10,
            tick_duration_ms: 50,
        };
        let schedule = Schedule::from_config(&config).unwrap();
        let (tx, rx) = mpsc::channel(8);
        tx.send("add tower 5 stone iron_block".to_owned()).await.unwrap();

        // Ticks fire at 500, 1000, and 1500 ms.
        let shutdown = tokio::time::sleep(Duration::from_millis(1700));
        run(&mut session, &schedule, rx, shutdown).await;

        assert_eq!(session.ticks(), 3);
        assert!(session.registry().contains("tower"));
        assert_eq!(default_world(&session).time(), 30);
        drop(tx);
    }

    #[tokio::test(start_paused = true)]
    async fn run_loop_stops_when_console_closes() {
        let mut session = session();
        let schedule = Schedule::from_config(&DriverConfig::default()).unwrap();
        let (tx, rx) = mpsc::channel::<String>(1);
        drop(tx);

        run(&mut session, &schedule, rx, std::future::pending()).await;
        assert_eq!(session.ticks(), 0);
    }
}
