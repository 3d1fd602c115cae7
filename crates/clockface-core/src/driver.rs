//! The periodic driver: one render pass over every registered clock.
//!
//! [`run_tick`] is the unit of work the host's fixed-interval trigger
//! invokes. It renders every clock independently, so one clock being
//! skipped (unknown world, unloaded region) never affects another, and an
//! empty registry does no world access at all.
//!
//! [`Schedule`] turns the host-tick cadence from [`DriverConfig`] into a
//! Tokio interval. All rendering runs on whichever task owns the registry
//! and the world host, so ticks never overlap with each other or with
//! registry mutations.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, trace};

use crate::config::DriverConfig;
use crate::dial::Dial;
use crate::registry::ClockRegistry;
use crate::render::{self, RenderOutcome};
use crate::world::WorldHost;

/// Errors that can occur when building a driver schedule.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The configured cadence would never fire or fire continuously.
    #[error("invalid driver schedule: {reason}")]
    InvalidSchedule {
        /// Explanation of what is wrong with the cadence.
        reason: String,
    },
}

/// Counts from one pass over the registry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Clocks that were cleared and redrawn.
    pub rendered: usize,
    /// Clocks skipped for an unknown world or unloaded region.
    pub skipped: usize,
    /// Voxels reset to air across all clocks.
    pub cleared: usize,
    /// Hand voxels painted across all clocks.
    pub drawn: usize,
}

/// Render every clock in `registry` once at its world's current time.
pub fn run_tick<S>(registry: &ClockRegistry<S>, host: &mut dyn WorldHost, dial: &Dial) -> TickReport {
    let mut report = TickReport::default();
    if registry.is_empty() {
        return report;
    }

    for clock in registry {
        match render::update_clock(clock, host, dial) {
            RenderOutcome::Rendered { cleared, drawn } => {
                report.rendered = report.rendered.saturating_add(1);
                report.cleared = report.cleared.saturating_add(cleared);
                report.drawn = report.drawn.saturating_add(drawn);
            }
            RenderOutcome::Skipped(reason) => {
                trace!(clock = clock.name(), ?reason, "Clock skipped this tick");
                report.skipped = report.skipped.saturating_add(1);
            }
        }
    }

    debug!(
        rendered = report.rendered,
        skipped = report.skipped,
        cleared = report.cleared,
        drawn = report.drawn,
        "Driver tick complete"
    );
    report
}

/// Real-time cadence of the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    /// Wait before the first tick.
    initial_delay: Duration,
    /// Time between ticks.
    period: Duration,
}

impl Schedule {
    /// Convert host-tick counts into real durations.
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::InvalidSchedule`] if the interval or the tick
    /// duration is zero.
    pub fn from_config(config: &DriverConfig) -> Result<Self, DriverError> {
        if config.interval_ticks == 0 {
            return Err(DriverError::InvalidSchedule {
                reason: "interval_ticks must be at least 1".to_owned(),
            });
        }
        if config.tick_duration_ms == 0 {
            return Err(DriverError::InvalidSchedule {
                reason: "tick_duration_ms must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            initial_delay: ticks_to_duration(config.initial_delay_ticks, config.tick_duration_ms),
            period: ticks_to_duration(config.interval_ticks, config.tick_duration_ms),
        })
    }

    /// Wait before the first tick.
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Time between ticks.
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// A Tokio interval that first fires after the initial delay and then
    /// once per period. Late ticks are delayed rather than bunched up.
    pub fn interval(&self) -> Interval {
        let now = Instant::now();
        let start = now.checked_add(self.initial_delay).unwrap_or(now);
        let mut interval = tokio::time::interval_at(start, self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    }
}

/// Duration of `ticks` host ticks of `tick_ms` milliseconds each.
const fn ticks_to_duration(ticks: u64, tick_ms: u64) -> Duration {
    Duration::from_millis(ticks.saturating_mul(tick_ms))
}
