//! Mapping from world time to clock-hand angles.
//!
//! Each hand is a phase counter: world time plus an offset, reduced modulo
//! the hand's period, and mapped onto a full turn. The angle runs
//! clockwise as time advances, measured in radians counter-clockwise from
//! the face's local +X axis:
//!
//! ```text
//! angle = pi * (2 - ((time + offset) mod period) / (period / 2))   (mod 2*pi)
//! ```
//!
//! With the default [`DialConfig`] the hour hand turns once per 12000
//! units and the minute hand once per 1000 units, which matches a host day
//! of 24000 units where time 0 is six o'clock.

use std::f64::consts::{PI, TAU};

use crate::config::DialConfig;

/// Errors that can occur when building a dial.
#[derive(Debug, thiserror::Error)]
pub enum DialError {
    /// A hand period is zero, so the hand could never turn.
    #[error("invalid dial configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Hour and minute hand angles in radians, each in `[0, 2*pi)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandAngles {
    /// Hour hand angle.
    pub hour: f64,
    /// Minute hand angle.
    pub minute: f64,
}

/// One hand's phase parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HandPhase {
    /// Added to world time before reduction.
    offset: u64,
    /// Time units per full turn. Never zero.
    period: u64,
}

impl HandPhase {
    /// Angle of this hand at `time`.
    fn angle_at(self, time: u64) -> f64 {
        let phase = time
            .wrapping_add(self.offset)
            .checked_rem(self.period)
            .unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let (phase, half_period) = (phase as f64, self.period as f64 / 2.0);
        (PI * (2.0 - phase / half_period)).rem_euclid(TAU)
    }
}

/// Validated time-to-angle mapping for both hands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dial {
    /// Hour hand phase.
    hour: HandPhase,
    /// Minute hand phase.
    minute: HandPhase,
}

impl Dial {
    /// Build a dial from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DialError::InvalidConfig`] if either period is zero.
    pub fn new(config: &DialConfig) -> Result<Self, DialError> {
        if config.hour_period == 0 {
            return Err(DialError::InvalidConfig {
                reason: "hour_period must be at least 1".to_owned(),
            });
        }
        if config.minute_period == 0 {
            return Err(DialError::InvalidConfig {
                reason: "minute_period must be at least 1".to_owned(),
            });
        }
        Ok(Self {
            hour: HandPhase {
                offset: config.hour_offset,
                period: config.hour_period,
            },
            minute: HandPhase {
                offset: config.minute_offset,
                period: config.minute_period,
            },
        })
    }

    /// Hand angles at world time `time`.
    pub fn angles_at(&self, time: u64) -> HandAngles {
        HandAngles {
            hour: self.hour.angle_at(time),
            minute: self.minute.angle_at(time),
        }
    }
}

impl Default for Dial {
    fn default() -> Self {
        let config = DialConfig::default();
        Self {
            hour: HandPhase {
                offset: config.hour_offset,
                period: config.hour_period,
            },
            minute: HandPhase {
                offset: config.minute_offset,
                period: config.minute_period,
            },
        }
    }
}
