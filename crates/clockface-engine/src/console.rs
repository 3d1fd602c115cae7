//! Console front-end: parsing command lines and reading them from stdin.
//!
//! Commands:
//!
//! ```text
//! add <name> <radius> <hour-material> <minute-material> [x y z yaw]
//! delete <name>
//! list
//! help
//! ```
//!
//! Without a position, `add` places the clock at the console's anchor
//! facing the default direction. Lines are read on a dedicated OS thread
//! so a pending read never holds up runtime shutdown.

use std::io::BufRead;

use clockface_types::{BlockPos, Material};
use tokio::sync::mpsc;
use tracing::warn;

/// Anchor used by `add` when no position is given.
pub const DEFAULT_ANCHOR: BlockPos = BlockPos::new(0, 64, 0);

/// Yaw used by `add` when none is given; faces quarter turn 0.
pub const DEFAULT_YAW: f64 = 180.0;

/// Usage text printed by `help` and on malformed commands.
pub const USAGE: &str = "\
commands:
  add <name> <radius> <hour-material> <minute-material> [x y z yaw]
  delete <name>
  list
  help";

/// Errors that can occur when parsing a console line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The first word is not a known command.
    #[error("unknown command '{command}'")]
    UnknownCommand {
        /// The word that was given.
        command: String,
    },

    /// A known command was given the wrong number of arguments.
    #[error("usage: {usage}")]
    Usage {
        /// Correct form of the command.
        usage: &'static str,
    },

    /// A numeric argument did not parse.
    #[error("'{value}' is not a valid number")]
    NotANumber {
        /// The argument as typed.
        value: String,
    },
}

/// Arguments of an `add` command.
#[derive(Debug, Clone, PartialEq)]
pub struct AddClock {
    /// Clock name.
    pub name: String,
    /// Radius as typed; range-checked at validation.
    pub radius: i64,
    /// Hour hand block type.
    pub hour_hand_material: Material,
    /// Minute hand block type.
    pub minute_hand_material: Material,
    /// Anchor voxel.
    pub position: BlockPos,
    /// Look yaw in degrees.
    pub yaw: f64,
}

/// One parsed console command.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Create a clock.
    Add(AddClock),
    /// Remove a clock by name.
    Delete {
        /// Clock name.
        name: String,
    },
    /// Print every clock.
    List,
    /// Print usage.
    Help,
}

/// Parse one console line. Blank lines parse to `None`.
///
/// # Errors
///
/// Returns [`ParseError`] for unknown commands, wrong argument counts, and
/// unparseable numbers.
pub fn parse_line(line: &str) -> Result<Option<ConsoleCommand>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [] => return Ok(None),
        ["add", name, radius, hour, minute] => ConsoleCommand::Add(AddClock {
            name: (*name).to_owned(),
            radius: parse_number(radius)?,
            hour_hand_material: Material::new(hour),
            minute_hand_material: Material::new(minute),
            position: DEFAULT_ANCHOR,
            yaw: DEFAULT_YAW,
        }),
        ["add", name, radius, hour, minute, x, y, z, yaw] => ConsoleCommand::Add(AddClock {
            name: (*name).to_owned(),
            radius: parse_number(radius)?,
            hour_hand_material: Material::new(hour),
            minute_hand_material: Material::new(minute),
            position: BlockPos::new(parse_number(x)?, parse_number(y)?, parse_number(z)?),
            yaw: parse_number(yaw)?,
        }),
        ["add", ..] => {
            return Err(ParseError::Usage {
                usage: "add <name> <radius> <hour-material> <minute-material> [x y z yaw]",
            });
        }
        ["delete", name] => ConsoleCommand::Delete {
            name: (*name).to_owned(),
        },
        ["delete", ..] => {
            return Err(ParseError::Usage {
                usage: "delete <name>",
            });
        }
        ["list"] => ConsoleCommand::List,
        ["help"] => ConsoleCommand::Help,
        [other, ..] => {
            return Err(ParseError::UnknownCommand {
                command: (*other).to_owned(),
            });
        }
    };
    Ok(Some(command))
}

/// Parse a numeric argument.
fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().ok().ok_or_else(|| ParseError::NotANumber {
        value: value.to_owned(),
    })
}

/// Forward stdin lines into `lines` from a dedicated thread. The thread
/// ends at EOF, on a read error, or once the receiver is dropped; dropping
/// its sender closes the channel.
///
/// # Errors
///
/// Returns the I/O error if the thread cannot be spawned.
pub fn spawn_stdin_reader(lines: mpsc::Sender<String>) -> std::io::Result<()> {
    std::thread::Builder::new()
        .name("clockface-console".to_owned())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                match line {
                    Ok(line) => {
                        if lines.blocking_send(line).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Console read failed, closing console");
                        break;
                    }
                }
            }
        })?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   "), Ok(None));
    }

    #[test]
    fn add_with_defaults() {
        let Some(ConsoleCommand::Add(add)) = parse_line("add tower 7 stone gold_block").unwrap() else {
            panic!("expected add");
        };
        assert_eq!(add.name, "tower");
        assert_eq!(add.radius, 7);
        assert_eq!(add.hour_hand_material.as_str(), "STONE");
        assert_eq!(add.minute_hand_material.as_str(), "GOLD_BLOCK");
        assert_eq!(add.position, DEFAULT_ANCHOR);
        assert_eq!(add.yaw, DEFAULT_YAW);
    }

    #[test]
    fn add_with_position_and_yaw() {
        let Some(ConsoleCommand::Add(add)) =
            parse_line("add tower 7 stone iron_block -10 70 25 -90.5").unwrap()
        else {
            panic!("expected add");
        };
        assert_eq!(add.position, BlockPos::new(-10, 70, 25));
        assert_eq!(add.yaw, -90.5);
    }

    #[test]
    fn add_rejects_bad_numbers() {
        assert_eq!(
            parse_line("add tower seven stone iron_block"),
            Err(ParseError::NotANumber {
                value: "seven".to_owned()
            })
        );
        assert!(matches!(
            parse_line("add tower 7 stone iron_block 1 2 z 0"),
            Err(ParseError::NotANumber { .. })
        ));
    }

    #[test]
    fn wrong_arity_reports_usage() {
        assert!(matches!(parse_line("add tower 7"), Err(ParseError::Usage { .. })));
        assert!(matches!(parse_line("delete"), Err(ParseError::Usage { .. })));
        assert!(matches!(parse_line("delete a b"), Err(ParseError::Usage { .. })));
    }

    #[test]
    fn simple_commands() {
        assert_eq!(
            parse_line("delete tower"),
            Ok(Some(ConsoleCommand::Delete {
                name: "tower".to_owned()
            }))
        );
        assert_eq!(parse_line("list"), Ok(Some(ConsoleCommand::List)));
        assert_eq!(parse_line(" help "), Ok(Some(ConsoleCommand::Help)));
    }

    #[test]
    fn unknown_commands_are_named() {
        assert_eq!(
            parse_line("spin tower"),
            Err(ParseError::UnknownCommand {
                command: "spin".to_owned()
            })
        );
    }
}
