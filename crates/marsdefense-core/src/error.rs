//! Recoverable error types.
//!
//! Weapon rejections (cooldown, heat, ammo) are ordinary control flow and are
//! not represented here; see the sim crate's `weapons::FireRejection`.

use std::fmt;

use crate::enums::{Attribute, Perk};

/// Failure to load or validate a [`crate::config::SimConfig`].
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    Io {
        path: String,
        source: std::io::Error,
    },
    /// The file is not valid TOML for the config schema.
    Parse(toml::de::Error),
    /// A value parsed but is outside its usable range.
    Invalid {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "failed to read config '{}': {}", path, source)
            }
            ConfigError::Parse(err) => write!(f, "failed to parse config: {}", err),
            ConfigError::Invalid {
                field,
                value,
                expected,
            } => write!(
                f,
                "config field '{}' = {} is invalid (expected {})",
                field, value, expected
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Invalid { .. } => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err)
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A progression command that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    NoStatPoints { attribute: Attribute },
    PerkOwned { perk: Perk },
    InsufficientScrap { perk: Perk, cost: u32, available: u32 },
    /// No weapon record exists for the requested level.
    UnknownLevel { level: u32, max: u32 },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NoStatPoints { attribute } => {
                write!(f, "no stat points available to raise {:?}", attribute)
            }
            CommandError::PerkOwned { perk } => write!(f, "perk {:?} already owned", perk),
            CommandError::InsufficientScrap {
                perk,
                cost,
                available,
            } => write!(
                f,
                "perk {:?} costs {} scrap, only {} available",
                perk, cost, available
            ),
            CommandError::UnknownLevel { level, max } => {
                write!(f, "no weapon record for level {} (valid 1..={})", level, max)
            }
        }
    }
}

impl std::error::Error for CommandError {}

pub type CommandResult<T> = Result<T, CommandError>;
