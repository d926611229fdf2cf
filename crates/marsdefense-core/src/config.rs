//! Run configuration, optionally loaded from TOML.
//!
//! Every field defaults to the matching value in [`crate::constants`], so a
//! config file only needs the keys it wants to override:
//!
//! ```toml
//! seed = 7
//! first_wave = 3
//!
//! [arena]
//! width = 1280.0
//! height = 720.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::{ConfigError, ConfigResult};

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed and inputs = same simulation.
    pub seed: u64,
    /// Multiplier applied to every supplied dt (1.0 = normal).
    pub time_scale: f64,
    /// Wave number the run starts on.
    pub first_wave: u32,
    pub arena: ArenaConfig,
    pub ship: ShipConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            time_scale: 1.0,
            first_wave: 1,
            arena: ArenaConfig::default(),
            ship: ShipConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

/// Player hull tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    pub thrust: f64,
    pub mass_kg: f64,
    pub max_velocity: f64,
    pub drag: f64,
    pub hull_joules: f64,
    pub shield_joules: f64,
    pub radius: f64,
}

impl Default for ShipConfig {
    fn default() -> Self {
        Self {
            thrust: SHIP_THRUST,
            mass_kg: SHIP_MASS_KG,
            max_velocity: SHIP_MAX_VELOCITY,
            drag: SHIP_DRAG,
            hull_joules: SHIP_HULL_JOULES,
            shield_joules: SHIP_SHIELD_JOULES,
            radius: SHIP_RADIUS,
        }
    }
}

impl SimConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        let config: SimConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> ConfigResult<()> {
        positive("time_scale", self.time_scale)?;
        positive("arena.width", self.arena.width)?;
        positive("arena.height", self.arena.height)?;
        positive("ship.thrust", self.ship.thrust)?;
        positive("ship.mass_kg", self.ship.mass_kg)?;
        positive("ship.max_velocity", self.ship.max_velocity)?;
        positive("ship.hull_joules", self.ship.hull_joules)?;
        positive("ship.radius", self.ship.radius)?;
        non_negative("ship.drag", self.ship.drag)?;
        non_negative("ship.shield_joules", self.ship.shield_joules)?;
        if self.first_wave == 0 {
            return Err(ConfigError::Invalid {
                field: "first_wave",
                value: 0.0,
                expected: ">= 1",
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            expected: "a finite value > 0",
        })
    }
}

fn non_negative(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            expected: "a finite value >= 0",
        })
    }
}
