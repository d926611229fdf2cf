//! ECS components for the hecs world.
//!
//! Components are plain data. Behaviour lives in the sim crate's systems.

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::*;
use crate::types::Vec2;

// --- Marker components ---

/// Marker for the player's ship.
#[derive(Debug, Clone, Copy)]
pub struct Player;

// --- Shared components ---

/// Kinematic state integrated every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Acceleration accumulated this frame (reset before integration).
    pub acceleration: Vec2,
    pub mass_kg: f64,
}

impl Kinematics {
    pub fn at(position: Vec2, mass_kg: f64) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            mass_kg,
        }
    }
}

/// Hull and shield energy pools, in joules.
///
/// Invariants: `0 <= hp <= max_hp`, `0 <= shield <= max_shield`,
/// and `alive` turns false exactly once, when `hp` reaches 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: f64,
    pub max_hp: f64,
    pub shield: f64,
    pub max_shield: f64,
    /// Shield capacity before progression bonuses.
    pub base_shield: f64,
    pub collision_radius: f64,
    pub alive: bool,
    /// Seconds since the last damage taken; gates shield regeneration.
    pub since_damage_secs: f64,
    /// Knockback impulse per sqrt(joule) of hull damage.
    pub knockback_factor: f64,
    /// Hull damage at or below this does not cause knockback.
    pub knockback_threshold: f64,
}

impl Vitals {
    pub fn new(hull: f64, shield: f64, collision_radius: f64) -> Self {
        Self {
            hp: hull,
            max_hp: hull,
            shield,
            max_shield: shield,
            base_shield: shield,
            collision_radius,
            alive: true,
            since_damage_secs: 0.0,
            knockback_factor: 0.0,
            knockback_threshold: 0.0,
        }
    }

    pub fn is_dead(&self) -> bool {
        !self.alive
    }
}

/// Derived combat modifiers, recomputed by progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifiers {
    /// Extra shrapnel payload per bomb (kg).
    pub explosive_bonus_kg: f64,
    /// Fraction of incoming joules ignored, in `[0, 0.75]`.
    pub damage_resistance: f64,
    /// Chance to evade a hit entirely, in `[0, 0.5]`.
    pub dodge_chance: f64,
    pub shield_capacity_bonus: f64,
    pub shield_regen_bonus: f64,
    /// Fire-rate multiplier; effective interval is `interval / cooldown_mult`.
    pub cooldown_mult: f64,
    pub explosive_damage_mult: f64,
    pub shield_capacity_mult: f64,
    pub drop_chance_mult: f64,
}

impl Default for StatModifiers {
    fn default() -> Self {
        Self {
            explosive_bonus_kg: 0.0,
            damage_resistance: 0.0,
            dodge_chance: 0.0,
            shield_capacity_bonus: 0.0,
            shield_regen_bonus: 0.0,
            cooldown_mult: 1.0,
            explosive_damage_mult: 1.0,
            shield_capacity_mult: 1.0,
            drop_chance_mult: 1.0,
        }
    }
}

/// Passive damage mitigation fractions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Armor {
    pub kinetic: f64,
    pub explosive: f64,
    pub energy: f64,
    pub shield_absorption: f64,
}

impl Armor {
    /// Armor fraction that applies to `kind`.
    pub fn fraction(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Kinetic => self.kinetic,
            DamageKind::Explosive => self.explosive,
            DamageKind::Energy => self.energy,
        }
    }
}

// --- Player components ---

/// Thrust-and-drag handling of a player hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipHandling {
    pub thrust: f64,
    pub drag: f64,
    pub max_velocity: f64,
}

impl Default for ShipHandling {
    fn default() -> Self {
        Self {
            thrust: SHIP_THRUST,
            drag: SHIP_DRAG,
            max_velocity: SHIP_MAX_VELOCITY,
        }
    }
}

/// Time-limited buffs on the player ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Buffs {
    /// Remaining overcharge time; zero when inactive.
    pub overcharge_secs: f64,
}

impl Buffs {
    pub fn overcharged(&self) -> bool {
        self.overcharge_secs > 0.0
    }
}

// --- Enemy components ---

/// Identity and reward data of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub enemy_type: EnemyType,
    pub level: u32,
    pub exp_value: u32,
}

/// Per-enemy behaviour and fire timers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyBrain {
    pub pattern: BehaviorPattern,
    /// Lateral velocity the steering converges on.
    pub target_vx: f64,
    /// Seconds until the pattern is re-rolled.
    pub behavior_timer: f64,
    /// Seconds until the next fire window.
    pub fire_timer: f64,
    /// Shots left in the current burst.
    pub burst_remaining: u32,
}
