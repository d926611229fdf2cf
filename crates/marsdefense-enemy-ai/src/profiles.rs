//! Enemy-type profiles and weapon loadouts.
//!
//! Consolidates per-type parameters for spawning, behaviour and fire control.

use marsdefense_core::components::Armor;
use marsdefense_core::constants::*;
use marsdefense_core::enums::{EnemyType, EnemyWeaponKind};

/// Static parameters for an enemy hull class.
pub struct EnemyProfile {
    /// Hull energy at level 1 (J).
    pub base_hp: f64,
    /// Collision radius before the per-level growth.
    pub base_radius: f64,
    /// Experience value at level 1 (shown to the player).
    pub base_exp: u32,
    /// Extra experience the player earns for this type.
    pub exp_type_bonus: u32,
    pub armor: Armor,
    /// Multiplier on the time between fire windows.
    pub fire_interval_factor: f64,
    /// The player must be within this distance for any weapon to fire.
    pub engagement_range: f64,
    /// Fires three-shot bursts from the primary weapon instead of rolling per weapon.
    pub burst_fire: bool,
}

/// Get the profile for a given enemy type.
pub fn get_profile(enemy_type: EnemyType) -> EnemyProfile {
    match enemy_type {
        EnemyType::Fighter => EnemyProfile {
            base_hp: 1500.0,
            base_radius: 12.0,
            base_exp: 10,
            exp_type_bonus: 0,
            armor: Armor::default(),
            fire_interval_factor: 1.0,
            engagement_range: 400.0,
            burst_fire: false,
        },
        EnemyType::Bomber => EnemyProfile {
            base_hp: 4000.0,
            base_radius: 16.0,
            base_exp: 15,
            exp_type_bonus: 5,
            armor: Armor {
                kinetic: 0.15,
                explosive: 0.1,
                energy: 0.0,
                shield_absorption: 0.0,
            },
            fire_interval_factor: 1.5,
            engagement_range: 500.0,
            burst_fire: false,
        },
        EnemyType::Scout => EnemyProfile {
            base_hp: 800.0,
            base_radius: 8.0,
            base_exp: 8,
            exp_type_bonus: 3,
            armor: Armor::default(),
            fire_interval_factor: 0.7,
            engagement_range: 300.0,
            burst_fire: true,
        },
    }
}

/// Hull energy of an enemy at `level`.
pub fn max_hp(enemy_type: EnemyType, level: u32) -> f64 {
    get_profile(enemy_type).base_hp * (1.0 + level.saturating_sub(1) as f64 * ENEMY_HP_PER_LEVEL)
}

/// Collision radius of an enemy at `level`.
pub fn collision_radius(enemy_type: EnemyType, level: u32) -> f64 {
    (get_profile(enemy_type).base_radius + level as f64 * ENEMY_RADIUS_PER_LEVEL).max(4.0)
}

/// Experience value displayed for an enemy at `level`.
pub fn exp_value(enemy_type: EnemyType, level: u32) -> u32 {
    get_profile(enemy_type).base_exp + level.saturating_sub(1) * ENEMY_EXP_PER_LEVEL
}

/// Firing characteristics of one enemy weapon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyWeaponSpec {
    pub kind: EnemyWeaponKind,
    /// Shots per second.
    pub fire_rate: f64,
    pub projectile_speed: f64,
    /// 0..1; 1 fires exactly on the lead point.
    pub accuracy: f64,
    pub ammo: Option<u32>,
    pub projectile_mass_kg: f64,
    pub max_range: f64,
}

impl EnemyWeaponSpec {
    pub fn blaster(level: u32) -> Self {
        let l = level as f64;
        Self {
            kind: EnemyWeaponKind::Blaster,
            fire_rate: 2.0 + l * 0.3,
            projectile_speed: 200.0 + l * 20.0,
            accuracy: (0.7 + l * 0.05).min(1.0),
            ammo: None,
            projectile_mass_kg: ENEMY_SHOT_MASS_KG,
            max_range: ENEMY_WEAPON_MAX_RANGE,
        }
    }

    pub fn cannon(level: u32) -> Self {
        let l = level as f64;
        Self {
            kind: EnemyWeaponKind::Cannon,
            fire_rate: 1.5 + l * 0.2,
            projectile_speed: 300.0 + l * 30.0,
            accuracy: (0.8 + l * 0.03).min(1.0),
            ammo: None,
            projectile_mass_kg: ENEMY_SHOT_MASS_KG,
            max_range: ENEMY_WEAPON_MAX_RANGE,
        }
    }

    pub fn missile_launcher(level: u32) -> Self {
        let l = level as f64;
        Self {
            kind: EnemyWeaponKind::MissileLauncher,
            fire_rate: 0.5 + l * 0.1,
            projectile_speed: 150.0 + l * 15.0,
            accuracy: 0.9,
            ammo: Some(6 + level),
            projectile_mass_kg: ENEMY_MISSILE_MASS_KG,
            max_range: ENEMY_WEAPON_MAX_RANGE,
        }
    }

    /// Seconds between shots.
    pub fn interval(&self) -> f64 {
        1.0 / self.fire_rate
    }
}

/// Weapons carried by an enemy of this type and level. The first entry is the primary.
pub fn loadout(enemy_type: EnemyType, level: u32) -> Vec<EnemyWeaponSpec> {
    match enemy_type {
        EnemyType::Fighter => {
            let mut weapons = vec![EnemyWeaponSpec::blaster(level)];
            if level >= 3 {
                weapons.push(EnemyWeaponSpec::cannon(level - 1));
            }
            weapons
        }
        EnemyType::Bomber => vec![
            EnemyWeaponSpec::missile_launcher(level),
            EnemyWeaponSpec::blaster(level.saturating_sub(1).max(1)),
        ],
        EnemyType::Scout => {
            let mut rapid = EnemyWeaponSpec::blaster(level);
            rapid.fire_rate *= 1.5;
            rapid.projectile_mass_kg *= 0.8;
            vec![rapid]
        }
    }
}
