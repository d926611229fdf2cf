//! Static weapon records: standard bombs, kinetic rounds and energy weapons.

use serde::{Deserialize, Serialize};

use crate::enums::{BeamType, Rarity};

/// A standard bomb record after its rarity multiplier has been applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BombStats {
    pub level: u32,
    pub rarity: Rarity,
    /// Rated damage band shown to the player.
    pub min_damage: u32,
    pub max_damage: u32,
    pub mass_kg: f64,
    pub velocity_kmh: f64,
    pub diameter_mm: f64,
    pub length_mm: f64,
    pub shrapnel_kg: f64,
    /// Rarity damage multiplier.
    pub damage_mult: f64,
}

struct BombRecord {
    min_damage: u32,
    max_damage: u32,
    mass_kg: f64,
    velocity_kmh: f64,
    diameter_mm: f64,
    length_mm: f64,
    shrapnel_kg: f64,
}

const fn record(
    min_damage: u32,
    max_damage: u32,
    mass_kg: f64,
    velocity_kmh: f64,
    diameter_mm: f64,
    length_mm: f64,
    shrapnel_kg: f64,
) -> BombRecord {
    BombRecord {
        min_damage,
        max_damage,
        mass_kg,
        velocity_kmh,
        diameter_mm,
        length_mm,
        shrapnel_kg,
    }
}

/// Levels 1 through 13.
const STANDARD_BOMBS: [BombRecord; 13] = [
    record(1, 3, 50.0, 792.0, 75.0, 300.0, 5.0),
    record(2, 6, 165.0, 851.0, 95.0, 380.0, 16.5),
    record(3, 9, 280.0, 910.0, 110.0, 450.0, 28.0),
    record(5, 12, 395.0, 969.0, 125.0, 520.0, 39.5),
    record(7, 15, 510.0, 1028.0, 140.0, 590.0, 51.0),
    record(9, 18, 625.0, 1087.0, 155.0, 660.0, 62.5),
    record(11, 21, 740.0, 1146.0, 170.0, 730.0, 74.0),
    record(13, 24, 855.0, 1205.0, 185.0, 800.0, 85.5),
    record(14, 27, 970.0, 1264.0, 200.0, 870.0, 97.0),
    record(15, 30, 1085.0, 1323.0, 215.0, 940.0, 108.5),
    record(16, 33, 1200.0, 1382.0, 230.0, 1010.0, 120.0),
    record(17, 36, 1315.0, 1441.0, 245.0, 1080.0, 131.5),
    record(15, 30, 1350.0, 1441.0, 250.0, 1100.0, 135.0),
];

/// Number of standard bomb levels.
pub const STANDARD_BOMB_LEVELS: u32 = STANDARD_BOMBS.len() as u32;

/// Rarity multiplier for bomb damage. Levels 1 and 2 carry their own tables.
pub fn bomb_rarity_multiplier(level: u32, rarity: Rarity) -> f64 {
    match (level, rarity) {
        (1, Rarity::Common | Rarity::Uncommon) => 1.0,
        (1, Rarity::Rare | Rarity::Epic) => 1.33,
        (1, Rarity::Legendary | Rarity::Mythic) => 1.67,
        (1, Rarity::Relic) => 2.0,
        (2, Rarity::Common) => 1.0,
        (2, Rarity::Uncommon | Rarity::Rare | Rarity::Epic) => 1.17,
        (2, Rarity::Legendary | Rarity::Mythic) => 1.33,
        (2, Rarity::Relic) => 1.5,
        (_, Rarity::Common) => 1.0,
        (_, Rarity::Uncommon) => 1.1,
        (_, Rarity::Rare) => 1.2,
        (_, Rarity::Epic) => 1.35,
        (_, Rarity::Legendary) => 1.5,
        (_, Rarity::Mythic) => 1.75,
        (_, Rarity::Relic) => 2.0,
    }
}

/// Look up a standard bomb. Returns `None` outside levels 1..=13.
pub fn standard_bomb(level: u32, rarity: Rarity) -> Option<BombStats> {
    let index = usize::try_from(level).ok()?.checked_sub(1)?;
    STANDARD_BOMBS
        .get(index)
        .map(|base| rate(base, level, rarity))
}

/// The level-1 common bomb every ship launches with.
pub fn starter_bomb() -> BombStats {
    rate(&STANDARD_BOMBS[0], 1, Rarity::Common)
}

fn rate(base: &BombRecord, level: u32, rarity: Rarity) -> BombStats {
    let damage_mult = bomb_rarity_multiplier(level, rarity);
    BombStats {
        level,
        rarity,
        min_damage: (base.min_damage as f64 * damage_mult) as u32,
        max_damage: (base.max_damage as f64 * damage_mult) as u32,
        mass_kg: base.mass_kg,
        velocity_kmh: base.velocity_kmh,
        diameter_mm: base.diameter_mm,
        length_mm: base.length_mm,
        shrapnel_kg: base.shrapnel_kg,
        damage_mult,
    }
}

// --- Kinetic rounds ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KineticRoundType {
    ArmorPiercing,
    HighExplosive,
    Incendiary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KineticRound {
    pub mass_kg: f64,
    pub velocity_kmh: f64,
    pub diameter_mm: f64,
    pub length_mm: f64,
}

pub fn kinetic_round(round: KineticRoundType) -> KineticRound {
    match round {
        KineticRoundType::ArmorPiercing => KineticRound {
            mass_kg: 0.5,
            velocity_kmh: 5000.0,
            diameter_mm: 15.0,
            length_mm: 80.0,
        },
        KineticRoundType::HighExplosive => KineticRound {
            mass_kg: 0.8,
            velocity_kmh: 4500.0,
            diameter_mm: 20.0,
            length_mm: 60.0,
        },
        KineticRoundType::Incendiary => KineticRound {
            mass_kg: 0.3,
            velocity_kmh: 4800.0,
            diameter_mm: 12.0,
            length_mm: 70.0,
        },
    }
}

// --- Energy weapons ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnergyWeaponType {
    PulseLaser,
    PlasmaCannon,
    IonBeam,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyWeaponSpec {
    pub power_mw: f64,
    pub duration_ms: f64,
    pub beam_diameter_mm: f64,
    pub range_km: f64,
    pub beam_type: BeamType,
}

pub fn energy_weapon(weapon: EnergyWeaponType) -> EnergyWeaponSpec {
    match weapon {
        EnergyWeaponType::PulseLaser => EnergyWeaponSpec {
            power_mw: 50.0,
            duration_ms: 100.0,
            beam_diameter_mm: 5.0,
            range_km: 10.0,
            beam_type: BeamType::Pulse,
        },
        EnergyWeaponType::PlasmaCannon => EnergyWeaponSpec {
            power_mw: 150.0,
            duration_ms: 200.0,
            beam_diameter_mm: 20.0,
            range_km: 8.0,
            beam_type: BeamType::Continuous,
        },
        EnergyWeaponType::IonBeam => EnergyWeaponSpec {
            power_mw: 200.0,
            duration_ms: 50.0,
            beam_diameter_mm: 2.0,
            range_km: 15.0,
            beam_type: BeamType::Continuous,
        },
    }
}
