//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Overall run phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
    /// The player ship was destroyed. Terminal.
    GameOver,
}

/// Damage channel, used to pick the matching armor fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Kinetic,
    Explosive,
    Energy,
}

/// Beam falloff profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamType {
    /// Linear falloff to 10% at 200 units.
    #[default]
    Continuous,
    /// Linear falloff to 5% at 150 units.
    Pulse,
    /// No falloff.
    Unmodulated,
}

/// Item rarity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Relic,
}

/// Enemy hull class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    #[default]
    Fighter,
    Bomber,
    Scout,
}

/// Lateral movement pattern of an enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorPattern {
    #[default]
    Straight,
    Zigzag,
    TowardPlayer,
    Evasive,
}

/// Player weapon slots addressable from input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponSlot {
    Cannon,
    BreachBomb,
    ClusterStrike,
    Overcharge,
    PulseLance,
}

/// Enemy weapon families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyWeaponKind {
    Blaster,
    Cannon,
    MissileLauncher,
}

/// Observable firing state of a weapon instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Ready,
    /// Waiting out the per-shot interval.
    Cooling,
    /// Heat at or above the limit; clears only as heat decays.
    Overheated,
    /// Ammunition exhausted for the rest of the run.
    Empty,
}

/// Wave lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveState {
    #[default]
    Spawning,
    Active,
    Complete,
}

/// Allocatable player attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Attack,
    Defense,
    Evasion,
    Shield,
}

/// One-time perks bought with scrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Perk {
    ExplosiveMaster,
    ShieldBoost,
    RapidReload,
    LuckyDrops,
}

impl Perk {
    pub const ALL: [Perk; 4] = [
        Perk::ExplosiveMaster,
        Perk::ShieldBoost,
        Perk::RapidReload,
        Perk::LuckyDrops,
    ];

    /// Price in Kerr scrap.
    pub fn cost(self) -> u32 {
        match self {
            Perk::ExplosiveMaster => 50,
            Perk::ShieldBoost => 40,
            Perk::RapidReload => 60,
            Perk::LuckyDrops => 30,
        }
    }
}
