//! Events emitted by the simulation for audio, effects and progression.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::Vec2;

/// Fire-and-forget cues for the sound system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    /// A player weapon discharged.
    WeaponFired { slot: WeaponSlot },
    /// An enemy weapon discharged.
    EnemyFired { weapon: EnemyWeaponKind },
    /// A bomb detonated. `size` is a visual/loudness hint.
    Explosion { position: Vec2, size: f64 },
    /// A kinetic shot struck something.
    Impact { position: Vec2 },
    EntityDied { position: Vec2, is_player: bool },
    /// The cannon crossed its heat limit.
    Overheated,
    LevelUp { level: u32 },
    WaveStarted { wave: u32 },
}

/// Damage, kill and reward notifications for floating text and particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    Hit {
        position: Vec2,
        joules: f64,
        kind: DamageKind,
        on_player: bool,
        /// True when the hit was lethal.
        was_critical: bool,
    },
    Evaded { position: Vec2, on_player: bool },
    Kill {
        position: Vec2,
        enemy_type: EnemyType,
        level: u32,
    },
    ScrapDropped { position: Vec2, amount: u32 },
    LevelUp { level: u32 },
}
