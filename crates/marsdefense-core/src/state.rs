//! Read-only snapshot handed to the renderer each frame.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, CombatEvent};
use crate::types::{SimTime, Vec2};

/// Complete observable state after one frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    pub player: Option<ShipView>,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub wave: WaveView,
    pub weapons: Vec<WeaponView>,
    pub progression: ProgressionView,
    /// Damage/kill/reward events raised during this frame.
    pub combat_events: Vec<CombatEvent>,
    /// Audio cues raised during this frame.
    pub audio_events: Vec<AudioEvent>,
}

/// Coarse health band, used by renderers to pick colours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Healthy,
    Damaged,
    Critical,
    Destroyed,
}

impl Condition {
    pub fn from_hull(hp: f64, max_hp: f64, alive: bool) -> Self {
        if !alive {
            return Condition::Destroyed;
        }
        let fraction = if max_hp > 0.0 { hp / max_hp } else { 0.0 };
        if fraction > 0.6 {
            Condition::Healthy
        } else if fraction > 0.25 {
            Condition::Damaged
        } else {
            Condition::Critical
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub shield: f64,
    pub max_shield: f64,
    pub alive: bool,
    pub condition: Condition,
    pub overcharge_secs: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    /// Stable entity id (hecs entity bits).
    pub id: u64,
    pub enemy_type: EnemyType,
    pub level: u32,
    /// Experience listed for destroying this enemy.
    pub exp_value: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub condition: Condition,
    pub pattern: BehaviorPattern,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ProjectileView {
    Bomb {
        position: Vec2,
        velocity: Vec2,
        radius: f64,
        group_id: u32,
    },
    Shot {
        position: Vec2,
        velocity: Vec2,
        radius: f64,
        from_player: bool,
    },
    Beam {
        start: Vec2,
        end: Vec2,
        width: f64,
        remaining_secs: f64,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaveView {
    pub wave: u32,
    pub state: WaveState,
    pub enemies_to_spawn: u32,
    pub enemies_alive: u32,
    /// Countdown to the next wave while `state == Complete`.
    pub next_wave_in: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeaponView {
    pub slot: WeaponSlot,
    pub state: WeaponState,
    pub cooldown_remaining: f64,
    pub heat: Option<f64>,
    pub max_heat: Option<f64>,
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressionView {
    pub level: u32,
    pub exp: u32,
    pub exp_to_next: u32,
    pub stat_points: u32,
    pub attack: u32,
    pub defense: u32,
    pub evasion: u32,
    pub shield: u32,
    pub scrap: u32,
    pub perks: Vec<Perk>,
    pub kills: u32,
    pub bomb_level: u32,
    pub bomb_rarity: Rarity,
}
