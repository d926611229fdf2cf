//! Player input and commands sent to the simulation.

use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Directional thrust held this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrustInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Per-frame input snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameInput {
    pub thrust: ThrustInput,
    /// Weapon slots triggered this frame, in order.
    pub fire: Vec<WeaponSlot>,
}

impl FrameInput {
    pub fn firing(slots: &[WeaponSlot]) -> Self {
        Self {
            thrust: ThrustInput::default(),
            fire: slots.to_vec(),
        }
    }
}

/// Out-of-band commands, applied at the next frame boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// Spend a stat point.
    AllocateStat { attribute: Attribute },
    /// Buy a perk with scrap.
    PurchasePerk { perk: Perk },
    /// Swap the breach-bomb warhead for a standard bomb of this level.
    EquipBomb { level: u32, rarity: Rarity },
    /// Re-rate the universal cannon.
    UpgradeCannon { level: u32, rarity: Rarity },

    Pause,
    Resume,
}
