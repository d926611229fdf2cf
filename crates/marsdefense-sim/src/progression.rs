//! Experience, levels, attributes, perks and scrap drops.
//!
//! The only producer of [`StatModifiers`]. Modifiers are recomputed when a
//! stat point is spent or a perk is bought; the engine pulls them with
//! [`ProgressionSystem::take_dirty`] at the next frame boundary.

use rand::Rng;
use tracing::info;

use marsdefense_core::components::StatModifiers;
use marsdefense_core::constants::*;
use marsdefense_core::enums::{Attribute, EnemyType, Perk, Rarity};
use marsdefense_core::error::{CommandError, CommandResult};
use marsdefense_core::events::{AudioEvent, CombatEvent};
use marsdefense_core::state::ProgressionView;

use marsdefense_enemy_ai::profiles::get_profile;

use crate::frame_events::FrameEvents;
use crate::projectiles::KillRecord;

/// Experience for destroying an enemy of `enemy_type` at `level`.
pub fn kill_experience(enemy_type: EnemyType, level: u32) -> u32 {
    EXP_BASE_PER_KILL + EXP_PER_ENEMY_LEVEL * level + get_profile(enemy_type).exp_type_bonus
}

/// Experience needed to leave `level`.
pub fn exp_requirement(level: u32) -> u32 {
    LEVEL_UP_BASE_EXP + LEVEL_UP_EXP_STEP * level.saturating_sub(1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressionSystem {
    pub level: u32,
    pub exp: u32,
    pub stat_points: u32,
    pub attack: u32,
    pub defense: u32,
    pub evasion: u32,
    pub shield: u32,
    /// Kerr scrap on hand.
    pub scrap: u32,
    pub perks: Vec<Perk>,
    pub kills: u32,
    dirty: bool,
}

impl Default for ProgressionSystem {
    fn default() -> Self {
        Self {
            level: 1,
            exp: 0,
            stat_points: 0,
            attack: 1,
            defense: 1,
            evasion: 1,
            shield: 1,
            scrap: 0,
            perks: Vec::new(),
            kills: 0,
            dirty: true,
        }
    }
}

impl ProgressionSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exp_to_next(&self) -> u32 {
        exp_requirement(self.level)
    }

    pub fn has_perk(&self, perk: Perk) -> bool {
        self.perks.contains(&perk)
    }

    /// Add experience, levelling as many times as it pays for.
    /// Returns the levels reached, in order.
    pub fn add_experience(&mut self, amount: u32) -> Vec<u32> {
        self.exp += amount;
        let mut reached = Vec::new();
        while self.exp >= self.exp_to_next() {
            self.exp -= self.exp_to_next();
            self.level += 1;
            self.stat_points += STAT_POINTS_PER_LEVEL;
            reached.push(self.level);
        }
        reached
    }

    pub fn allocate(&mut self, attribute: Attribute) -> CommandResult<()> {
        if self.stat_points == 0 {
            return Err(CommandError::NoStatPoints { attribute });
        }
        let slot = match attribute {
            Attribute::Attack => &mut self.attack,
            Attribute::Defense => &mut self.defense,
            Attribute::Evasion => &mut self.evasion,
            Attribute::Shield => &mut self.shield,
        };
        *slot += 1;
        self.stat_points -= 1;
        self.dirty = true;
        Ok(())
    }

    /// Buy a perk. Returns the scrap spent.
    pub fn purchase_perk(&mut self, perk: Perk) -> CommandResult<u32> {
        if self.has_perk(perk) {
            return Err(CommandError::PerkOwned { perk });
        }
        let cost = perk.cost();
        if self.scrap < cost {
            return Err(CommandError::InsufficientScrap {
                perk,
                cost,
                available: self.scrap,
            });
        }
        self.scrap -= cost;
        self.perks.push(perk);
        self.dirty = true;
        Ok(cost)
    }

    /// Returns true once after any change that affects the modifiers.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn modifiers(&self) -> StatModifiers {
        let above = |points: u32| points.saturating_sub(1) as f64;
        let mut mods = StatModifiers {
            explosive_bonus_kg: above(self.attack) * EXPLOSIVE_BONUS_PER_ATTACK_KG,
            damage_resistance: (above(self.defense) * RESISTANCE_PER_DEFENSE)
                .min(MAX_DAMAGE_RESISTANCE),
            dodge_chance: (above(self.evasion) * DODGE_PER_EVASION).min(MAX_DODGE_CHANCE),
            shield_capacity_bonus: above(self.shield) * SHIELD_CAPACITY_PER_POINT,
            shield_regen_bonus: above(self.shield) * SHIELD_REGEN_PER_POINT,
            ..StatModifiers::default()
        };
        for perk in &self.perks {
            match perk {
                Perk::ExplosiveMaster => mods.explosive_damage_mult *= 1.25,
                Perk::ShieldBoost => mods.shield_capacity_mult *= 1.5,
                Perk::RapidReload => mods.cooldown_mult *= 4.0 / 3.0,
                Perk::LuckyDrops => mods.drop_chance_mult *= 1.5,
            }
        }
        mods
    }

    /// Scrap dropped by an enemy of `enemy_level`, if any.
    pub fn roll_drop(&self, enemy_level: u32, rng: &mut impl Rng) -> Option<u32> {
        let chance = BASE_DROP_CHANCE * self.modifiers().drop_chance_mult;
        if rng.gen::<f64>() >= chance {
            return None;
        }
        Some(rng.gen_range(1..=3) + enemy_level.saturating_sub(1))
    }

    /// Credit a kill: experience, level-ups and any scrap drop.
    pub fn record_kill(&mut self, kill: &KillRecord, rng: &mut impl Rng, events: &mut FrameEvents) {
        self.kills += 1;

        for level in self.add_experience(kill_experience(kill.enemy_type, kill.level)) {
            info!(level, "player levelled up");
            events.combat(CombatEvent::LevelUp { level });
            events.audio(AudioEvent::LevelUp { level });
        }

        if let Some(amount) = self.roll_drop(kill.level, rng) {
            self.scrap += amount;
            events.combat(CombatEvent::ScrapDropped {
                position: kill.position,
                amount,
            });
        }
    }

    pub fn view(&self, bomb_level: u32, bomb_rarity: Rarity) -> ProgressionView {
        ProgressionView {
            level: self.level,
            exp: self.exp,
            exp_to_next: self.exp_to_next(),
            stat_points: self.stat_points,
            attack: self.attack,
            defense: self.defense,
            evasion: self.evasion,
            shield: self.shield,
            scrap: self.scrap,
            perks: self.perks.clone(),
            kills: self.kills,
            bomb_level,
            bomb_rarity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsdefense_core::types::Vec2;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_kill_experience_by_type() {
        assert_eq!(kill_experience(EnemyType::Fighter, 1), 12);
        assert_eq!(kill_experience(EnemyType::Bomber, 2), 19);
        assert_eq!(kill_experience(EnemyType::Scout, 3), 19);
    }

    #[test]
    fn test_thresholds_grow_by_fifty() {
        assert_eq!(exp_requirement(1), 100);
        assert_eq!(exp_requirement(2), 150);
        assert_eq!(exp_requirement(4), 250);
    }

    #[test]
    fn test_multiple_level_ups_from_one_grant() {
        let mut p = ProgressionSystem::new();
        let reached = p.add_experience(260);
        assert_eq!(reached, vec![2, 3]);
        assert_eq!(p.level, 3);
        assert_eq!(p.exp, 10);
        assert_eq!(p.stat_points, 2);
    }

    #[test]
    fn test_allocation_requires_points() {
        let mut p = ProgressionSystem::new();
        assert_eq!(
            p.allocate(Attribute::Defense),
            Err(CommandError::NoStatPoints {
                attribute: Attribute::Defense
            })
        );
        p.stat_points = 1;
        p.take_dirty();
        p.allocate(Attribute::Defense).unwrap();
        assert_eq!(p.defense, 2);
        assert!(p.take_dirty());
        assert!(!p.take_dirty());
    }

    #[test]
    fn test_derived_modifiers_and_caps() {
        let mut p = ProgressionSystem::new();
        p.attack = 4;
        p.defense = 30;
        p.evasion = 3;
        p.shield = 3;
        let m = p.modifiers();
        assert_eq!(m.explosive_bonus_kg, 3.0);
        assert_eq!(m.damage_resistance, MAX_DAMAGE_RESISTANCE);
        assert!((m.dodge_chance - 0.06).abs() < 1e-12);
        assert_eq!(m.shield_capacity_bonus, 1000.0);
        assert_eq!(m.shield_regen_bonus, 20.0);
        assert_eq!(m.cooldown_mult, 1.0);
    }

    #[test]
    fn test_perk_purchase_rules() {
        let mut p = ProgressionSystem::new();
        p.scrap = 70;
        assert_eq!(p.purchase_perk(Perk::ExplosiveMaster), Ok(50));
        assert_eq!(p.scrap, 20);
        assert_eq!(
            p.purchase_perk(Perk::ExplosiveMaster),
            Err(CommandError::PerkOwned {
                perk: Perk::ExplosiveMaster
            })
        );
        assert_eq!(
            p.purchase_perk(Perk::RapidReload),
            Err(CommandError::InsufficientScrap {
                perk: Perk::RapidReload,
                cost: 60,
                available: 20
            })
        );
        assert_eq!(p.modifiers().explosive_damage_mult, 1.25);
    }

    #[test]
    fn test_perk_multipliers() {
        let mut p = ProgressionSystem::new();
        p.perks = Perk::ALL.to_vec();
        let m = p.modifiers();
        assert_eq!(m.shield_capacity_mult, 1.5);
        assert!((m.cooldown_mult - 4.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.drop_chance_mult, 1.5);
    }

    #[test]
    fn test_drop_rate_and_amount() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let p = ProgressionSystem::new();
        let drops: Vec<u32> = (0..2000).filter_map(|_| p.roll_drop(3, &mut rng)).collect();
        assert!(drops.len() > 450 && drops.len() < 750, "{} drops", drops.len());
        assert!(drops.iter().all(|d| (3..=5).contains(d)));
    }

    #[test]
    fn test_record_kill_emits_level_up() {
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        let mut events = FrameEvents::default();
        let mut p = ProgressionSystem::new();
        p.exp = 95;
        let kill = KillRecord {
            entity: hecs::World::new().reserve_entity(),
            position: Vec2::new(10.0, 10.0),
            enemy_type: EnemyType::Fighter,
            level: 1,
        };
        p.record_kill(&kill, &mut rng, &mut events);
        assert_eq!(p.level, 2);
        assert_eq!(p.kills, 1);
        assert!(events
            .combat
            .iter()
            .any(|e| matches!(e, CombatEvent::LevelUp { level: 2 })));
        assert!(events.audio.contains(&AudioEvent::LevelUp { level: 2 }));
    }
}
