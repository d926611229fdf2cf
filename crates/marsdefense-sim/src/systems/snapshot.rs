//! Snapshot system: queries the ECS world and builds a complete CombatSnapshot.
//!
//! This system is read-only; it never modifies the world.

use hecs::World;

use marsdefense_core::components::*;
use marsdefense_core::enums::{GamePhase, Rarity};
use marsdefense_core::events::{AudioEvent, CombatEvent};
use marsdefense_core::state::*;
use marsdefense_core::types::SimTime;

use crate::progression::ProgressionSystem;
use crate::projectiles::ProjectileSystem;
use crate::systems::wave_spawner::{count_alive, WaveDirector};
use crate::weapons::ShipLoadout;

/// Everything outside the world that a snapshot reads.
pub struct SnapshotSources<'a> {
    pub time: SimTime,
    pub phase: GamePhase,
    pub projectiles: &'a ProjectileSystem,
    pub waves: &'a WaveDirector,
    pub progression: &'a ProgressionSystem,
}

/// Build a complete CombatSnapshot from the current world state.
pub fn build_snapshot(
    world: &World,
    sources: SnapshotSources<'_>,
    combat_events: Vec<CombatEvent>,
    audio_events: Vec<AudioEvent>,
) -> CombatSnapshot {
    let (bomb_level, bomb_rarity) = find_bomb(world);

    CombatSnapshot {
        time: sources.time,
        phase: sources.phase,
        player: build_player(world),
        enemies: build_enemies(world),
        projectiles: sources.projectiles.views(),
        wave: sources.waves.view(count_alive(world)),
        weapons: build_weapons(world, sources.time.elapsed_secs),
        progression: sources.progression.view(bomb_level, bomb_rarity),
        combat_events,
        audio_events,
    }
}

fn build_player(world: &World) -> Option<ShipView> {
    world
        .query::<(&Player, &Kinematics, &Vitals, Option<&Buffs>)>()
        .iter()
        .next()
        .map(|(_, (_, kin, vitals, buffs))| ShipView {
            position: kin.position,
            velocity: kin.velocity,
            radius: vitals.collision_radius,
            hp: vitals.hp,
            max_hp: vitals.max_hp,
            shield: vitals.shield,
            max_shield: vitals.max_shield,
            alive: vitals.alive,
            condition: Condition::from_hull(vitals.hp, vitals.max_hp, vitals.alive),
            overcharge_secs: buffs.map_or(0.0, |b| b.overcharge_secs),
        })
}

fn build_enemies(world: &World) -> Vec<EnemyView> {
    let mut enemies: Vec<EnemyView> = world
        .query::<(&Enemy, &Kinematics, &Vitals, &EnemyBrain)>()
        .iter()
        .map(|(entity, (enemy, kin, vitals, brain))| EnemyView {
            id: entity.to_bits().get(),
            enemy_type: enemy.enemy_type,
            level: enemy.level,
            exp_value: enemy.exp_value,
            position: kin.position,
            velocity: kin.velocity,
            radius: vitals.collision_radius,
            hp: vitals.hp,
            max_hp: vitals.max_hp,
            condition: Condition::from_hull(vitals.hp, vitals.max_hp, vitals.alive),
            pattern: brain.pattern,
        })
        .collect();
    enemies.sort_by_key(|e| e.id);
    enemies
}

fn build_weapons(world: &World, now: f64) -> Vec<WeaponView> {
    world
        .query::<(&Player, &ShipLoadout, &StatModifiers)>()
        .iter()
        .next()
        .map(|(_, (_, loadout, mods))| loadout.views(now, mods.cooldown_mult))
        .unwrap_or_default()
}

fn find_bomb(world: &World) -> (u32, Rarity) {
    world
        .query::<(&Player, &ShipLoadout)>()
        .iter()
        .next()
        .map(|(_, (_, loadout))| (loadout.bomb.level, loadout.bomb.rarity))
        .unwrap_or_default()
}
