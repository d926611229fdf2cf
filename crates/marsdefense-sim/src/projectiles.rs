//! In-flight projectiles: proximity-fused bombs, kinetic shots and beams.
//!
//! `ProjectileSystem::advance` moves everything, resolves fuses and hits,
//! applies damage to entities in the world and then drops spent projectiles.
//! Processing order is fixed: bombs, kinetic shots, beams, cleanup.

use hecs::{Entity, World};
use rand::Rng;
use tracing::debug;

use marsdefense_core::components::{Armor, Enemy, Kinematics, Player, StatModifiers, Vitals};
use marsdefense_core::constants::*;
use marsdefense_core::enums::{DamageKind, EnemyType};
use marsdefense_core::events::{AudioEvent, CombatEvent};
use marsdefense_core::state::ProjectileView;
use marsdefense_core::types::{is_finite_vec, Vec2};
use marsdefense_core::weapons_db::EnergyWeaponSpec;

use crate::combat::{DamageReport, DamageTarget};
use crate::damage_model::{
    energy_weapon_damage, explosion_damage, explosion_visual_size, mitigate,
    point_to_segment_distance, projectile_kinetic_energy, proximity_trigger, Warhead,
};
use crate::frame_events::FrameEvents;

/// A proximity-fused explosive.
#[derive(Debug, Clone)]
pub struct Bomb {
    pub position: Vec2,
    pub velocity: Vec2,
    pub owner_is_player: bool,
    pub lifetime: f64,
    pub fuse_radius: f64,
    pub radius: f64,
    /// Bombs from the same volley share a group id.
    pub group_id: u32,
    pub warhead: Warhead,
    pub active: bool,
}

/// A round that delivers its kinetic energy on contact.
#[derive(Debug, Clone)]
pub struct KineticShot {
    pub position: Vec2,
    pub velocity: Vec2,
    pub owner_is_player: bool,
    pub lifetime: f64,
    pub radius: f64,
    pub joules: f64,
    pub active: bool,
}

/// A short-lived segment that burns everything it touches.
#[derive(Debug, Clone)]
pub struct Beam {
    pub start: Vec2,
    pub end: Vec2,
    pub owner_is_player: bool,
    pub width: f64,
    pub joules_per_second: f64,
    pub remaining: f64,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub enum Projectile {
    Bomb(Bomb),
    KineticShot(KineticShot),
    Beam(Beam),
}

/// Launch parameters for a kinetic round. Joules are derived from the mass
/// and the speed of `velocity`.
#[derive(Debug, Clone, Copy)]
pub struct ShotSpec {
    pub position: Vec2,
    pub velocity: Vec2,
    pub mass_kg: f64,
    pub damage_mult: f64,
    pub owner_is_player: bool,
}

/// Emission parameters for a beam. Power is evaluated over the beam's length.
#[derive(Debug, Clone, Copy)]
pub struct BeamSpec {
    pub start: Vec2,
    pub end: Vec2,
    pub weapon: EnergyWeaponSpec,
    pub duration_secs: f64,
    pub owner_is_player: bool,
}

/// An enemy destroyed during `advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillRecord {
    pub entity: Entity,
    pub position: Vec2,
    pub enemy_type: EnemyType,
    pub level: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AdvanceReport {
    pub kills: Vec<KillRecord>,
    pub player_killed: bool,
}

#[derive(Debug, Clone, Copy)]
struct Target {
    entity: Entity,
    position: Vec2,
    radius: f64,
    alive: bool,
}

/// Owner of every projectile in flight.
#[derive(Debug, Clone)]
pub struct ProjectileSystem {
    bombs: Vec<Bomb>,
    shots: Vec<KineticShot>,
    beams: Vec<Beam>,
    arena: Vec2,
}

impl ProjectileSystem {
    pub fn new(arena_width: f64, arena_height: f64) -> Self {
        Self {
            bombs: Vec::new(),
            shots: Vec::new(),
            beams: Vec::new(),
            arena: Vec2::new(arena_width, arena_height),
        }
    }

    pub fn spawn(&mut self, projectile: Projectile) {
        match projectile {
            Projectile::Bomb(bomb) => {
                assert!(
                    is_finite_vec(bomb.position) && is_finite_vec(bomb.velocity),
                    "bomb position and velocity must be finite"
                );
                assert!(bomb.lifetime >= 0.0 && bomb.fuse_radius >= 0.0);
                self.bombs.push(bomb);
            }
            Projectile::KineticShot(shot) => {
                assert!(
                    is_finite_vec(shot.position) && is_finite_vec(shot.velocity),
                    "shot position and velocity must be finite"
                );
                assert!(
                    shot.joules.is_finite() && shot.joules >= 0.0,
                    "shot energy must be non-negative, got {}",
                    shot.joules
                );
                self.shots.push(shot);
            }
            Projectile::Beam(beam) => {
                assert!(
                    is_finite_vec(beam.start) && is_finite_vec(beam.end),
                    "beam endpoints must be finite"
                );
                assert!(
                    beam.joules_per_second.is_finite() && beam.joules_per_second >= 0.0,
                    "beam power must be non-negative, got {}",
                    beam.joules_per_second
                );
                self.beams.push(beam);
            }
        }
    }

    pub fn spawn_bomb(&mut self, position: Vec2, velocity: Vec2, warhead: Warhead, group_id: u32) {
        self.spawn(Projectile::Bomb(Bomb {
            position,
            velocity,
            owner_is_player: true,
            lifetime: BOMB_LIFETIME_SECS,
            fuse_radius: BOMB_FUSE_RADIUS,
            radius: BOMB_RADIUS,
            group_id,
            warhead,
            active: true,
        }));
    }

    pub fn spawn_kinetic_shot(&mut self, spec: ShotSpec) {
        assert!(
            spec.mass_kg.is_finite() && spec.mass_kg >= 0.0,
            "shot mass must be non-negative, got {}",
            spec.mass_kg
        );
        assert!(
            spec.damage_mult.is_finite() && spec.damage_mult >= 0.0,
            "damage multiplier must be non-negative, got {}",
            spec.damage_mult
        );
        let velocity_kmh = spec.velocity.length() * 3.6;
        let joules = projectile_kinetic_energy(spec.mass_kg, velocity_kmh) * spec.damage_mult;
        self.spawn(Projectile::KineticShot(KineticShot {
            position: spec.position,
            velocity: spec.velocity,
            owner_is_player: spec.owner_is_player,
            lifetime: SHOT_LIFETIME_SECS,
            radius: SHOT_RADIUS,
            joules,
            active: true,
        }));
    }

    pub fn spawn_beam(&mut self, spec: BeamSpec) {
        assert!(
            spec.duration_secs.is_finite() && spec.duration_secs >= 0.0,
            "beam duration must be non-negative, got {}",
            spec.duration_secs
        );
        let length = spec.start.distance(spec.end);
        let joules_per_second = energy_weapon_damage(
            spec.weapon.power_mw,
            spec.weapon.duration_ms,
            length,
            spec.weapon.beam_type,
        );
        self.spawn(Projectile::Beam(Beam {
            start: spec.start,
            end: spec.end,
            owner_is_player: spec.owner_is_player,
            width: BEAM_WIDTH,
            joules_per_second,
            remaining: spec.duration_secs,
            active: true,
        }));
    }

    pub fn bombs(&self) -> &[Bomb] {
        &self.bombs
    }

    pub fn shots(&self) -> &[KineticShot] {
        &self.shots
    }

    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    pub fn projectile_count(&self) -> usize {
        self.bombs.len() + self.shots.len() + self.beams.len()
    }

    /// Drop everything in flight.
    pub fn clear(&mut self) {
        self.bombs.clear();
        self.shots.clear();
        self.beams.clear();
    }

    /// Advance one frame and apply all resulting damage.
    pub fn advance(
        &mut self,
        dt: f64,
        world: &mut World,
        rng: &mut impl Rng,
        events: &mut FrameEvents,
    ) -> AdvanceReport {
        let mut report = AdvanceReport::default();
        let mut enemies = enemy_targets(world);
        let mut player = player_target(world);

        self.advance_bombs(dt, world, &mut enemies, &mut player, rng, events, &mut report);
        self.advance_shots(dt, world, &mut enemies, &mut player, rng, events, &mut report);
        self.advance_beams(dt, world, &mut enemies, rng, events, &mut report);
        self.cleanup();

        report
    }

    #[allow(clippy::too_many_arguments)]
    fn advance_bombs(
        &mut self,
        dt: f64,
        world: &mut World,
        enemies: &mut [Target],
        player: &mut Option<Target>,
        rng: &mut impl Rng,
        events: &mut FrameEvents,
        report: &mut AdvanceReport,
    ) {
        for bomb in self.bombs.iter_mut().filter(|b| b.active) {
            bomb.position += bomb.velocity * dt;
            bomb.lifetime -= dt;
            if bomb.lifetime <= 0.0 {
                // Dud: expired without finding a target.
                bomb.active = false;
                continue;
            }

            let positions: Vec<Vec2> = enemies
                .iter()
                .filter(|t| t.alive)
                .map(|t| t.position)
                .collect();
            if proximity_trigger(bomb.position, bomb.velocity, &positions, bomb.fuse_radius, dt)
                .is_none()
            {
                continue;
            }

            bomb.active = false;
            let center = bomb.position;
            let warhead = bomb.warhead;

            for target in enemies.iter_mut().filter(|t| t.alive) {
                let joules = explosion_damage(center, target.position, &warhead);
                if joules > 0.0 {
                    strike(world, target, joules, DamageKind::Explosive, false, rng, events, report);
                }
            }
            if let Some(target) = player.as_mut().filter(|t| t.alive) {
                let mut joules = explosion_damage(center, target.position, &warhead);
                if bomb.owner_is_player {
                    joules *= FRIENDLY_FIRE_FRACTION;
                }
                if joules > 0.0 {
                    strike(world, target, joules, DamageKind::Explosive, true, rng, events, report);
                }
            }

            events.audio(AudioEvent::Explosion {
                position: center,
                size: explosion_visual_size(warhead.explosive_kg),
            });
            debug!(
                group = bomb.group_id,
                x = center.x,
                y = center.y,
                explosive_kg = warhead.explosive_kg,
                "bomb detonated"
            );
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn advance_shots(
        &mut self,
        dt: f64,
        world: &mut World,
        enemies: &mut [Target],
        player: &mut Option<Target>,
        rng: &mut impl Rng,
        events: &mut FrameEvents,
        report: &mut AdvanceReport,
    ) {
        for shot in self.shots.iter_mut().filter(|s| s.active) {
            shot.position += shot.velocity * dt;
            shot.lifetime -= dt;
            if shot.lifetime <= 0.0 {
                shot.active = false;
                continue;
            }

            let hit = if shot.owner_is_player {
                enemies
                    .iter_mut()
                    .find(|t| t.alive && touches(shot.position, shot.radius, t))
            } else {
                player
                    .as_mut()
                    .filter(|t| t.alive && touches(shot.position, shot.radius, t))
            };

            if let Some(target) = hit {
                shot.active = false;
                let on_player = !shot.owner_is_player;
                strike(world, target, shot.joules, DamageKind::Kinetic, on_player, rng, events, report);
                events.audio(AudioEvent::Impact {
                    position: shot.position,
                });
            }
        }
    }

    fn advance_beams(
        &mut self,
        dt: f64,
        world: &mut World,
        enemies: &mut [Target],
        rng: &mut impl Rng,
        events: &mut FrameEvents,
        report: &mut AdvanceReport,
    ) {
        for beam in self.beams.iter_mut().filter(|b| b.active) {
            // The expiring frame burns only the time the beam had left.
            let burn = beam.joules_per_second * dt.min(beam.remaining.max(0.0));
            beam.remaining -= dt;
            if beam.remaining <= 0.0 {
                beam.active = false;
            }
            if burn <= 0.0 {
                continue;
            }
            for target in enemies.iter_mut().filter(|t| t.alive) {
                if point_to_segment_distance(target.position, beam.start, beam.end) < beam.width {
                    strike(world, target, burn, DamageKind::Energy, false, rng, events, report);
                }
            }
        }
    }

    fn cleanup(&mut self) {
        let min = Vec2::splat(-PROJECTILE_CULL_MARGIN);
        let max = self.arena + Vec2::splat(PROJECTILE_CULL_MARGIN);
        let in_bounds = |p: Vec2| p.x >= min.x && p.x <= max.x && p.y >= min.y && p.y <= max.y;

        self.bombs.retain(|b| b.active && in_bounds(b.position));
        self.shots.retain(|s| s.active && in_bounds(s.position));
        self.beams.retain(|b| b.active);
    }

    pub fn views(&self) -> Vec<ProjectileView> {
        let bombs = self.bombs.iter().map(|b| ProjectileView::Bomb {
            position: b.position,
            velocity: b.velocity,
            radius: b.radius,
            group_id: b.group_id,
        });
        let shots = self.shots.iter().map(|s| ProjectileView::Shot {
            position: s.position,
            velocity: s.velocity,
            radius: s.radius,
            from_player: s.owner_is_player,
        });
        let beams = self.beams.iter().map(|b| ProjectileView::Beam {
            start: b.start,
            end: b.end,
            width: b.width,
            remaining_secs: b.remaining,
        });
        bombs.chain(shots).chain(beams).collect()
    }
}

fn touches(position: Vec2, radius: f64, target: &Target) -> bool {
    position.distance(target.position) < radius + target.radius
}

fn enemy_targets(world: &World) -> Vec<Target> {
    world
        .query::<(&Enemy, &Kinematics, &Vitals)>()
        .iter()
        .filter(|(_, (_, _, vitals))| vitals.alive)
        .map(|(entity, (_, kin, vitals))| Target {
            entity,
            position: kin.position,
            radius: vitals.collision_radius,
            alive: true,
        })
        .collect()
}

fn player_target(world: &World) -> Option<Target> {
    world
        .query::<(&Player, &Kinematics, &Vitals)>()
        .iter()
        .next()
        .map(|(entity, (_, kin, vitals))| Target {
            entity,
            position: kin.position,
            radius: vitals.collision_radius,
            alive: vitals.alive,
        })
}

/// Apply one hit to `target` and raise the matching events.
#[allow(clippy::too_many_arguments)]
fn strike(
    world: &mut World,
    target: &mut Target,
    joules: f64,
    kind: DamageKind,
    on_player: bool,
    rng: &mut impl Rng,
    events: &mut FrameEvents,
    report: &mut AdvanceReport,
) {
    let Ok((vitals, kinematics, modifiers, armor, enemy)) = world.query_one_mut::<(
        &mut Vitals,
        &mut Kinematics,
        Option<&StatModifiers>,
        Option<&Armor>,
        Option<&Enemy>,
    )>(target.entity) else {
        target.alive = false;
        return;
    };

    let joules = armor.map_or(joules, |a| mitigate(joules, a, kind));
    let modifiers = modifiers.copied().unwrap_or_default();
    let enemy = enemy.copied();
    let damage: DamageReport =
        DamageTarget::new(vitals, kinematics, &modifiers).take_damage(joules, kind, rng);
    let position = target.position;

    if damage.evaded {
        events.combat(CombatEvent::Evaded {
            position,
            on_player,
        });
        return;
    }
    if damage.total() > 0.0 {
        events.combat(CombatEvent::Hit {
            position,
            joules: damage.total(),
            kind,
            on_player,
            was_critical: damage.killed,
        });
    }
    if !damage.killed {
        return;
    }

    target.alive = false;
    events.audio(AudioEvent::EntityDied {
        position,
        is_player: on_player,
    });
    if on_player {
        report.player_killed = true;
        debug!("player destroyed");
    } else if let Some(enemy) = enemy {
        events.combat(CombatEvent::Kill {
            position,
            enemy_type: enemy.enemy_type,
            level: enemy.level,
        });
        report.kills.push(KillRecord {
            entity: target.entity,
            position,
            enemy_type: enemy.enemy_type,
            level: enemy.level,
        });
        debug!(enemy_type = ?enemy.enemy_type, level = enemy.level, "enemy destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsdefense_core::enums::{BeamType, Rarity};
    use marsdefense_core::weapons_db::standard_bomb;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn spawn_target(world: &mut World, position: Vec2, hp: f64) -> Entity {
        world.spawn((
            Enemy {
                enemy_type: EnemyType::Fighter,
                level: 1,
                exp_value: 10,
            },
            Kinematics::at(position, 500.0),
            Vitals::new(hp, 0.0, 14.0),
            StatModifiers::default(),
        ))
    }

    fn spawn_player(world: &mut World, position: Vec2) -> Entity {
        world.spawn((
            Player,
            Kinematics::at(position, 800.0),
            Vitals::new(25_000.0, 15_000.0, 13.0),
            StatModifiers::default(),
        ))
    }

    fn level_one_warhead() -> Warhead {
        Warhead::from_bomb_stats(&standard_bomb(1, Rarity::Common).unwrap())
    }

    fn hp(world: &World, entity: Entity) -> f64 {
        world.get::<&Vitals>(entity).unwrap().hp
    }

    #[test]
    fn test_bomb_detonates_exactly_once() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut events = FrameEvents::default();
        let target = spawn_target(&mut world, Vec2::new(500.0, 400.0), 1e12);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_bomb(Vec2::new(500.0, 410.0), Vec2::ZERO, level_one_warhead(), 1);

        system.advance(1.0 / 60.0, &mut world, &mut rng, &mut events);
        let after_first = hp(&world, target);
        assert!(after_first < 1e12);
        assert_eq!(system.bombs().len(), 0);

        for _ in 0..10 {
            system.advance(1.0 / 60.0, &mut world, &mut rng, &mut events);
        }
        assert_eq!(hp(&world, target), after_first);
        let explosions = events
            .audio
            .iter()
            .filter(|e| matches!(e, AudioEvent::Explosion { .. }))
            .count();
        assert_eq!(explosions, 1);
    }

    #[test]
    fn test_fast_bomb_fuses_on_lookahead() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut events = FrameEvents::default();
        spawn_target(&mut world, Vec2::new(500.0, 815.0), 1e12);

        // 100 units per frame. After the first step the bomb sits 85 units
        // short of the target; only the one-step lookahead to y = 800 is
        // inside the fuse radius.
        let dt = 0.05;
        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_bomb(
            Vec2::new(500.0, 1000.0),
            Vec2::new(0.0, -2000.0),
            level_one_warhead(),
            1,
        );
        assert!((900.0_f64 - 815.0).abs() > BOMB_FUSE_RADIUS);

        system.advance(dt, &mut world, &mut rng, &mut events);
        assert_eq!(system.bombs().len(), 0, "detonated one step early");

        for _ in 0..5 {
            system.advance(dt, &mut world, &mut rng, &mut events);
        }
        let explosions: Vec<Vec2> = events
            .audio
            .iter()
            .filter_map(|e| match e {
                AudioEvent::Explosion { position, .. } => Some(*position),
                _ => None,
            })
            .collect();
        assert_eq!(explosions.len(), 1);
        assert!((explosions[0].y - 900.0).abs() < 1e-9);
    }

    #[test]
    fn test_bomb_without_target_is_a_dud() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut events = FrameEvents::default();
        let target = spawn_target(&mut world, Vec2::new(100.0, 100.0), 1000.0);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_bomb(Vec2::new(900.0, 500.0), Vec2::ZERO, level_one_warhead(), 1);
        for _ in 0..11 {
            system.advance(1.0, &mut world, &mut rng, &mut events);
        }
        assert_eq!(system.projectile_count(), 0);
        assert_eq!(hp(&world, target), 1000.0);
        assert!(events.audio.is_empty());
    }

    #[test]
    fn test_detonation_spares_player_most_damage() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut events = FrameEvents::default();
        let enemy = spawn_target(&mut world, Vec2::new(500.0, 400.0), 1e12);
        let player = spawn_player(&mut world, Vec2::new(500.0, 430.0));
        world.get::<&mut Vitals>(player).unwrap().hp = 1e12;
        world.get::<&mut Vitals>(player).unwrap().max_hp = 1e12;
        world.get::<&mut Vitals>(player).unwrap().shield = 0.0;

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        // Equidistant from both.
        system.spawn_bomb(Vec2::new(500.0, 415.0), Vec2::ZERO, level_one_warhead(), 1);
        system.advance(1.0 / 60.0, &mut world, &mut rng, &mut events);

        let enemy_loss = 1e12 - hp(&world, enemy);
        let player_loss = 1e12 - hp(&world, player);
        assert!(enemy_loss > 0.0);
        assert!((player_loss / enemy_loss - FRIENDLY_FIRE_FRACTION).abs() < 1e-9);
    }

    #[test]
    fn test_beam_delivers_power_times_time() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = FrameEvents::default();
        let target = spawn_target(&mut world, Vec2::new(0.0, 50.0), 10_000.0);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn(Projectile::Beam(Beam {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(0.0, 100.0),
            owner_is_player: true,
            width: BEAM_WIDTH,
            joules_per_second: 1000.0,
            remaining: 1.0,
            active: true,
        }));

        system.advance(0.1, &mut world, &mut rng, &mut events);
        system.advance(0.1, &mut world, &mut rng, &mut events);
        assert!((hp(&world, target) - 9_800.0).abs() < 1e-9);
    }

    #[test]
    fn test_expiring_beam_burns_its_remaining_time() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut events = FrameEvents::default();
        let target = spawn_target(&mut world, Vec2::new(0.0, 50.0), 10_000.0);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn(Projectile::Beam(Beam {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(0.0, 100.0),
            owner_is_player: true,
            width: BEAM_WIDTH,
            joules_per_second: 1000.0,
            remaining: 0.15,
            active: true,
        }));

        // 0.1 s, then the last 0.05 s, then nothing.
        for _ in 0..3 {
            system.advance(0.1, &mut world, &mut rng, &mut events);
        }
        assert!((hp(&world, target) - 9_850.0).abs() < 1e-9);
        assert!(system.beams().is_empty());
    }

    #[test]
    fn test_beam_energy_uses_length_falloff() {
        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_beam(BeamSpec {
            start: Vec2::ZERO,
            end: Vec2::new(0.0, 75.0),
            weapon: EnergyWeaponSpec {
                power_mw: 1.0,
                duration_ms: 1000.0,
                beam_diameter_mm: 1.0,
                range_km: 1.0,
                beam_type: BeamType::Pulse,
            },
            duration_secs: 0.5,
            owner_is_player: true,
        });
        assert!((system.beams()[0].joules_per_second - 500_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_kinetic_shot_hits_once() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut events = FrameEvents::default();
        let first = spawn_target(&mut world, Vec2::new(100.0, 100.0), 1e9);
        let second = spawn_target(&mut world, Vec2::new(100.0, 100.0), 1e9);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_kinetic_shot(ShotSpec {
            position: Vec2::new(100.0, 110.0),
            velocity: Vec2::new(0.0, -100.0),
            mass_kg: 0.5,
            damage_mult: 1.0,
            owner_is_player: true,
        });
        system.advance(0.01, &mut world, &mut rng, &mut events);

        let losses = [1e9 - hp(&world, first), 1e9 - hp(&world, second)];
        assert_eq!(losses.iter().filter(|l| **l > 0.0).count(), 1);
        assert!((losses.iter().sum::<f64>() - 2_500.0).abs() < 1e-6);
        assert_eq!(system.shots().len(), 0);
    }

    #[test]
    fn test_enemy_shots_ignore_enemies() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut events = FrameEvents::default();
        let enemy = spawn_target(&mut world, Vec2::new(100.0, 100.0), 1000.0);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_kinetic_shot(ShotSpec {
            position: Vec2::new(100.0, 100.0),
            velocity: Vec2::new(0.0, 10.0),
            mass_kg: 0.01,
            damage_mult: 1.0,
            owner_is_player: false,
        });
        system.advance(0.01, &mut world, &mut rng, &mut events);
        assert_eq!(hp(&world, enemy), 1000.0);
        assert_eq!(system.shots().len(), 1);
    }

    #[test]
    fn test_kill_is_reported_once() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut events = FrameEvents::default();
        spawn_target(&mut world, Vec2::new(100.0, 100.0), 10.0);

        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        for _ in 0..3 {
            system.spawn_kinetic_shot(ShotSpec {
                position: Vec2::new(100.0, 100.0),
                velocity: Vec2::new(0.0, -100.0),
                mass_kg: 0.5,
                damage_mult: 1.0,
                owner_is_player: true,
            });
        }
        let report = system.advance(0.001, &mut world, &mut rng, &mut events);
        assert_eq!(report.kills.len(), 1);
        assert_eq!(system.shots().len(), 2, "dead targets absorb nothing");
    }

    #[test]
    fn test_out_of_bounds_projectiles_are_culled() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut events = FrameEvents::default();
        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_kinetic_shot(ShotSpec {
            position: Vec2::new(960.0, -95.0),
            velocity: Vec2::new(0.0, -800.0),
            mass_kg: 0.5,
            damage_mult: 1.0,
            owner_is_player: true,
        });
        system.advance(0.1, &mut world, &mut rng, &mut events);
        assert_eq!(system.projectile_count(), 0);
    }

    #[test]
    #[should_panic]
    fn test_negative_shot_mass_panics() {
        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_kinetic_shot(ShotSpec {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass_kg: -1.0,
            damage_mult: 1.0,
            owner_is_player: true,
        });
    }

    #[test]
    fn test_views_tag_each_kind() {
        let mut system = ProjectileSystem::new(1920.0, 1080.0);
        system.spawn_bomb(Vec2::new(10.0, 10.0), Vec2::ZERO, level_one_warhead(), 3);
        system.spawn_kinetic_shot(ShotSpec {
            position: Vec2::new(20.0, 20.0),
            velocity: Vec2::new(0.0, -1.0),
            mass_kg: 0.5,
            damage_mult: 1.0,
            owner_is_player: false,
        });
        let views = system.views();
        assert_eq!(views.len(), 2);
        let json = serde_json::to_value(&views).unwrap();
        assert_eq!(json[0]["kind"], "Bomb");
        assert_eq!(json[1]["kind"], "Shot");
    }
}
