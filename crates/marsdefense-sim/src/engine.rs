//! Simulation engine: the core of the game.
//!
//! `SimulationEngine` owns the hecs ECS world, the projectile system, the
//! wave director and player progression. It applies queued commands, runs
//! every system in a fixed order and produces `CombatSnapshot`s. Completely
//! headless: time only moves by the `dt` handed to [`SimulationEngine::tick`].

use std::collections::VecDeque;

use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};

use marsdefense_core::commands::{FrameInput, PlayerCommand};
use marsdefense_core::components::{Buffs, Kinematics, StatModifiers, Vitals};
use marsdefense_core::config::SimConfig;
use marsdefense_core::constants::{CANNON_MAX_LEVEL, OVERCHARGE_DURATION_SECS};
use marsdefense_core::enums::{GamePhase, WeaponSlot};
use marsdefense_core::error::{CommandError, CommandResult};
use marsdefense_core::events::AudioEvent;
use marsdefense_core::state::CombatSnapshot;
use marsdefense_core::types::{SimTime, Vec2};
use marsdefense_core::weapons_db::{standard_bomb, STANDARD_BOMB_LEVELS};

use crate::frame_events::FrameEvents;
use crate::progression::ProgressionSystem;
use crate::projectiles::ProjectileSystem;
use crate::systems;
use crate::systems::enemy_fire::PlayerTarget;
use crate::systems::snapshot::SnapshotSources;
use crate::systems::wave_spawner::{count_alive, WaveDirector, WaveTransition};
use crate::weapons::{LaunchContext, ShipLoadout};
use crate::world_setup;

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    phase: GamePhase,
    time_scale: f64,
    arena: Vec2,
    rng: ChaCha8Rng,
    player: Entity,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<Entity>,
    events: FrameEvents,
    projectiles: ProjectileSystem,
    waves: WaveDirector,
    progression: ProgressionSystem,
}

impl SimulationEngine {
    /// Create a new engine: seed the RNG, spawn the player and open the first wave.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        let player = world_setup::spawn_player(&mut world, &config);

        let mut engine = Self {
            world,
            time: SimTime::default(),
            phase: GamePhase::Active,
            time_scale: config.time_scale,
            arena: Vec2::new(config.arena.width, config.arena.height),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            player,
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: FrameEvents::default(),
            projectiles: ProjectileSystem::new(config.arena.width, config.arena.height),
            waves: WaveDirector::new(),
            progression: ProgressionSystem::new(),
        };
        engine.start_wave(config.first_wave.max(1));
        info!(seed = config.seed, "simulation started");
        engine
    }

    /// Queue a player command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation by `dt` seconds and return the resulting snapshot.
    ///
    /// `dt` is scaled by the configured time scale. A non-finite or
    /// non-positive step, a paused game or a finished game produce a snapshot
    /// without advancing anything.
    pub fn tick(&mut self, input: &FrameInput, dt: f64) -> CombatSnapshot {
        self.process_commands();

        let dt = if dt.is_finite() { dt * self.time_scale } else { 0.0 };
        if self.phase == GamePhase::Active && dt > 0.0 {
            self.time.advance(dt);
            self.run_systems(input, dt);
        }

        self.snapshot()
    }

    /// Build a snapshot of the current state, draining pending events.
    pub fn snapshot(&mut self) -> CombatSnapshot {
        let (combat_events, audio_events) = self.events.drain();
        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotSources {
                time: self.time,
                phase: self.phase,
                projectiles: &self.projectiles,
                waves: &self.waves,
                progression: &self.progression,
            },
            combat_events,
            audio_events,
        )
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn progression(&self) -> &ProgressionSystem {
        &self.progression
    }

    pub fn projectiles(&self) -> &ProjectileSystem {
        &self.projectiles
    }

    pub fn waves(&self) -> &WaveDirector {
        &self.waves
    }

    /// Scene transition: remove every enemy and projectile.
    pub fn clear_wave(&mut self) {
        let removed = self.waves.clear_wave(&mut self.world);
        self.projectiles.clear();
        debug!(removed, "wave cleared");
    }

    /// Spawn an enemy directly (for testing).
    #[cfg(test)]
    pub fn spawn_test_enemy(
        &mut self,
        enemy_type: marsdefense_core::enums::EnemyType,
        level: u32,
        position: Vec2,
    ) -> Entity {
        world_setup::spawn_enemy(
            &mut self.world,
            &mut self.rng,
            enemy_type,
            level,
            position,
            None,
        )
    }

    /// Mutable world access (for testing).
    #[cfg(test)]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Mutable progression access (for testing).
    #[cfg(test)]
    pub fn progression_mut(&mut self) -> &mut ProgressionSystem {
        &mut self.progression
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(error) = self.handle_command(&command) {
                warn!(?command, %error, "command rejected");
            }
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: &PlayerCommand) -> CommandResult<()> {
        match *command {
            PlayerCommand::Pause => {
                if self.phase == GamePhase::Active {
                    self.phase = GamePhase::Paused;
                }
            }
            PlayerCommand::Resume => {
                if self.phase == GamePhase::Paused {
                    self.phase = GamePhase::Active;
                }
            }
            PlayerCommand::AllocateStat { attribute } => {
                self.progression.allocate(attribute)?;
            }
            PlayerCommand::PurchasePerk { perk } => {
                let cost = self.progression.purchase_perk(perk)?;
                info!(?perk, cost, "perk purchased");
            }
            PlayerCommand::EquipBomb { level, rarity } => {
                let bomb = standard_bomb(level, rarity).ok_or(CommandError::UnknownLevel {
                    level,
                    max: STANDARD_BOMB_LEVELS,
                })?;
                if let Ok(mut loadout) = self.world.get::<&mut ShipLoadout>(self.player) {
                    loadout.bomb = bomb;
                }
            }
            PlayerCommand::UpgradeCannon { level, rarity } => {
                if level == 0 || level > CANNON_MAX_LEVEL {
                    return Err(CommandError::UnknownLevel {
                        level,
                        max: CANNON_MAX_LEVEL,
                    });
                }
                if let Ok(mut loadout) = self.world.get::<&mut ShipLoadout>(self.player) {
                    loadout.cannon.upgrade(level, rarity);
                }
            }
        }
        Ok(())
    }

    fn start_wave(&mut self, wave: u32) {
        self.waves.start_wave(wave);
        self.events.audio(AudioEvent::WaveStarted { wave });
        info!(wave, enemies = self.waves.to_spawn, "wave started");
    }

    /// Run all systems in order for one frame.
    fn run_systems(&mut self, input: &FrameInput, dt: f64) {
        let now = self.time.elapsed_secs;

        // 1. Modifier refresh
        if self.progression.take_dirty() {
            let modifiers = self.progression.modifiers();
            systems::shield_regen::apply_modifiers(&mut self.world, self.player, modifiers);
            debug!(?modifiers, "stat modifiers refreshed");
        }

        // 2. Ship physics, shield regen, buff timers
        systems::ship_physics::run(&mut self.world, input.thrust, self.arena, dt);
        systems::shield_regen::run(&mut self.world, dt);
        systems::ship_physics::tick_buffs(&mut self.world, dt);

        // 3. Weapon heat decay
        if let Ok(mut loadout) = self.world.get::<&mut ShipLoadout>(self.player) {
            loadout.update(dt);
        }

        // 4. Player fire
        self.fire_player_weapons(&input.fire, now);

        // 5. Wave spawner
        let target = self.player_target();
        self.waves.run(
            &mut self.world,
            &mut self.rng,
            self.arena.x,
            target.map(|t| t.position),
            dt,
        );

        // 6. Enemy movement
        systems::enemy_ai::run(
            &mut self.world,
            &mut self.rng,
            target.map(|t| t.position),
            self.arena.x,
            dt,
        );

        // 7. Enemy fire
        let target = self.player_target();
        systems::enemy_fire::run(
            &mut self.world,
            &mut self.rng,
            target,
            now,
            dt,
            &mut self.projectiles,
            &mut self.events.audio,
        );

        // 8. Projectiles: fuses, collisions, damage
        let report = self
            .projectiles
            .advance(dt, &mut self.world, &mut self.rng, &mut self.events);

        // 9. Progression
        for kill in &report.kills {
            self.progression.record_kill(kill, &mut self.rng, &mut self.events);
        }

        // 10. Cleanup
        let escaped = systems::cleanup::run(&mut self.world, &mut self.despawn_buffer, self.arena.y);
        if escaped > 0 {
            debug!(escaped, "enemies left the arena");
        }

        // 11. Wave progression
        match self.waves.progress(count_alive(&self.world), dt) {
            WaveTransition::Completed(wave) => info!(wave, "wave complete"),
            WaveTransition::Started(wave) => {
                self.events.audio(AudioEvent::WaveStarted { wave });
                info!(wave, enemies = self.waves.to_spawn, "wave started");
            }
            WaveTransition::None => {}
        }

        // 12. Game over
        if report.player_killed || !self.player_alive() {
            self.phase = GamePhase::GameOver;
            info!(
                wave = self.waves.wave,
                level = self.progression.level,
                kills = self.progression.kills,
                "game over"
            );
        }
    }

    fn fire_player_weapons(&mut self, slots: &[WeaponSlot], now: f64) {
        let Ok((kin, vitals, mods, buffs, loadout)) = self.world.query_one_mut::<(
            &Kinematics,
            &Vitals,
            &StatModifiers,
            &mut Buffs,
            &mut ShipLoadout,
        )>(self.player) else {
            return;
        };
        if !vitals.alive {
            return;
        }

        for &slot in slots {
            let was_overheated = loadout.cannon.weapon.heat.is_some_and(|h| h.overheated());
            let ctx = LaunchContext {
                ship: kin.position,
                now,
                modifiers: mods,
                overcharged: buffs.overcharged(),
            };
            match loadout.fire(slot, &ctx, &mut self.projectiles, &mut self.rng) {
                Ok(launched) => {
                    self.events.audio(AudioEvent::WeaponFired { slot });
                    if slot == WeaponSlot::Overcharge {
                        buffs.overcharge_secs = OVERCHARGE_DURATION_SECS;
                        debug!("overcharge engaged");
                    }
                    let overheated = loadout.cannon.weapon.heat.is_some_and(|h| h.overheated());
                    if slot == WeaponSlot::Cannon && overheated && !was_overheated {
                        self.events.audio(AudioEvent::Overheated);
                        debug!("cannon overheated");
                    }
                    trace!(?slot, launched, "weapon fired");
                }
                Err(rejection) => trace!(?slot, ?rejection, "fire rejected"),
            }
        }
    }

    fn player_target(&self) -> Option<PlayerTarget> {
        let mut query = self
            .world
            .query_one::<(&Kinematics, &Vitals)>(self.player)
            .ok()?;
        let (kin, vitals) = query.get()?;
        vitals.alive.then_some(PlayerTarget {
            position: kin.position,
            velocity: kin.velocity,
        })
    }

    fn player_alive(&self) -> bool {
        self.world
            .get::<&Vitals>(self.player)
            .map(|v| v.alive)
            .unwrap_or(false)
    }
}
