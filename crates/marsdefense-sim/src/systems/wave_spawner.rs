//! Wave director: Spawning → Active → Complete, then the next wave.

use hecs::{Entity, World};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::warn;

use marsdefense_core::components::{Enemy, Vitals};
use marsdefense_core::constants::*;
use marsdefense_core::enums::{EnemyType, WaveState};
use marsdefense_core::state::WaveView;
use marsdefense_core::types::Vec2;

/// What happened to the wave this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveTransition {
    None,
    Completed(u32),
    Started(u32),
}

/// Enemies spawned for wave `n`.
pub fn wave_size(wave: u32) -> u32 {
    WAVE_BASE_ENEMIES + WAVE_ENEMIES_PER_WAVE * wave.saturating_sub(1)
}

/// Seconds between spawns in wave `n`.
pub fn spawn_interval(wave: u32) -> f64 {
    (WAVE_BASE_SPAWN_INTERVAL - WAVE_SPAWN_INTERVAL_STEP * wave as f64)
        .max(WAVE_MIN_SPAWN_INTERVAL)
}

/// Evenly spaced spawn points above the arena.
pub fn spawn_lanes(arena_width: f64) -> [Vec2; SPAWN_LANES] {
    let spacing = arena_width / (SPAWN_LANES + 1) as f64;
    std::array::from_fn(|i| Vec2::new(spacing * (i + 1) as f64, SPAWN_ALTITUDE))
}

#[derive(Debug, Clone)]
pub struct WaveDirector {
    pub wave: u32,
    pub state: WaveState,
    pub to_spawn: u32,
    pub spawn_interval: f64,
    spawn_timer: f64,
    /// Countdown to the next wave while `Complete`.
    complete_timer: f64,
}

impl Default for WaveDirector {
    fn default() -> Self {
        Self {
            wave: 0,
            state: WaveState::Complete,
            to_spawn: 0,
            spawn_interval: WAVE_BASE_SPAWN_INTERVAL,
            spawn_timer: 0.0,
            complete_timer: 0.0,
        }
    }
}

impl WaveDirector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_wave(&mut self, wave: u32) {
        self.wave = wave.max(1);
        self.state = WaveState::Spawning;
        self.to_spawn = wave_size(self.wave);
        self.spawn_interval = spawn_interval(self.wave);
        self.spawn_timer = 0.0;
        self.complete_timer = 0.0;
    }

    /// Pick type and level for the next spawn of this wave.
    pub fn roll_enemy(&self, rng: &mut ChaCha8Rng) -> (EnemyType, u32) {
        let enemy_type = if self.wave <= 2 {
            EnemyType::Fighter
        } else if self.wave <= 5 {
            *[EnemyType::Fighter, EnemyType::Fighter, EnemyType::Bomber]
                .choose(rng)
                .unwrap_or(&EnemyType::Fighter)
        } else {
            *[EnemyType::Fighter, EnemyType::Bomber, EnemyType::Scout]
                .choose(rng)
                .unwrap_or(&EnemyType::Fighter)
        };
        let level = (self.wave / 3).max(1) + rng.gen_range(0..=2);
        (enemy_type, level)
    }

    /// Spawn due enemies. Returns the entities created this frame.
    pub fn run(
        &mut self,
        world: &mut World,
        rng: &mut ChaCha8Rng,
        arena_width: f64,
        player_position: Option<Vec2>,
        dt: f64,
    ) -> Vec<Entity> {
        let mut spawned = Vec::new();
        if self.state != WaveState::Spawning || self.to_spawn == 0 {
            return spawned;
        }

        self.spawn_timer += dt;
        if self.spawn_timer >= self.spawn_interval {
            self.spawn_timer = 0.0;
            let lanes = spawn_lanes(arena_width);
            let position = lanes[rng.gen_range(0..lanes.len())];
            let (enemy_type, level) = self.roll_enemy(rng);
            spawned.push(crate::world_setup::spawn_enemy(
                world,
                rng,
                enemy_type,
                level,
                position,
                player_position,
            ));
            self.to_spawn -= 1;
            if self.to_spawn == 0 {
                self.state = WaveState::Active;
            }
        }
        spawned
    }

    /// Advance wave completion and the inter-wave countdown.
    pub fn progress(&mut self, enemies_alive: u32, dt: f64) -> WaveTransition {
        match self.state {
            WaveState::Complete => {
                self.complete_timer -= dt;
                if self.complete_timer <= 0.0 {
                    let next = self.wave + 1;
                    self.start_wave(next);
                    WaveTransition::Started(next)
                } else {
                    WaveTransition::None
                }
            }
            _ if self.to_spawn == 0 && enemies_alive == 0 => {
                self.state = WaveState::Complete;
                self.complete_timer = WAVE_COMPLETE_DELAY_SECS;
                WaveTransition::Completed(self.wave)
            }
            _ => WaveTransition::None,
        }
    }

    /// Remove every enemy and stop spawning.
    pub fn clear_wave(&mut self, world: &mut World) -> usize {
        let enemies: Vec<Entity> = world
            .query::<&Enemy>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in &enemies {
            if let Err(error) = world.despawn(*entity) {
                warn!(?entity, %error, "enemy vanished before clear");
            }
        }
        self.to_spawn = 0;
        if self.state == WaveState::Spawning {
            self.state = WaveState::Active;
        }
        enemies.len()
    }

    pub fn view(&self, enemies_alive: u32) -> WaveView {
        WaveView {
            wave: self.wave,
            state: self.state,
            enemies_to_spawn: self.to_spawn,
            enemies_alive,
            next_wave_in: (self.state == WaveState::Complete).then_some(self.complete_timer.max(0.0)),
        }
    }
}

/// Live enemies currently in the world.
pub fn count_alive(world: &World) -> u32 {
    world
        .query::<(&Enemy, &Vitals)>()
        .iter()
        .filter(|(_, (_, vitals))| vitals.alive)
        .count() as u32
}
