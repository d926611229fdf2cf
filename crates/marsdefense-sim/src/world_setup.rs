//! Entity spawn factories for setting up the simulation world.
//!
//! Weapons are attached by composition here: the player gets a
//! [`ShipLoadout`], each enemy an [`EnemyArsenal`] for its type and level.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use marsdefense_core::components::*;
use marsdefense_core::config::SimConfig;
use marsdefense_core::constants::*;
use marsdefense_core::enums::EnemyType;
use marsdefense_core::types::Vec2;
use marsdefense_core::weapons_db::starter_bomb;

use marsdefense_enemy_ai::fire_control::initial_fire_timer;
use marsdefense_enemy_ai::fsm::{initial_behavior_timer, roll_pattern};
use marsdefense_enemy_ai::profiles::{collision_radius, exp_value, get_profile, max_hp};

use crate::weapons::{EnemyArsenal, ShipLoadout};

/// Spawn the player's ship centred near the bottom of the arena.
pub fn spawn_player(world: &mut World, config: &SimConfig) -> hecs::Entity {
    let ship = &config.ship;
    let position = Vec2::new(
        config.arena.width / 2.0,
        config.arena.height - SHIP_START_OFFSET_Y,
    );

    let mut vitals = Vitals::new(ship.hull_joules, ship.shield_joules, ship.radius);
    vitals.knockback_factor = SHIP_KNOCKBACK_FACTOR;

    world.spawn((
        Player,
        Kinematics::at(position, ship.mass_kg),
        vitals,
        ShipHandling {
            thrust: ship.thrust,
            drag: ship.drag,
            max_velocity: ship.max_velocity,
        },
        StatModifiers::default(),
        Buffs::default(),
        ShipLoadout::new(starter_bomb()),
    ))
}

/// Spawn one enemy at `position`, drifting downward.
pub fn spawn_enemy(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    enemy_type: EnemyType,
    level: u32,
    position: Vec2,
    player_position: Option<Vec2>,
) -> hecs::Entity {
    let level = level.max(1);
    let profile = get_profile(enemy_type);

    let mut kinematics = Kinematics::at(position, ENEMY_MASS_PER_LEVEL * level as f64);
    kinematics.velocity = Vec2::new(rng.gen_range(-50.0..50.0), rng.gen_range(20.0..60.0));

    let mut vitals = Vitals::new(
        max_hp(enemy_type, level),
        0.0,
        collision_radius(enemy_type, level),
    );
    vitals.knockback_factor = ENEMY_KNOCKBACK_FACTOR;
    vitals.knockback_threshold = ENEMY_KNOCKBACK_THRESHOLD;

    let (pattern, target_vx) = roll_pattern(rng, position, player_position);
    let brain = EnemyBrain {
        pattern,
        target_vx,
        behavior_timer: initial_behavior_timer(rng),
        fire_timer: initial_fire_timer(enemy_type, rng),
        burst_remaining: 0,
    };

    world.spawn((
        Enemy {
            enemy_type,
            level,
            exp_value: exp_value(enemy_type, level),
        },
        kinematics,
        vitals,
        profile.armor,
        StatModifiers::default(),
        brain,
        EnemyArsenal::for_enemy(enemy_type, level),
    ))
}
