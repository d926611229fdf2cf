//! Enemy AI system: runs the movement FSM for every live enemy.
//!
//! Calls the behaviour FSM from marsdefense-enemy-ai and writes the result
//! back into the ECS components.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use marsdefense_core::components::{Enemy, EnemyBrain, Kinematics, Vitals};
use marsdefense_core::types::Vec2;

use marsdefense_enemy_ai::fsm::{evaluate, BehaviorContext, BehaviorUpdate};

pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player_position: Option<Vec2>,
    arena_width: f64,
    dt: f64,
) {
    // Collect updates in a buffer to avoid borrow issues with hecs
    let mut updates: Vec<(Entity, BehaviorUpdate)> = Vec::new();

    {
        let mut query = world.query::<(&Enemy, &Kinematics, &Vitals, &EnemyBrain)>();
        for (entity, (_enemy, kin, vitals, brain)) in query.iter() {
            if !vitals.alive {
                continue;
            }
            let ctx = BehaviorContext {
                pattern: brain.pattern,
                target_vx: brain.target_vx,
                behavior_timer: brain.behavior_timer,
                position: kin.position,
                velocity: kin.velocity,
                radius: vitals.collision_radius,
                arena_width,
                player_position,
                dt,
            };
            updates.push((entity, evaluate(&ctx, rng)));
        }
    }

    for (entity, update) in updates {
        if let Ok((kin, brain)) = world.query_one_mut::<(&mut Kinematics, &mut EnemyBrain)>(entity) {
            kin.position = update.position;
            kin.velocity = update.velocity;
            brain.pattern = update.pattern;
            brain.target_vx = update.target_vx;
            brain.behavior_timer = update.behavior_timer;
        }
    }
}
