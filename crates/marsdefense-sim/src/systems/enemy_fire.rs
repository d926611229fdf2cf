//! Enemy fire system: fire windows, bursts and aimed shots at the player.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use marsdefense_core::components::{Enemy, EnemyBrain, Kinematics, Vitals};
use marsdefense_core::events::AudioEvent;
use marsdefense_core::types::Vec2;

use marsdefense_enemy_ai::fire_control::{aim, decide, FireContext};

use crate::projectiles::{ProjectileSystem, ShotSpec};
use crate::weapons::EnemyArsenal;

/// The player as seen by enemy gunners this frame.
#[derive(Debug, Clone, Copy)]
pub struct PlayerTarget {
    pub position: Vec2,
    pub velocity: Vec2,
}

/// Run fire decisions for every live enemy. Returns the number of shots fired.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    player: Option<PlayerTarget>,
    now: f64,
    dt: f64,
    projectiles: &mut ProjectileSystem,
    audio_events: &mut Vec<AudioEvent>,
) -> u32 {
    let mut fired = 0;

    for (_entity, (enemy, kin, vitals, brain, arsenal)) in world.query_mut::<(
        &Enemy,
        &Kinematics,
        &Vitals,
        &mut EnemyBrain,
        &mut EnemyArsenal,
    )>() {
        if !vitals.alive {
            continue;
        }

        let ctx = FireContext {
            enemy_type: enemy.enemy_type,
            fire_timer: brain.fire_timer,
            burst_remaining: brain.burst_remaining,
            weapon_count: arsenal.weapons.len(),
            distance_to_player: player.map(|p| kin.position.distance(p.position)),
            dt,
        };
        let decision = decide(&ctx, rng);
        brain.fire_timer = decision.fire_timer;
        brain.burst_remaining = decision.burst_remaining;

        let Some(target) = player else {
            continue;
        };

        for index in decision.candidates {
            let Some(weapon) = arsenal.weapons.get_mut(index) else {
                continue;
            };
            let Some(velocity) = aim(&weapon.spec, kin.position, target.position, target.velocity, rng)
            else {
                continue;
            };
            if weapon.instance.try_fire(now, 1.0).is_err() {
                continue;
            }

            projectiles.spawn_kinetic_shot(ShotSpec {
                position: kin.position,
                velocity,
                mass_kg: weapon.spec.projectile_mass_kg,
                damage_mult: 1.0,
                owner_is_player: false,
            });
            audio_events.push(AudioEvent::EnemyFired {
                weapon: weapon.spec.kind,
            });
            fired += 1;

            if brain.burst_remaining > 0 && index == 0 {
                brain.burst_remaining -= 1;
            }
        }
    }

    fired
}
