//! Cleanup system: removes enemies that are destroyed or have left the arena.

use hecs::{Entity, World};
use tracing::warn;

use marsdefense_core::components::{Enemy, Kinematics, Vitals};
use marsdefense_core::constants::ENEMY_EXIT_MARGIN;

/// Despawn dead enemies and those below the bottom edge.
/// Uses a pre-allocated buffer to avoid per-frame allocation.
/// Returns how many enemies escaped off-screen.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>, arena_height: f64) -> u32 {
    despawn_buffer.clear();
    let mut escaped = 0;

    for (entity, (_enemy, kin, vitals)) in world.query_mut::<(&Enemy, &Kinematics, &Vitals)>() {
        if !vitals.alive {
            despawn_buffer.push(entity);
        } else if kin.position.y > arena_height + ENEMY_EXIT_MARGIN {
            despawn_buffer.push(entity);
            escaped += 1;
        }
    }

    for entity in despawn_buffer.drain(..) {
        if let Err(error) = world.despawn(entity) {
            warn!(?entity, %error, "enemy already despawned");
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsdefense_core::enums::EnemyType;
    use marsdefense_core::types::Vec2;

    fn enemy(world: &mut World, y: f64, alive: bool) -> Entity {
        let mut vitals = Vitals::new(100.0, 0.0, 10.0);
        vitals.alive = alive;
        world.spawn((
            Enemy {
                enemy_type: EnemyType::Fighter,
                level: 1,
                exp_value: 10,
            },
            Kinematics::at(Vec2::new(100.0, y), 500.0),
            vitals,
        ))
    }

    #[test]
    fn test_removes_dead_and_escaped() {
        let mut world = World::new();
        let mut buffer = Vec::new();
        let dead = enemy(&mut world, 100.0, false);
        let escaped = enemy(&mut world, 1131.0, true);
        let on_screen = enemy(&mut world, 1100.0, true);

        assert_eq!(run(&mut world, &mut buffer, 1080.0), 1);
        assert!(!world.contains(dead));
        assert!(!world.contains(escaped));
        assert!(world.contains(on_screen));
    }
}
