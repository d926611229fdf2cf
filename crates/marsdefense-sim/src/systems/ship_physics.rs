//! Player ship kinematics: thrust, linear drag, speed clamp and wall bounce.

use hecs::World;

use marsdefense_core::commands::ThrustInput;
use marsdefense_core::components::{Buffs, Kinematics, Player, ShipHandling, Vitals};
use marsdefense_core::constants::WALL_RESTITUTION;
use marsdefense_core::types::Vec2;

/// Integrate the player ship for one frame.
pub fn run(world: &mut World, thrust: ThrustInput, arena: Vec2, dt: f64) {
    for (_entity, (_player, kin, vitals, handling)) in
        world.query_mut::<(&Player, &mut Kinematics, &Vitals, &ShipHandling)>()
    {
        if !vitals.alive {
            continue;
        }

        kin.acceleration = Vec2::ZERO;
        let push = handling.thrust / kin.mass_kg;
        if thrust.up {
            kin.acceleration.y -= push;
        }
        if thrust.down {
            kin.acceleration.y += push;
        }
        if thrust.left {
            kin.acceleration.x -= push;
        }
        if thrust.right {
            kin.acceleration.x += push;
        }
        kin.acceleration -= kin.velocity * handling.drag;

        kin.velocity += kin.acceleration * dt;
        let speed = kin.velocity.length();
        if speed > handling.max_velocity {
            kin.velocity *= handling.max_velocity / speed;
        }
        kin.position += kin.velocity * dt;

        bounce(kin, vitals.collision_radius, arena);
    }
}

fn bounce(kin: &mut Kinematics, radius: f64, arena: Vec2) {
    if kin.position.x < radius {
        kin.position.x = radius;
        kin.velocity.x = -kin.velocity.x * WALL_RESTITUTION;
    } else if kin.position.x > arena.x - radius {
        kin.position.x = arena.x - radius;
        kin.velocity.x = -kin.velocity.x * WALL_RESTITUTION;
    }
    if kin.position.y < radius {
        kin.position.y = radius;
        kin.velocity.y = -kin.velocity.y * WALL_RESTITUTION;
    } else if kin.position.y > arena.y - radius {
        kin.position.y = arena.y - radius;
        kin.velocity.y = -kin.velocity.y * WALL_RESTITUTION;
    }
}

/// Count down timed buffs.
pub fn tick_buffs(world: &mut World, dt: f64) {
    for (_entity, buffs) in world.query_mut::<&mut Buffs>() {
        buffs.overcharge_secs = (buffs.overcharge_secs - dt).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ship(world: &mut World, position: Vec2) -> hecs::Entity {
        world.spawn((
            Player,
            Kinematics::at(position, 800.0),
            Vitals::new(25_000.0, 15_000.0, 13.0),
            ShipHandling::default(),
        ))
    }

    const ARENA: Vec2 = Vec2::new(1920.0, 1080.0);

    #[test]
    fn test_thrust_accelerates() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(960.0, 540.0));
        let input = ThrustInput {
            right: true,
            ..ThrustInput::default()
        };
        run(&mut world, input, ARENA, 0.1);
        let kin = *world.get::<&Kinematics>(e).unwrap();
        // 150000 / 800 = 187.5 u/s² for 0.1 s
        assert!((kin.velocity.x - 18.75).abs() < 1e-9);
        assert!(kin.position.x > 960.0);
    }

    #[test]
    fn test_speed_is_clamped() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(960.0, 540.0));
        let input = ThrustInput {
            up: true,
            ..ThrustInput::default()
        };
        for _ in 0..600 {
            run(&mut world, input, ARENA, 1.0 / 60.0);
        }
        let kin = *world.get::<&Kinematics>(e).unwrap();
        assert!(kin.velocity.length() <= 400.0 + 1e-9);
    }

    #[test]
    fn test_drag_slows_coasting_ship() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(960.0, 540.0));
        world.get::<&mut Kinematics>(e).unwrap().velocity = Vec2::new(100.0, 0.0);
        run(&mut world, ThrustInput::default(), ARENA, 0.1);
        let kin = *world.get::<&Kinematics>(e).unwrap();
        assert!((kin.velocity.x - 97.0).abs() < 1e-9);
    }

    #[test]
    fn test_wall_bounce_with_restitution() {
        let mut world = World::new();
        let e = ship(&mut world, Vec2::new(14.0, 540.0));
        world.get::<&mut Kinematics>(e).unwrap().velocity = Vec2::new(-200.0, 0.0);
        run(&mut world, ThrustInput::default(), ARENA, 0.1);
        let kin = *world.get::<&Kinematics>(e).unwrap();
        assert_eq!(kin.position.x, 13.0);
        assert!(kin.velocity.x > 0.0);
        assert!(kin.velocity.x < 200.0 * 0.3 + 1e-9);
    }

    #[test]
    fn test_buffs_expire() {
        let mut world = World::new();
        let e = world.spawn((Buffs {
            overcharge_secs: 0.05,
        },));
        tick_buffs(&mut world, 0.1);
        assert!(!world.get::<&Buffs>(e).unwrap().overcharged());
    }
}
