//! Shield regeneration and capacity refresh.

use hecs::{Entity, World};

use marsdefense_core::components::{StatModifiers, Vitals};
use marsdefense_core::constants::{SHIELD_BASE_REGEN, SHIELD_REGEN_DELAY_SECS};

/// Advance the regen delay and restore shields that have waited long enough.
pub fn run(world: &mut World, dt: f64) {
    for (_entity, (vitals, mods)) in world.query_mut::<(&mut Vitals, &StatModifiers)>() {
        if !vitals.alive {
            continue;
        }
        vitals.since_damage_secs += dt;
        if vitals.since_damage_secs >= SHIELD_REGEN_DELAY_SECS && vitals.shield < vitals.max_shield
        {
            let rate = SHIELD_BASE_REGEN + mods.shield_regen_bonus;
            vitals.shield = (vitals.shield + rate * dt).min(vitals.max_shield);
        }
    }
}

/// Install fresh modifiers on `entity` and recompute its shield capacity.
pub fn apply_modifiers(world: &mut World, entity: Entity, modifiers: StatModifiers) {
    let Ok((vitals, mods)) = world.query_one_mut::<(&mut Vitals, &mut StatModifiers)>(entity)
    else {
        return;
    };
    *mods = modifiers;
    vitals.max_shield =
        (vitals.base_shield + modifiers.shield_capacity_bonus) * modifiers.shield_capacity_mult;
    vitals.shield = vitals.shield.min(vitals.max_shield);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regen_waits_for_delay() {
        let mut world = World::new();
        let mut vitals = Vitals::new(1000.0, 100.0, 10.0);
        vitals.shield = 50.0;
        let e = world.spawn((vitals, StatModifiers::default()));

        run(&mut world, 2.0);
        assert_eq!(world.get::<&Vitals>(e).unwrap().shield, 50.0);

        run(&mut world, 2.0);
        assert_eq!(world.get::<&Vitals>(e).unwrap().shield, 60.0);
    }

    #[test]
    fn test_regen_caps_at_max() {
        let mut world = World::new();
        let mut vitals = Vitals::new(1000.0, 100.0, 10.0);
        vitals.shield = 99.0;
        vitals.since_damage_secs = 10.0;
        let mods = StatModifiers {
            shield_regen_bonus: 100.0,
            ..StatModifiers::default()
        };
        let e = world.spawn((vitals, mods));
        run(&mut world, 1.0);
        assert_eq!(world.get::<&Vitals>(e).unwrap().shield, 100.0);
    }

    #[test]
    fn test_capacity_follows_modifiers() {
        let mut world = World::new();
        let e = world.spawn((Vitals::new(1000.0, 15_000.0, 10.0), StatModifiers::default()));
        apply_modifiers(
            &mut world,
            e,
            StatModifiers {
                shield_capacity_bonus: 1000.0,
                shield_capacity_mult: 1.5,
                ..StatModifiers::default()
            },
        );
        let vitals = *world.get::<&Vitals>(e).unwrap();
        assert_eq!(vitals.max_shield, 24_000.0);
        assert_eq!(vitals.shield, 15_000.0);
        assert_eq!(world.get::<&StatModifiers>(e).unwrap().shield_capacity_mult, 1.5);
    }
}
