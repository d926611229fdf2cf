//! Damage application to entities.
//!
//! Evasion, resistance, shield-before-hull absorption, knockback and the
//! one-way Alive → Dead transition all happen here, in that order.

use rand::Rng;
use tracing::trace;

use marsdefense_core::components::{Kinematics, StatModifiers, Vitals};
use marsdefense_core::enums::DamageKind;
use marsdefense_core::types::direction;

/// Outcome of a single `take_damage` call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DamageReport {
    pub evaded: bool,
    pub shield_damage: f64,
    pub hull_damage: f64,
    /// True only on the call that took the hull to zero.
    pub killed: bool,
}

impl DamageReport {
    pub fn total(&self) -> f64 {
        self.shield_damage + self.hull_damage
    }
}

/// Mutable view of the components damage touches.
pub struct DamageTarget<'a> {
    pub vitals: &'a mut Vitals,
    pub kinematics: &'a mut Kinematics,
    pub modifiers: &'a StatModifiers,
}

impl<'a> DamageTarget<'a> {
    pub fn new(
        vitals: &'a mut Vitals,
        kinematics: &'a mut Kinematics,
        modifiers: &'a StatModifiers,
    ) -> Self {
        Self {
            vitals,
            kinematics,
            modifiers,
        }
    }

    /// Apply `joules` of incoming energy.
    ///
    /// A dead target ignores damage and never reports a second kill.
    pub fn take_damage(&mut self, joules: f64, kind: DamageKind, rng: &mut impl Rng) -> DamageReport {
        let mut report = DamageReport::default();
        if !self.vitals.alive || joules.is_nan() || joules <= 0.0 {
            return report;
        }

        // Evasion comes before any pool is touched.
        if rng.gen::<f64>() < self.modifiers.dodge_chance {
            report.evaded = true;
            return report;
        }

        let mut remaining = joules * (1.0 - self.modifiers.damage_resistance);

        let absorbed = remaining.min(self.vitals.shield);
        self.vitals.shield -= absorbed;
        remaining -= absorbed;
        report.shield_damage = absorbed;

        if remaining > 0.0 {
            let hull = remaining.min(self.vitals.hp);
            self.vitals.hp = (self.vitals.hp - hull).max(0.0);
            report.hull_damage = hull;

            if hull > self.vitals.knockback_threshold && self.vitals.knockback_factor > 0.0 {
                let angle = rng.gen_range(0.0..std::f64::consts::TAU);
                self.kinematics.velocity +=
                    direction(angle) * hull.sqrt() * self.vitals.knockback_factor;
            }
        }

        self.vitals.since_damage_secs = 0.0;

        if self.vitals.hp <= 0.0 {
            self.vitals.hp = 0.0;
            self.vitals.alive = false;
            report.killed = true;
        }

        trace!(
            ?kind,
            joules,
            shield = report.shield_damage,
            hull = report.hull_damage,
            killed = report.killed,
            "damage applied"
        );

        report
    }
}
