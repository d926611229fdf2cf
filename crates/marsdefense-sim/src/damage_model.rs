//! Joule-based damage model.
//!
//! Pure functions that turn physical weapon properties into energy delivered
//! at a target. Blast damage is a pressure term plus a fragmentation term;
//! shots deliver their kinetic energy; beams deliver power × time with a
//! range falloff.

use serde::{Deserialize, Serialize};

use marsdefense_core::components::Armor;
use marsdefense_core::constants::*;
use marsdefense_core::enums::{BeamType, DamageKind};
use marsdefense_core::types::Vec2;
use marsdefense_core::weapons_db::BombStats;

/// Physical description of an explosive payload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Warhead {
    pub explosive_kg: f64,
    pub shrapnel_kg: f64,
    pub total_mass_kg: f64,
    pub muzzle_velocity_m_s: f64,
    pub diameter_mm: f64,
    pub length_mm: f64,
    /// Product of the rarity, attack-bonus, perk and overcharge multipliers.
    pub damage_mult: f64,
}

impl Warhead {
    /// Build a warhead from a bomb record. The casing takes 20% of the mass;
    /// whatever is not shrapnel or casing is explosive (at least 0.1 kg).
    pub fn from_bomb_stats(stats: &BombStats) -> Self {
        let warhead = Self::from_masses(
            stats.mass_kg,
            stats.shrapnel_kg,
            stats.velocity_kmh,
            stats.diameter_mm,
            stats.length_mm,
        );
        Self {
            damage_mult: stats.damage_mult,
            ..warhead
        }
    }

    pub fn from_masses(
        total_mass_kg: f64,
        shrapnel_kg: f64,
        velocity_kmh: f64,
        diameter_mm: f64,
        length_mm: f64,
    ) -> Self {
        assert!(
            total_mass_kg.is_finite() && total_mass_kg > 0.0,
            "warhead mass must be positive, got {total_mass_kg}"
        );
        assert!(
            shrapnel_kg.is_finite() && shrapnel_kg >= 0.0,
            "shrapnel mass must be non-negative, got {shrapnel_kg}"
        );
        assert!(
            velocity_kmh.is_finite() && velocity_kmh >= 0.0,
            "warhead velocity must be non-negative, got {velocity_kmh}"
        );
        assert!(
            diameter_mm > 0.0 && length_mm > 0.0,
            "warhead dimensions must be positive"
        );

        let casing = total_mass_kg * CASING_MASS_FRACTION;
        Self {
            explosive_kg: (total_mass_kg - shrapnel_kg - casing).max(MIN_EXPLOSIVE_KG),
            shrapnel_kg,
            total_mass_kg,
            muzzle_velocity_m_s: velocity_kmh / 3.6,
            diameter_mm,
            length_mm,
            damage_mult: 1.0,
        }
    }

    fn diameter_m(&self) -> f64 {
        self.diameter_mm / 1000.0
    }

    /// Radius beyond which the warhead does no damage at all.
    pub fn max_damage_radius(&self) -> f64 {
        let diameter_factor = (self.diameter_m() / REFERENCE_DIAMETER_M).powf(0.5);
        let explosive_factor = (self.explosive_kg / REFERENCE_EXPLOSIVE_KG).powf(0.3);
        BLAST_BASE_RADIUS * diameter_factor * explosive_factor
    }

    /// Number of fragments the casing breaks into.
    pub fn fragment_count(&self) -> u64 {
        let d = self.diameter_m();
        let l = self.length_mm / 1000.0;

        let cylinder = std::f64::consts::PI * d * l;
        let end_caps = 2.0 * std::f64::consts::PI * (d / 2.0).powi(2);
        let by_area = (cylinder + end_caps) * FRAGMENTS_PER_M2 * aspect_efficiency(l / d);
        let by_mass = self.shrapnel_kg / MIN_FRAGMENT_MASS_KG;

        (by_area.min(by_mass) as u64).max(1)
    }

    /// Summed kinetic energy of every fragment at detonation.
    pub fn fragment_kinetic_energy(&self) -> f64 {
        let count = self.fragment_count() as f64;
        let fragment_mass = self.shrapnel_kg / count;

        let spread = FRAGMENT_VELOCITY_SPREAD * (self.diameter_mm / 50.0);
        let min_v = self.muzzle_velocity_m_s * (1.0 - spread);
        let max_v = self.muzzle_velocity_m_s * (1.0 + spread);
        let avg_v = (min_v + max_v) / 2.0;

        0.5 * fragment_mass * avg_v * avg_v * count
    }

    /// Range beyond which fragments deliver nothing.
    pub fn max_shrapnel_range(&self) -> f64 {
        let dispersion = (self.diameter_mm / 50.0).powf(0.5);
        let energy = (self.fragment_kinetic_energy() / 1_000_000.0).powf(0.2);
        SHRAPNEL_BASE_RANGE * dispersion * energy
    }
}

fn aspect_efficiency(aspect_ratio: f64) -> f64 {
    if aspect_ratio > 3.0 {
        0.8
    } else if aspect_ratio < 1.5 {
        1.2
    } else {
        1.0
    }
}

/// Energy delivered to `target` by a warhead detonating at `center`.
pub fn explosion_damage(center: Vec2, target: Vec2, warhead: &Warhead) -> f64 {
    let distance = center.distance(target);
    if distance > warhead.max_damage_radius() {
        return 0.0;
    }

    let total = pressure_damage(warhead, distance) + shrapnel_damage(warhead, distance);
    (total * warhead.damage_mult).max(0.0)
}

fn pressure_damage(warhead: &Warhead, distance: f64) -> f64 {
    let distance = if distance <= 0.0 { MIN_BLAST_DISTANCE } else { distance };

    let efficiency = (warhead.diameter_m() / REFERENCE_DIAMETER_M)
        .powf(0.2)
        .min(2.0);
    let available = warhead.explosive_kg * EXPLOSIVE_JOULES_PER_KG * efficiency;
    let effective_distance = (distance / efficiency).max(1.0);

    available / (effective_distance * effective_distance)
}

fn shrapnel_damage(warhead: &Warhead, distance: f64) -> f64 {
    let distance = if distance <= 0.0 { MIN_BLAST_DISTANCE } else { distance };

    let total_energy = warhead.fragment_kinetic_energy();
    let range = warhead.max_shrapnel_range();
    if distance > range {
        return 0.0;
    }

    let falloff = ((range - distance) / range).max(0.0);
    let hit_probability = (warhead.fragment_count() as f64 / 1000.0 * falloff.sqrt()).min(1.0);

    total_energy * hit_probability * falloff
}

/// Kinetic energy of a round: `0.5 m v²` with `v` given in km/h.
pub fn projectile_kinetic_energy(mass_kg: f64, velocity_kmh: f64) -> f64 {
    let v = velocity_kmh / 3.6;
    0.5 * mass_kg * v * v
}

/// Energy of one beam pulse at `distance` from the emitter.
pub fn energy_weapon_damage(
    power_mw: f64,
    duration_ms: f64,
    distance: f64,
    beam_type: BeamType,
) -> f64 {
    let energy = power_mw * 1_000_000.0 * (duration_ms / 1000.0);
    let falloff = match beam_type {
        BeamType::Continuous => (1.0 - distance / 200.0).max(0.1),
        BeamType::Pulse => (1.0 - distance / 150.0).max(0.05),
        BeamType::Unmodulated => 1.0,
    };
    energy * falloff
}

/// Reduce incoming energy by armor and shield absorption fractions.
pub fn apply_target_modifiers(base_joules: f64, armor: f64, shield_absorption: f64) -> f64 {
    (base_joules * (1.0 - armor) * (1.0 - shield_absorption)).max(0.0)
}

/// [`apply_target_modifiers`] with the armor fraction matching `kind`.
pub fn mitigate(base_joules: f64, armor: &Armor, kind: DamageKind) -> f64 {
    apply_target_modifiers(base_joules, armor.fraction(kind), armor.shield_absorption)
}

/// A target chosen by the proximity fuse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FuseHit {
    /// Index into the target slice.
    pub index: usize,
    pub distance: f64,
    /// True when the trigger came from the one-step lookahead.
    pub predicted: bool,
}

/// Proximity fuse check.
///
/// The nearest target already inside `fuse_radius` wins. Failing that, and
/// only when `dt > 0`, the fuse looks one Euler step ahead and accepts the
/// nearest target that would be inside the radius *and* closer than it is now.
/// A single step is not continuous collision: very fast bombs against very
/// fast targets at large `dt` can still pass through each other.
pub fn proximity_trigger(
    position: Vec2,
    velocity: Vec2,
    targets: &[Vec2],
    fuse_radius: f64,
    dt: f64,
) -> Option<FuseHit> {
    let current = targets
        .iter()
        .enumerate()
        .map(|(index, t)| (index, position.distance(*t)))
        .filter(|(_, d)| *d <= fuse_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));

    if let Some((index, distance)) = current {
        return Some(FuseHit {
            index,
            distance,
            predicted: false,
        });
    }

    if dt <= 0.0 {
        return None;
    }

    let next = position + velocity * dt;
    targets
        .iter()
        .enumerate()
        .filter_map(|(index, t)| {
            let now = position.distance(*t);
            let then = next.distance(*t);
            (then <= fuse_radius && then < now).then_some((index, then))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, distance)| FuseHit {
            index,
            distance,
            predicted: true,
        })
}

/// Shortest distance from `point` to the segment `start..end`.
pub fn point_to_segment_distance(point: Vec2, start: Vec2, end: Vec2) -> f64 {
    let segment = end - start;
    let length_sq = segment.length_squared();
    if length_sq == 0.0 {
        return point.distance(start);
    }
    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}

/// Visual/loudness hint for an explosion of `explosive_kg`.
pub fn explosion_visual_size(explosive_kg: f64) -> f64 {
    1.0 + (explosive_kg + 1.0).ln() * 0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use marsdefense_core::enums::Rarity;
    use marsdefense_core::weapons_db::standard_bomb;

    fn level_one() -> Warhead {
        Warhead::from_bomb_stats(&standard_bomb(1, Rarity::Common).unwrap())
    }

    #[test]
    fn test_level_one_warhead_derivation() {
        let w = level_one();
        assert!((w.explosive_kg - 35.0).abs() < 1e-12);
        assert!((w.muzzle_velocity_m_s - 220.0).abs() < 1e-12);
        assert_eq!(w.shrapnel_kg, 5.0);
        assert_eq!(w.damage_mult, 1.0);
    }

    #[test]
    fn test_golden_level_one_bomb_at_ten_units() {
        let w = level_one();
        let joules = explosion_damage(Vec2::ZERO, Vec2::new(10.0, 0.0), &w);
        let expected = 1_883_947.810032376;
        assert!(
            ((joules - expected) / expected).abs() < 1e-9,
            "got {joules}, expected {expected}"
        );
    }

    #[test]
    fn test_zero_beyond_max_damage_radius() {
        for level in 1..=13 {
            let w = Warhead::from_bomb_stats(&standard_bomb(level, Rarity::Common).unwrap());
            let r = w.max_damage_radius();
            for extra in [1e-6, 0.5, 10.0, 1000.0] {
                let d = explosion_damage(Vec2::ZERO, Vec2::new(r + extra, 0.0), &w);
                assert_eq!(d, 0.0, "level {level} at r+{extra}");
            }
            assert!(explosion_damage(Vec2::ZERO, Vec2::new(r * 0.5, 0.0), &w) > 0.0);
        }
    }

    #[test]
    fn test_point_blank_uses_distance_floor() {
        let w = level_one();
        let d = explosion_damage(Vec2::ZERO, Vec2::ZERO, &w);
        assert!(d.is_finite() && d > 0.0);
    }

    #[test]
    fn test_damage_mult_scales_output() {
        let base = level_one();
        let boosted = Warhead {
            damage_mult: 1.5,
            ..base
        };
        let target = Vec2::new(12.0, 5.0);
        let a = explosion_damage(Vec2::ZERO, target, &base);
        let b = explosion_damage(Vec2::ZERO, target, &boosted);
        assert!((b / a - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_fragment_count_capped_by_mass() {
        let w = Warhead::from_masses(10.0, 0.001, 800.0, 80.0, 320.0);
        assert_eq!(w.fragment_count(), 2);
        let none = Warhead::from_masses(10.0, 0.0, 800.0, 80.0, 320.0);
        assert_eq!(none.fragment_count(), 1);
    }

    #[test]
    fn test_explosive_floor() {
        let w = Warhead::from_masses(1.0, 0.9, 800.0, 80.0, 320.0);
        assert_eq!(w.explosive_kg, MIN_EXPLOSIVE_KG);
    }

    #[test]
    #[should_panic]
    fn test_negative_mass_is_rejected() {
        Warhead::from_masses(-1.0, 0.0, 800.0, 75.0, 300.0);
    }

    #[test]
    fn test_kinetic_energy_monotone() {
        let masses = [0.01, 0.1, 0.5, 1.0, 5.0];
        let speeds = [100.0, 800.0, 2880.0, 5000.0];
        for v in speeds {
            let e: Vec<f64> = masses.iter().map(|m| projectile_kinetic_energy(*m, v)).collect();
            assert!(e.windows(2).all(|w| w[1] > w[0]));
        }
        for m in masses {
            let e: Vec<f64> = speeds.iter().map(|v| projectile_kinetic_energy(m, *v)).collect();
            assert!(e.windows(2).all(|w| w[1] > w[0]));
        }
        // 0.5 kg at 800 m/s.
        assert!((projectile_kinetic_energy(0.5, 2880.0) - 160_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_energy_weapon_falloff_floors() {
        let base = 50.0 * 1e6 * 0.1;
        assert_eq!(energy_weapon_damage(50.0, 100.0, 0.0, BeamType::Pulse), base);
        assert_eq!(energy_weapon_damage(50.0, 100.0, 1000.0, BeamType::Pulse), base * 0.05);
        assert_eq!(energy_weapon_damage(50.0, 100.0, 1000.0, BeamType::Continuous), base * 0.1);
        assert_eq!(energy_weapon_damage(50.0, 100.0, 1000.0, BeamType::Unmodulated), base);
        let mid = energy_weapon_damage(50.0, 100.0, 100.0, BeamType::Continuous);
        assert!((mid - base * 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_target_modifiers() {
        assert!((apply_target_modifiers(1000.0, 0.2, 0.5) - 400.0).abs() < 1e-9);
        assert_eq!(apply_target_modifiers(1000.0, 1.5, 0.0), 0.0);
        let armor = Armor {
            kinetic: 0.5,
            ..Armor::default()
        };
        assert_eq!(mitigate(100.0, &armor, DamageKind::Kinetic), 50.0);
        assert_eq!(mitigate(100.0, &armor, DamageKind::Explosive), 100.0);
    }

    #[test]
    fn test_proximity_nearest_current_target_wins() {
        let targets = [Vec2::new(15.0, 0.0), Vec2::new(5.0, 0.0), Vec2::new(100.0, 0.0)];
        let hit = proximity_trigger(Vec2::ZERO, Vec2::ZERO, &targets, 20.0, 0.1).unwrap();
        assert_eq!(hit.index, 1);
        assert!(!hit.predicted);
    }

    #[test]
    fn test_proximity_predictive_lookahead() {
        let targets = [Vec2::new(0.0, -50.0)];
        let velocity = Vec2::new(0.0, -400.0);
        // Out of range now, inside after one 0.1 s step.
        let hit = proximity_trigger(Vec2::ZERO, velocity, &targets, 20.0, 0.1).unwrap();
        assert!(hit.predicted);
        assert!(proximity_trigger(Vec2::ZERO, velocity, &targets, 20.0, 0.0).is_none());
        // Moving away never predicts a trigger.
        assert!(proximity_trigger(Vec2::ZERO, -velocity, &targets, 20.0, 0.1).is_none());
    }

    #[test]
    fn test_point_to_segment() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(10.0, 0.0);
        assert_eq!(point_to_segment_distance(Vec2::new(5.0, 3.0), a, b), 3.0);
        assert_eq!(point_to_segment_distance(Vec2::new(-4.0, 3.0), a, b), 5.0);
        assert_eq!(point_to_segment_distance(Vec2::new(3.0, 4.0), a, a), 5.0);
    }

    #[test]
    fn test_explosion_visual_size() {
        assert_eq!(explosion_visual_size(0.0), 1.0);
        assert!(explosion_visual_size(35.0) > explosion_visual_size(1.0));
    }
}
