//! Enemy fire decisions and aiming.
//!
//! Decides *which* weapons try to fire this frame. Whether a weapon actually
//! discharges (interval, ammo) is left to the weapon instances in the sim.

use rand::Rng;

use marsdefense_core::constants::{ENEMY_BURST_SHOTS, ENEMY_FIRE_PROBABILITY};
use marsdefense_core::enums::EnemyType;
use marsdefense_core::types::{direction, Vec2};

use crate::profiles::{get_profile, EnemyWeaponSpec};

/// Seconds until the first fire window after spawning.
pub fn initial_fire_timer(enemy_type: EnemyType, rng: &mut impl Rng) -> f64 {
    rng.gen_range(1.5..3.0) * get_profile(enemy_type).fire_interval_factor
}

/// Seconds between subsequent fire windows.
pub fn next_fire_interval(enemy_type: EnemyType, rng: &mut impl Rng) -> f64 {
    rng.gen_range(2.0..4.0) * get_profile(enemy_type).fire_interval_factor
}

/// Inputs for one enemy's fire decision.
#[derive(Debug, Clone)]
pub struct FireContext {
    pub enemy_type: EnemyType,
    pub fire_timer: f64,
    pub burst_remaining: u32,
    pub weapon_count: usize,
    /// Distance to the player, `None` when there is no live player.
    pub distance_to_player: Option<f64>,
    pub dt: f64,
}

/// Which weapons should attempt to fire, plus the updated timer state.
#[derive(Debug, Clone, PartialEq)]
pub struct FireDecision {
    pub fire_timer: f64,
    pub burst_remaining: u32,
    /// Indices into the enemy's loadout, in firing order.
    pub candidates: Vec<usize>,
}

/// Evaluate the fire timer and the per-weapon probability gate.
pub fn decide(ctx: &FireContext, rng: &mut impl Rng) -> FireDecision {
    let profile = get_profile(ctx.enemy_type);
    let mut decision = FireDecision {
        fire_timer: ctx.fire_timer - ctx.dt,
        burst_remaining: ctx.burst_remaining,
        candidates: Vec::new(),
    };

    let in_range = ctx
        .distance_to_player
        .is_some_and(|d| d <= profile.engagement_range);

    if decision.fire_timer <= 0.0 {
        decision.fire_timer = next_fire_interval(ctx.enemy_type, rng);
        if in_range && ctx.weapon_count > 0 {
            if profile.burst_fire {
                decision.burst_remaining = ENEMY_BURST_SHOTS;
            } else {
                decision.candidates = (0..ctx.weapon_count)
                    .filter(|_| rng.gen_bool(ENEMY_FIRE_PROBABILITY))
                    .collect();
            }
        }
    }

    // Bursts drain through the primary weapon as its interval allows.
    if decision.burst_remaining > 0 {
        if in_range && ctx.weapon_count > 0 {
            decision.candidates = vec![0];
        } else {
            decision.burst_remaining = 0;
        }
    }

    decision
}

/// First-order lead: where to aim so a shot at `projectile_speed` meets a
/// target moving at constant velocity. Returns `None` beyond `max_range`.
pub fn lead_angle(
    shooter: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    projectile_speed: f64,
    max_range: f64,
) -> Option<f64> {
    let distance = shooter.distance(target);
    if distance > max_range || projectile_speed <= 0.0 {
        return None;
    }
    let time_to_impact = distance / projectile_speed;
    let predicted = target + target_velocity * time_to_impact;
    let delta = predicted - shooter;
    Some(delta.y.atan2(delta.x))
}

/// Muzzle velocity for `spec` aimed at the target, with accuracy spread applied.
pub fn aim(
    spec: &EnemyWeaponSpec,
    shooter: Vec2,
    target: Vec2,
    target_velocity: Vec2,
    rng: &mut impl Rng,
) -> Option<Vec2> {
    let angle = lead_angle(
        shooter,
        target,
        target_velocity,
        spec.projectile_speed,
        spec.max_range,
    )?;
    let spread = std::f64::consts::PI / 12.0 * (1.0 - spec.accuracy);
    let jitter = if spread > 0.0 {
        rng.gen_range(-spread..=spread)
    } else {
        0.0
    };
    Some(direction(angle + jitter) * spec.projectile_speed)
}
