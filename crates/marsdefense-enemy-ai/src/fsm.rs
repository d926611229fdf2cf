//! Enemy movement state machine.
//!
//! Each enemy holds one lateral movement pattern. When its behaviour timer
//! runs out a new pattern and target lateral velocity are rolled; in between,
//! lateral velocity is steered toward the target at a fixed acceleration.
//! Vertical velocity is untouched, so enemies keep descending.

use rand::Rng;

use marsdefense_core::constants::ENEMY_STEERING_ACCEL;
use marsdefense_core::enums::BehaviorPattern;
use marsdefense_core::types::Vec2;

/// Context needed to evaluate one enemy's movement for a frame.
#[derive(Debug, Clone)]
pub struct BehaviorContext {
    pub pattern: BehaviorPattern,
    pub target_vx: f64,
    pub behavior_timer: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f64,
    pub arena_width: f64,
    pub player_position: Option<Vec2>,
    pub dt: f64,
}

/// Result of movement evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct BehaviorUpdate {
    pub pattern: BehaviorPattern,
    pub target_vx: f64,
    pub behavior_timer: f64,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pattern_changed: bool,
}

/// Seconds until the first re-roll after spawning.
pub fn initial_behavior_timer(rng: &mut impl Rng) -> f64 {
    rng.gen_range(2.0..4.0)
}

/// Roll a fresh pattern and its target lateral velocity.
pub fn roll_pattern(
    rng: &mut impl Rng,
    position: Vec2,
    player_position: Option<Vec2>,
) -> (BehaviorPattern, f64) {
    let pattern = match rng.gen_range(0..4) {
        0 => BehaviorPattern::Straight,
        1 => BehaviorPattern::Zigzag,
        2 => BehaviorPattern::TowardPlayer,
        _ => BehaviorPattern::Evasive,
    };

    let target_vx = match pattern {
        BehaviorPattern::Straight => rng.gen_range(-30.0..=30.0),
        BehaviorPattern::Zigzag => {
            if rng.gen_bool(0.5) {
                -60.0
            } else {
                60.0
            }
        }
        BehaviorPattern::TowardPlayer => match player_position {
            Some(player) => {
                let speed: f64 = rng.gen_range(0.0..=40.0);
                speed.copysign(player.x - position.x)
            }
            None => rng.gen_range(-40.0..=40.0),
        },
        BehaviorPattern::Evasive => rng.gen_range(-80.0..=80.0),
    };

    (pattern, target_vx)
}

/// Evaluate movement for one frame.
pub fn evaluate(ctx: &BehaviorContext, rng: &mut impl Rng) -> BehaviorUpdate {
    let mut pattern = ctx.pattern;
    let mut target_vx = ctx.target_vx;
    let mut behavior_timer = ctx.behavior_timer - ctx.dt;
    let mut pattern_changed = false;

    if behavior_timer <= 0.0 {
        let (p, vx) = roll_pattern(rng, ctx.position, ctx.player_position);
        pattern = p;
        target_vx = vx;
        behavior_timer = rng.gen_range(1.5..3.5);
        pattern_changed = true;
    }

    let mut velocity = ctx.velocity;
    velocity.x = steer(velocity.x, target_vx, ENEMY_STEERING_ACCEL * ctx.dt);

    let mut position = ctx.position + velocity * ctx.dt;

    // Side walls: reflect both the motion and the steering goal, but only
    // while heading out of the arena.
    let min_x = ctx.radius;
    let max_x = ctx.arena_width - ctx.radius;
    let outward =
        (position.x <= min_x && velocity.x < 0.0) || (position.x >= max_x && velocity.x > 0.0);
    if outward {
        velocity.x = -velocity.x;
        target_vx = -target_vx;
    }
    position.x = position.x.clamp(min_x, max_x.max(min_x));

    BehaviorUpdate {
        pattern,
        target_vx,
        behavior_timer,
        position,
        velocity,
        pattern_changed,
    }
}

/// Move `current` toward `target` by at most `max_step`.
fn steer(current: f64, target: f64, max_step: f64) -> f64 {
    if current < target {
        (current + max_step).min(target)
    } else if current > target {
        (current - max_step).max(target)
    } else {
        current
    }
}
