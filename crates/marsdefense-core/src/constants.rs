//! Simulation constants and tuning parameters.
//!
//! Distances are arena units (1 unit ≈ 1 m at the damage model's scale),
//! energies are joules, times are seconds.

/// Nominal frame rate used by tools that drive the engine with a fixed step.
pub const TICK_RATE: u32 = 60;

/// Seconds per frame at the nominal rate.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Arena ---

/// Default arena width.
pub const ARENA_WIDTH: f64 = 1920.0;

/// Default arena height.
pub const ARENA_HEIGHT: f64 = 1080.0;

/// Margin beyond the arena bounds before bombs and shots are culled.
pub const PROJECTILE_CULL_MARGIN: f64 = 100.0;

/// Enemies below `height + ENEMY_EXIT_MARGIN` have left the playfield.
pub const ENEMY_EXIT_MARGIN: f64 = 50.0;

// --- Damage model ---

/// TNT-equivalent energy density.
pub const EXPLOSIVE_JOULES_PER_KG: f64 = 4_184_000.0;

/// Base blast radius before diameter/explosive scaling.
pub const BLAST_BASE_RADIUS: f64 = 50.0;

/// Base shrapnel range before diameter/energy scaling.
pub const SHRAPNEL_BASE_RANGE: f64 = 60.0;

/// Reference warhead diameter (m) for blast scaling.
pub const REFERENCE_DIAMETER_M: f64 = 0.05;

/// Reference explosive mass (kg) for blast scaling.
pub const REFERENCE_EXPLOSIVE_KG: f64 = 0.5;

/// Fragments generated per square meter of casing.
pub const FRAGMENTS_PER_M2: f64 = 3000.0;

/// Smallest viable fragment (kg).
pub const MIN_FRAGMENT_MASS_KG: f64 = 0.0005;

/// Fragment velocity spread per unit of diameter factor.
pub const FRAGMENT_VELOCITY_SPREAD: f64 = 0.3;

/// Distance floor for the blast terms.
pub const MIN_BLAST_DISTANCE: f64 = 0.1;

/// Share of a warhead's mass taken by the casing.
pub const CASING_MASS_FRACTION: f64 = 0.2;

/// Minimum explosive content of any warhead (kg).
pub const MIN_EXPLOSIVE_KG: f64 = 0.1;

/// Default warhead diameter (mm) when a record does not carry one.
pub const DEFAULT_WARHEAD_DIAMETER_MM: f64 = 75.0;

/// Default warhead length (mm) when a record does not carry one.
pub const DEFAULT_WARHEAD_LENGTH_MM: f64 = 300.0;

// --- Projectiles ---

/// Bomb time-to-live.
pub const BOMB_LIFETIME_SECS: f64 = 10.0;

/// Bomb proximity-fuse radius.
pub const BOMB_FUSE_RADIUS: f64 = 23.0;

/// Bomb body radius (render hint).
pub const BOMB_RADIUS: f64 = 7.0;

/// Kinetic shot time-to-live.
pub const SHOT_LIFETIME_SECS: f64 = 5.0;

/// Kinetic shot collision radius.
pub const SHOT_RADIUS: f64 = 2.0;

/// Beam corridor half-width.
pub const BEAM_WIDTH: f64 = 3.0;

/// Share of a detonation's damage applied to the player.
pub const FRIENDLY_FIRE_FRACTION: f64 = 0.1;

// --- Player ship (breacher hull) ---

pub const SHIP_THRUST: f64 = 150_000.0;
pub const SHIP_MASS_KG: f64 = 800.0;
pub const SHIP_MAX_VELOCITY: f64 = 400.0;
/// Linear drag coefficient (per second).
pub const SHIP_DRAG: f64 = 0.3;
/// Velocity retained (and reflected) on wall contact.
pub const WALL_RESTITUTION: f64 = 0.3;
pub const SHIP_HULL_JOULES: f64 = 25_000.0;
pub const SHIP_SHIELD_JOULES: f64 = 15_000.0;
pub const SHIP_RADIUS: f64 = 13.0;
/// Distance from the bottom edge at which the ship starts.
pub const SHIP_START_OFFSET_Y: f64 = 100.0;
/// Knockback impulse per sqrt(joule) of hull damage.
pub const SHIP_KNOCKBACK_FACTOR: f64 = 0.01;

/// Quiet time before shields start regenerating.
pub const SHIELD_REGEN_DELAY_SECS: f64 = 3.0;
/// Base shield regeneration (J/s).
pub const SHIELD_BASE_REGEN: f64 = 5.0;

// --- Universal cannon ---

pub const CANNON_BASE_DAMAGE: f64 = 15.0;
pub const CANNON_FIRE_RATE: f64 = 8.0;
pub const CANNON_PROJECTILE_SPEED: f64 = 800.0;
/// Half-angle of the random spread cone (radians).
pub const CANNON_SPREAD: f64 = std::f64::consts::PI / 48.0;
pub const CANNON_BARREL_COUNT: usize = 2;
pub const CANNON_BARREL_SPACING: f64 = 15.0;
/// Muzzle offset ahead of the ship centre.
pub const CANNON_MUZZLE_OFFSET: f64 = 20.0;
pub const CANNON_HEAT_PER_SHOT: f64 = 2.0;
pub const CANNON_COOLING_RATE: f64 = 20.0;
pub const CANNON_MAX_HEAT: f64 = 100.0;
/// Spread reaches zero past this level.
pub const CANNON_MAX_LEVEL: u32 = 10;

// --- Ordnance ---

pub const BREACH_BOMB_INTERVAL_SECS: f64 = 4.0;
pub const BREACH_BOMB_LAUNCH_OFFSET: f64 = 25.0;
pub const CLUSTER_STRIKE_INTERVAL_SECS: f64 = 3.0;
pub const CLUSTER_STRIKE_SPACING: f64 = 40.0;
pub const CLUSTER_STRIKE_VELOCITY_FACTOR: f64 = 1.2;
pub const CLUSTER_STRIKE_DAMAGE_FACTOR: f64 = 0.75;
pub const OVERCHARGE_INTERVAL_SECS: f64 = 15.0;
pub const OVERCHARGE_DURATION_SECS: f64 = 5.0;
pub const OVERCHARGE_DAMAGE_MULT: f64 = 1.5;
pub const PULSE_LANCE_INTERVAL_SECS: f64 = 1.5;
pub const PULSE_LANCE_DURATION_SECS: f64 = 0.5;
pub const PULSE_LANCE_LENGTH: f64 = 400.0;

// --- Waves ---

pub const WAVE_BASE_ENEMIES: u32 = 5;
pub const WAVE_ENEMIES_PER_WAVE: u32 = 2;
pub const WAVE_BASE_SPAWN_INTERVAL: f64 = 2.0;
pub const WAVE_SPAWN_INTERVAL_STEP: f64 = 0.1;
pub const WAVE_MIN_SPAWN_INTERVAL: f64 = 0.5;
/// Pause between a cleared wave and the next one.
pub const WAVE_COMPLETE_DELAY_SECS: f64 = 3.0;
pub const SPAWN_LANES: usize = 8;
pub const SPAWN_ALTITUDE: f64 = -50.0;

// --- Enemies ---

/// Lateral steering acceleration (u/s²).
pub const ENEMY_STEERING_ACCEL: f64 = 100.0;
pub const ENEMY_KNOCKBACK_FACTOR: f64 = 0.1;
/// Hull damage below this does not shove enemies.
pub const ENEMY_KNOCKBACK_THRESHOLD: f64 = 100.0;
pub const ENEMY_HP_PER_LEVEL: f64 = 0.8;
pub const ENEMY_RADIUS_PER_LEVEL: f64 = 2.0;
pub const ENEMY_MASS_PER_LEVEL: f64 = 500.0;
pub const ENEMY_EXP_PER_LEVEL: u32 = 5;
/// Probability that a given weapon joins a fire window.
pub const ENEMY_FIRE_PROBABILITY: f64 = 0.3;
pub const ENEMY_BURST_SHOTS: u32 = 3;
pub const ENEMY_WEAPON_MAX_RANGE: f64 = 600.0;
pub const ENEMY_SHOT_MASS_KG: f64 = 0.01;
pub const ENEMY_MISSILE_MASS_KG: f64 = 0.5;

// --- Progression ---

pub const EXP_BASE_PER_KILL: u32 = 10;
pub const EXP_PER_ENEMY_LEVEL: u32 = 2;
pub const LEVEL_UP_BASE_EXP: u32 = 100;
pub const LEVEL_UP_EXP_STEP: u32 = 50;
pub const STAT_POINTS_PER_LEVEL: u32 = 1;
pub const EXPLOSIVE_BONUS_PER_ATTACK_KG: f64 = 1.0;
pub const RESISTANCE_PER_DEFENSE: f64 = 0.05;
pub const MAX_DAMAGE_RESISTANCE: f64 = 0.75;
pub const DODGE_PER_EVASION: f64 = 0.03;
pub const MAX_DODGE_CHANCE: f64 = 0.5;
pub const SHIELD_CAPACITY_PER_POINT: f64 = 500.0;
pub const SHIELD_REGEN_PER_POINT: f64 = 10.0;
pub const BASE_DROP_CHANCE: f64 = 0.3;
pub const MAX_BOMB_LEVEL: u32 = 13;
