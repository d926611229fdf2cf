//! ECS systems that operate on the simulation world each frame.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components, except the wave
//! director which carries the wave counter between frames.

pub mod cleanup;
pub mod enemy_ai;
pub mod enemy_fire;
pub mod shield_regen;
pub mod ship_physics;
pub mod snapshot;
pub mod wave_spawner;
