//! Simulation engine for MARS DEFENSE.
//!
//! Owns the hecs ECS world, runs systems once per supplied frame step,
//! and produces CombatSnapshots for the frontend.

pub mod combat;
pub mod damage_model;
pub mod engine;
pub mod frame_events;
pub mod progression;
pub mod projectiles;
pub mod systems;
pub mod weapons;
pub mod world_setup;

pub use engine::SimulationEngine;
pub use marsdefense_core as core;

#[cfg(test)]
mod tests;
