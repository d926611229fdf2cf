//! Enemy behaviour for the MARS DEFENSE simulation.
//!
//! Pure functions: movement patterns, per-type profiles, and fire control.
//! Nothing here touches the ECS world; the sim's systems build a context,
//! call in, and apply the returned update.

pub mod fire_control;
pub mod fsm;
pub mod profiles;
