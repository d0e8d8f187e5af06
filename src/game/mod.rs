//! Game Module
//!
//! Gameplay built on top of the engine: the projectile pool, shooting
//! targets, the simulation state and the fixed sub-step driver.

pub mod config;
pub mod state;
pub mod systems;

pub use config::{ConfigError, SimConfig};
pub use state::{LaunchError, LaunchRequest, SimulationState, StepEvent};
pub use systems::{ProjectileSystem, StepIntegrator, TargetField};
