//! Game systems: self-contained modules that own their state and logic.

pub mod projectile_system;
pub mod step_integrator;
pub mod target_system;

pub use projectile_system::{ProjectileSystem, ProjectileUpdate};
pub use step_integrator::StepIntegrator;
pub use target_system::{Target, TargetField, TargetHit};
