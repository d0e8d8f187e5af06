//! Render output
//!
//! The physics core does not draw. It writes per-slot projectile hints and
//! the player pose into a [`VisualSink`]; the host's renderer owns the rest.

pub mod instances;

pub use instances::{InstanceBuffer, NullSink, ProjectileInstance, VisualSink};
