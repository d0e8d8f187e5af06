//! Config Module
//!
//! Centralized configuration for the simulation's tunables.

pub mod sim_config;

pub use sim_config::{ConfigError, PlayerConfig, ProjectileConfig, SimConfig, TargetConfig};
