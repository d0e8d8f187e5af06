//! Simulation Configuration
//!
//! Every tunable of the physics core in one place. `Default` returns the
//! values the arcade games ship with; a JSON file can override any subset
//! of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::physics::{BallisticsConfig, ChargeCurve, Lifetime};
use crate::player::PlayerPhysics;

/// Player tunables. Shared with the engine's player body.
pub type PlayerConfig = PlayerPhysics;

/// Errors from loading or validating a [`SimConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Projectile pool configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Number of preallocated slots
    pub pool_size: usize,
    /// Multiplier on the thrower's velocity added to each launch
    pub carry_scale: f32,
    /// Gravity, damping, bounce and radius
    pub ballistics: BallisticsConfig,
    /// Held-throw impulse curve
    pub charge: ChargeCurve,
    /// Fireball fade/expiry. `None` keeps projectiles alive until recycled.
    pub lifetime: Option<Lifetime>,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            pool_size: 100,
            carry_scale: 2.0,
            ballistics: BallisticsConfig::default(),
            charge: ChargeCurve::default(),
            lifetime: Some(Lifetime::default()),
        }
    }
}

/// Shooting-target configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Targets placed per wave
    pub count: usize,
    /// Target radius (meters)
    pub radius: f32,
    /// Extra slack added to the hit distance
    pub collision_offset: f32,
    /// Points for a dead-center hit
    pub base_points: f32,
    /// Side of the square spawn area centered on the origin
    pub area_size: f32,
    pub min_height: f32,
    pub max_height: f32,
    /// Probe sphere radius used to keep targets out of walls
    pub spawn_probe_radius: f32,
    /// Placement attempts per target before giving up
    pub max_spawn_attempts: u32,
    /// Start a new wave when the last target is hit
    pub respawn_on_clear: bool,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            count: 5,
            radius: 0.5,
            collision_offset: 0.5,
            base_points: 10.0,
            area_size: 20.0,
            min_height: 0.5,
            max_height: 3.0,
            spawn_probe_radius: 0.6,
            max_spawn_attempts: 64,
            respawn_on_clear: true,
        }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frame deltas above this are clamped (seconds)
    pub max_frame_delta: f32,
    /// Equal sub-steps per frame
    pub steps_per_frame: u32,
    /// Seed for target placement
    pub seed: u64,
    pub player: PlayerConfig,
    pub projectiles: ProjectileConfig,
    pub targets: TargetConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_frame_delta: 0.05,
            steps_per_frame: 5,
            seed: 0x5EED,
            player: PlayerConfig::default(),
            projectiles: ProjectileConfig::default(),
            targets: TargetConfig::default(),
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the integrator cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_frame_delta > 0.0) {
            return Err(ConfigError::invalid("max_frame_delta", "must be positive"));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::invalid("steps_per_frame", "must be at least 1"));
        }

        let player = &self.player;
        if !(player.radius > 0.0) {
            return Err(ConfigError::invalid("player.radius", "must be positive"));
        }
        if player.ground_damping < 0.0 {
            return Err(ConfigError::invalid("player.ground_damping", "must not be negative"));
        }

        let projectiles = &self.projectiles;
        if projectiles.pool_size == 0 {
            return Err(ConfigError::invalid("projectiles.pool_size", "must be at least 1"));
        }
        if !(projectiles.ballistics.radius > 0.0) {
            return Err(ConfigError::invalid("projectiles.ballistics.radius", "must be positive"));
        }
        if projectiles.ballistics.damping < 0.0 {
            return Err(ConfigError::invalid(
                "projectiles.ballistics.damping",
                "must not be negative",
            ));
        }
        if let Some(lifetime) = &projectiles.lifetime
            && lifetime.fade_start > lifetime.lifetime
        {
            return Err(ConfigError::invalid(
                "projectiles.lifetime.fade_start",
                format!(
                    "{} is after the lifetime of {}",
                    lifetime.fade_start, lifetime.lifetime
                ),
            ));
        }

        let targets = &self.targets;
        if !(targets.radius > 0.0) {
            return Err(ConfigError::invalid("targets.radius", "must be positive"));
        }
        if !(targets.area_size.is_finite() && targets.area_size >= 0.0) {
            return Err(ConfigError::invalid("targets.area_size", "must be finite and not negative"));
        }
        if !(targets.min_height.is_finite() && targets.max_height.is_finite()) {
            return Err(ConfigError::invalid("targets.min_height", "heights must be finite"));
        }
        if !(targets.spawn_probe_radius.is_finite() && targets.spawn_probe_radius > 0.0) {
            return Err(ConfigError::invalid(
                "targets.spawn_probe_radius",
                "must be finite and positive",
            ));
        }
        if targets.min_height > targets.max_height {
            return Err(ConfigError::invalid(
                "targets.min_height",
                "must not exceed targets.max_height",
            ));
        }

        Ok(())
    }

    /// Length of one sub-step for a given frame delta. NaN counts as zero.
    pub fn sub_step(&self, frame_delta: f32) -> f32 {
        if frame_delta.is_nan() {
            return 0.0;
        }
        frame_delta.clamp(0.0, self.max_frame_delta) / self.steps_per_frame as f32
    }
}
