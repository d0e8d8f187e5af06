//! Player physics constants and configuration.
//!
//! This module defines the tunables for the player's capsule body: gravity,
//! ground and air damping, control acceleration, jumping and the respawn
//! pose used for out-of-bounds recovery.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::physics::{Capsule, damping_factor};

/// Physics constants for the player body.
///
/// # Example
///
/// ```ignore
/// use escape_arena_engine::player::PlayerPhysics;
///
/// let floaty = PlayerPhysics {
///     gravity: 12.0,
///     jump_velocity: 10.0,
///     ..PlayerPhysics::default()
/// };
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerPhysics {
    /// Gravity acceleration in m/s², applied while airborne.
    pub gravity: f32,

    /// Exponential damping rate on the ground (1/s).
    pub ground_damping: f32,

    /// Multiplier on the damping factor while airborne.
    /// 0.1 makes air movement ten times floatier than ground friction.
    pub air_damping_scale: f32,

    /// Control acceleration on the ground in m/s².
    pub ground_acceleration: f32,

    /// Control acceleration in the air in m/s².
    pub air_acceleration: f32,

    /// Vertical velocity set by a jump in m/s.
    pub jump_velocity: f32,

    /// Capsule radius in meters.
    pub radius: f32,

    /// Capsule segment start at spawn.
    pub spawn_start: Vec3,

    /// Capsule segment end at spawn.
    pub spawn_end: Vec3,

    /// Tracked height at or below which the player is respawned.
    pub out_of_bounds_y: f32,
}

impl Default for PlayerPhysics {
    fn default() -> Self {
        Self {
            gravity: 25.0,
            ground_damping: 4.0,
            air_damping_scale: 0.1,
            ground_acceleration: 25.0,
            air_acceleration: 8.0,
            jump_velocity: 15.0,
            radius: 0.35,
            spawn_start: Vec3::new(0.0, 0.35, 0.0),
            spawn_end: Vec3::new(0.0, 1.0, 0.0),
            out_of_bounds_y: -25.0,
        }
    }
}

impl PlayerPhysics {
    /// Creates PlayerPhysics with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// The capsule at the spawn pose.
    pub fn spawn_capsule(&self) -> Capsule {
        Capsule::new(self.spawn_start, self.spawn_end, self.radius)
    }

    /// Control acceleration for the current contact state.
    pub fn acceleration(&self, on_floor: bool) -> f32 {
        if on_floor {
            self.ground_acceleration
        } else {
            self.air_acceleration
        }
    }

    /// Damping factor for one step, attenuated while airborne.
    pub fn damping(&self, on_floor: bool, dt: f32) -> f32 {
        let factor = damping_factor(self.ground_damping, dt);
        if on_floor {
            factor
        } else {
            factor * self.air_damping_scale
        }
    }

    /// New vertical velocity after one step of gravity.
    pub fn apply_gravity(&self, vertical_velocity: f32, dt: f32) -> f32 {
        vertical_velocity - self.gravity * dt
    }
}
