//! Player Body
//!
//! The player's capsule collider and velocity. Integrates gravity and
//! damping, resolves contacts against the static world with the slide
//! policy, and recovers from falling out of the world.
//!
//! # Usage
//!
//! ```rust,ignore
//! use escape_arena_engine::player::{PlayerBody, PlayerPhysics};
//!
//! let mut body = PlayerBody::new(PlayerPhysics::default());
//!
//! // Each sub-step:
//! body.apply_controls(&intent, dt);
//! body.integrate(dt);
//! body.handle_collisions(&octree);
//! body.teleport_if_out_of_bounds();
//! ```

use glam::Vec3;

use super::physics::PlayerPhysics;
use crate::input::MovementIntent;
use crate::physics::{Capsule, Collider, Contact, SpatialIndex, resolve, slide_response};

/// Player capsule body.
#[derive(Debug, Clone)]
pub struct PlayerBody {
    capsule: Capsule,
    velocity: Vec3,
    on_floor: bool,
    physics: PlayerPhysics,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self::new(PlayerPhysics::default())
    }
}

impl PlayerBody {
    /// A body at the spawn pose, at rest, airborne until the first contact.
    pub fn new(physics: PlayerPhysics) -> Self {
        Self {
            capsule: physics.spawn_capsule(),
            velocity: Vec3::ZERO,
            on_floor: false,
            physics,
        }
    }

    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    /// Move the capsule to an explicit pose (level setup, tests).
    pub fn set_capsule(&mut self, capsule: Capsule) {
        self.capsule = capsule;
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    pub fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    pub fn physics(&self) -> &PlayerPhysics {
        &self.physics
    }

    /// Height tracked for out-of-bounds checks: the capsule's upper end.
    pub fn tracked_height(&self) -> f32 {
        self.capsule.end.y
    }

    /// Where a throw leaves the avatar: just outside the capsule's upper end
    /// along `direction`.
    pub fn launch_origin(&self, direction: Vec3) -> Vec3 {
        self.capsule.end + direction * (self.capsule.radius * 1.5)
    }

    /// Map movement intent to a velocity change for one step.
    ///
    /// Jumping only works from the floor and sets the vertical velocity
    /// outright.
    pub fn apply_controls(&mut self, intent: &MovementIntent, dt: f32) {
        let speed_delta = dt * self.physics.acceleration(self.on_floor);
        self.velocity += intent.velocity_delta(speed_delta);

        if self.on_floor && intent.jump {
            self.velocity.y = self.physics.jump_velocity;
        }
    }

    /// Apply gravity (when airborne) and damping, then move the capsule.
    pub fn integrate(&mut self, dt: f32) {
        if !self.on_floor {
            self.velocity.y = self.physics.apply_gravity(self.velocity.y, dt);
        }
        let damping = self.physics.damping(self.on_floor, dt);
        self.velocity += self.velocity * damping;
        self.capsule.translate(self.velocity * dt);
    }

    /// Resolve the capsule against the world and update `on_floor`.
    ///
    /// Returns the contact that was applied, if any.
    pub fn handle_collisions<I: SpatialIndex + ?Sized>(&mut self, world: &I) -> Option<Contact> {
        self.on_floor = false;

        let contact = resolve(&Collider::Capsule(self.capsule), world)?;
        let response = slide_response(self.velocity, &contact);
        self.on_floor = response.on_floor;
        self.velocity = response.velocity;
        self.capsule.translate(response.correction);
        Some(contact)
    }

    /// Respawn if the player fell below the world.
    ///
    /// Returns `true` if the body was reset.
    pub fn teleport_if_out_of_bounds(&mut self) -> bool {
        if self.tracked_height() > self.physics.out_of_bounds_y {
            return false;
        }
        log::debug!(
            "Player out of bounds at y = {:.2}, respawning",
            self.tracked_height()
        );
        self.reset();
        true
    }

    /// Back to the spawn pose, at rest.
    pub fn reset(&mut self) {
        self.capsule = self.physics.spawn_capsule();
        self.velocity = Vec3::ZERO;
        self.on_floor = false;
    }
}
