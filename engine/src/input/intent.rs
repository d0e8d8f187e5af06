//! Movement intent
//!
//! The input collaborator's view of what the player wants to do this frame:
//! which movement keys are held, whether jump is held, and where the camera
//! faces. Decoupled from any windowing system; the host maps its own key
//! events onto [`KeyCode`].

use glam::Vec3;

/// Generic key codes for the controls the physics core understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    Space,
    /// Catch-all for unhandled keys
    Unknown,
}

/// Held movement keys plus the camera facing.
///
/// Applied once per sub-step, before physics integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementIntent {
    /// W key - move along the camera's horizontal forward
    pub forward: bool,
    /// S key - move backward
    pub backward: bool,
    /// A key - strafe left
    pub left: bool,
    /// D key - strafe right
    pub right: bool,
    /// Space - jump (only honoured on the floor)
    pub jump: bool,
    /// Camera look direction; only its horizontal part is used
    pub facing: Vec3,
}

impl Default for MovementIntent {
    fn default() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
            jump: false,
            facing: Vec3::NEG_Z,
        }
    }
}

impl MovementIntent {
    /// Create an intent with all keys released, facing -Z.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the held state of a key.
    ///
    /// Returns `true` if the key was a movement key and was handled.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) -> bool {
        match key {
            KeyCode::W => self.forward = pressed,
            KeyCode::S => self.backward = pressed,
            KeyCode::A => self.left = pressed,
            KeyCode::D => self.right = pressed,
            KeyCode::Space => self.jump = pressed,
            KeyCode::Unknown => return false,
        }
        true
    }

    /// Release every key, keeping the facing.
    pub fn release_all(&mut self) {
        *self = Self {
            facing: self.facing,
            ..Self::default()
        };
    }

    /// Horizontal unit forward vector, or zero when looking straight up/down.
    pub fn forward_vector(&self) -> Vec3 {
        Vec3::new(self.facing.x, 0.0, self.facing.z).normalize_or_zero()
    }

    /// Horizontal unit vector pointing to the camera's right.
    pub fn side_vector(&self) -> Vec3 {
        self.forward_vector().cross(Vec3::Y)
    }

    /// Velocity change for one step, given the acceleration magnitude
    /// `speed_delta` (already multiplied by dt).
    ///
    /// Opposite keys cancel. Diagonals are not normalised, matching a
    /// per-key impulse.
    pub fn velocity_delta(&self, speed_delta: f32) -> Vec3 {
        let forward = self.forward_vector();
        let side = self.side_vector();
        let mut delta = Vec3::ZERO;
        if self.forward {
            delta += forward * speed_delta;
        }
        if self.backward {
            delta -= forward * speed_delta;
        }
        if self.left {
            delta -= side * speed_delta;
        }
        if self.right {
            delta += side * speed_delta;
        }
        delta
    }
}
