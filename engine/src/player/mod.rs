//! Player Module
//!
//! Provides the player's physical body and its tunables.
//!
//! # Components
//!
//! - [`PlayerBody`] - Capsule collider + velocity with gravity, damping,
//!   world collision, on-floor state and out-of-bounds respawn
//! - [`PlayerPhysics`] - Gravity, damping, control acceleration, jump and spawn pose

pub mod body;
pub mod physics;

pub use body::PlayerBody;
pub use physics::PlayerPhysics;
