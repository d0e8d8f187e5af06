//! Input Module
//!
//! Platform-agnostic movement intent consumed by the physics core. Raw key
//! and mouse capture stay with the host; it only fills in a
//! [`MovementIntent`] each frame.
//!
//! # Example
//!
//! ```rust,ignore
//! use escape_arena_engine::input::{KeyCode, MovementIntent};
//!
//! let mut intent = MovementIntent::new();
//! intent.handle_key(KeyCode::W, true);
//! intent.facing = camera_forward;
//! ```

pub mod intent;

pub use intent::{KeyCode, MovementIntent};
