//! Physics module for the Escape Arena core
//!
//! Collision queries, response policies and projectile ballistics. Built
//! from scratch on glam; no external physics library.
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, seconds for time.
//!
//! # Submodules
//!
//! - [`types`] - glam re-exports and the collision volumes (capsule, sphere, triangle)
//! - [`collision`] - the `SpatialIndex` contract, the resolver and response policies
//! - [`octree`] - triangle octree implementing `SpatialIndex`
//! - [`ballistics`] - projectile slots, damping and the throw charge curve

pub mod ballistics;
pub mod collision;
pub mod octree;
pub mod types;

// Re-export commonly used types at the physics module level
pub use ballistics::{
    BallisticsConfig, ChargeCurve, Lifetime, PARKED_POSITION, Projectile, ProjectileState,
    damping_factor,
};
pub use collision::{
    Collider, Contact, DEFAULT_BOUNCE, DEPTH_EPSILON, SlideResponse, SpatialIndex,
    bounce_response, elastic_exchange, resolve, slide_response,
};
pub use octree::Octree;
pub use types::{Aabb, Capsule, Sphere, Triangle, Vec3};
