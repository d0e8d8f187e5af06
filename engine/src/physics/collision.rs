//! Collision resolution
//!
//! This module defines the contract between the physics core and the static
//! world ([`SpatialIndex`]) and the resolver that turns a spatial query into
//! a single [`Contact`].
//!
//! The resolver never mutates anything. Callers apply one of two response
//! policies to the contact they get back:
//!
//! - [`bounce_response`] for projectiles: the normal velocity component is
//!   reflected with a restitution factor (1.5 by default, so bounces gain
//!   energy on purpose).
//! - [`slide_response`] for the player: floor contacts only report
//!   `on_floor`, any other contact cancels the velocity going into the
//!   surface.
//!
//! Both push the volume out of penetration in a single step along
//! `normal * depth`; there is no iterative multi-contact solve.
//!
//! # Example
//!
//! ```ignore
//! use escape_arena_engine::physics::{resolve, slide_response, Collider, Capsule};
//! use glam::Vec3;
//!
//! let capsule = Capsule::new(Vec3::new(0.0, 0.3, 0.0), Vec3::new(0.0, 1.0, 0.0), 0.35);
//! if let Some(contact) = resolve(&Collider::Capsule(capsule), &octree) {
//!     let response = slide_response(velocity, &contact);
//!     velocity = response.velocity;
//! }
//! ```

use glam::Vec3;

use super::types::{Capsule, Sphere};

/// Penetration depths below this are treated as floating-point noise and not
/// corrected.
pub const DEPTH_EPSILON: f32 = 1e-10;

/// Default restitution for projectile-vs-world bounces.
pub const DEFAULT_BOUNCE: f32 = 1.5;

/// The single contact reported for a volume against the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal pointing out of the world geometry
    pub normal: Vec3,
    /// Penetration depth along `normal` (>= 0)
    pub depth: f32,
}

impl Contact {
    pub fn new(normal: Vec3, depth: f32) -> Self {
        Self { normal, depth }
    }

    /// Translation that moves the volume out of penetration.
    ///
    /// Zero when the depth is below [`DEPTH_EPSILON`].
    pub fn correction(&self) -> Vec3 {
        if self.depth >= DEPTH_EPSILON {
            self.normal * self.depth
        } else {
            Vec3::ZERO
        }
    }
}

/// Static collision-query structure built once from world geometry.
///
/// Implementations pick the contact themselves (deepest, accumulated, ...);
/// the physics core trusts the answer and never aggregates contacts.
pub trait SpatialIndex {
    /// Contact of a capsule against the world, if they overlap.
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact>;

    /// Contact of a sphere against the world, if they overlap.
    fn sphere_intersect(&self, sphere: &Sphere) -> Option<Contact>;
}

impl<T: SpatialIndex + ?Sized> SpatialIndex for &T {
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        (**self).capsule_intersect(capsule)
    }

    fn sphere_intersect(&self, sphere: &Sphere) -> Option<Contact> {
        (**self).sphere_intersect(sphere)
    }
}

/// A moving volume the resolver can query with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    Capsule(Capsule),
    Sphere(Sphere),
}

impl From<Capsule> for Collider {
    fn from(capsule: Capsule) -> Self {
        Self::Capsule(capsule)
    }
}

impl From<Sphere> for Collider {
    fn from(sphere: Sphere) -> Self {
        Self::Sphere(sphere)
    }
}

/// Query the world for the contact of `volume`.
///
/// Returns `None` when there is no overlap. A contact with a non-finite or
/// zero normal is treated as no contact.
pub fn resolve<I: SpatialIndex + ?Sized>(volume: &Collider, index: &I) -> Option<Contact> {
    let contact = match volume {
        Collider::Capsule(capsule) => index.capsule_intersect(capsule),
        Collider::Sphere(sphere) => index.sphere_intersect(sphere),
    }?;

    if !contact.normal.is_finite() || contact.normal == Vec3::ZERO || !contact.depth.is_finite() {
        return None;
    }
    Some(Contact::new(contact.normal, contact.depth.max(0.0)))
}

// =============================================================================
// Response policies
// =============================================================================

/// Projectile-vs-world response: reflect the normal velocity component,
/// scaled by `bounce`.
///
/// Only velocity heading into the surface is reflected. The tangential
/// component is left untouched.
pub fn bounce_response(velocity: Vec3, contact: &Contact, bounce: f32) -> Vec3 {
    let into_surface = contact.normal.dot(velocity);
    if into_surface < 0.0 {
        velocity - contact.normal * (into_surface * bounce)
    } else {
        velocity
    }
}

/// Outcome of [`slide_response`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlideResponse {
    /// Contact normal points upward
    pub on_floor: bool,
    /// Velocity after the response
    pub velocity: Vec3,
    /// Translation to apply to the capsule
    pub correction: Vec3,
}

/// Player-vs-world response.
///
/// `on_floor` is `normal.y > 0`. Airborne contacts (walls, ceilings) remove
/// the velocity component heading into the surface; floor contacts keep the
/// velocity as is. The penetration is always corrected.
pub fn slide_response(velocity: Vec3, contact: &Contact) -> SlideResponse {
    let on_floor = contact.normal.y > 0.0;
    let mut velocity = velocity;
    if !on_floor {
        let into_surface = contact.normal.dot(velocity);
        if into_surface < 0.0 {
            velocity -= contact.normal * into_surface;
        }
    }

    SlideResponse {
        on_floor,
        velocity,
        correction: contact.correction(),
    }
}

/// Equal-mass 1-D elastic collision along `normal`.
///
/// Each body loses its own normal component and gains the other's; the
/// tangential components are untouched. `normal` must be unit length.
pub fn elastic_exchange(v1: Vec3, v2: Vec3, normal: Vec3) -> (Vec3, Vec3) {
    let v1n = normal * normal.dot(v1);
    let v2n = normal * normal.dot(v2);
    (v1 - v1n + v2n, v2 - v2n + v1n)
}
