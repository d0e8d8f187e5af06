//! Physics primitive types
//!
//! Core mathematical types re-exported from glam, plus the collision
//! volumes the physics core works with: capsules for the player, spheres for
//! projectiles and targets, triangles for static world geometry.

use serde::{Deserialize, Serialize};

pub use glam::Vec3;

/// A cylinder with hemispherical caps, defined by a segment and a radius.
///
/// By convention `start` is the lower end (`start.y <= end.y`), but nothing
/// relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capsule {
    /// Lower segment endpoint (center of the bottom cap)
    pub start: Vec3,
    /// Upper segment endpoint (center of the top cap)
    pub end: Vec3,
    /// Cap and cylinder radius (meters, > 0)
    pub radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Self {
        Self { start, end, radius }
    }

    /// Midpoint of the segment.
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) * 0.5
    }

    /// Move both endpoints by `offset`.
    pub fn translate(&mut self, offset: Vec3) {
        self.start += offset;
        self.end += offset;
    }

    /// Axis-aligned bounds of the whole volume, caps included.
    pub fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.start.min(self.end) - r, self.start.max(self.end) + r)
    }
}

/// A sphere collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    pub fn bounds(&self) -> Aabb {
        let r = Vec3::splat(self.radius);
        Aabb::new(self.center - r, self.center + r)
    }

    /// True if the two spheres overlap (touching does not count).
    pub fn overlaps(&self, other: &Sphere) -> bool {
        let r = self.radius + other.radius;
        self.center.distance_squared(other.center) < r * r
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// An inverted box that any `expand_to` call will snap to.
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::INFINITY),
            max: Vec3::splat(f32::NEG_INFINITY),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn expand_to(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn grow(&self, margin: f32) -> Self {
        Self::new(self.min - Vec3::splat(margin), self.max + Vec3::splat(margin))
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Split into the eight octants, ordered by (x, y, z) bit pattern.
    pub fn octants(&self) -> [Aabb; 8] {
        let half = self.size() * 0.5;
        std::array::from_fn(|i| {
            let offset = Vec3::new(
                (i & 1) as f32 * half.x,
                ((i >> 1) & 1) as f32 * half.y,
                ((i >> 2) & 1) as f32 * half.z,
            );
            let min = self.min + offset;
            Aabb::new(min, min + half)
        })
    }
}

/// A single world triangle with counter-clockwise winding.
///
/// The face normal points out of the front face, which is the side solid
/// volumes get pushed toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit face normal, or zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    /// Signed distance from the triangle's plane to `point`.
    pub fn plane_distance(&self, point: Vec3) -> f32 {
        self.normal().dot(point - self.a)
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(
            self.a.min(self.b).min(self.c),
            self.a.max(self.b).max(self.c),
        )
    }

    /// True if `point`, assumed to lie on the triangle's plane, is inside the
    /// triangle or on its border.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let v0 = self.c - self.a;
        let v1 = self.b - self.a;
        let v2 = point - self.a;

        let dot00 = v0.dot(v0);
        let dot01 = v0.dot(v1);
        let dot02 = v0.dot(v2);
        let dot11 = v1.dot(v1);
        let dot12 = v1.dot(v2);

        let denom = dot00 * dot11 - dot01 * dot01;
        if denom.abs() < f32::EPSILON {
            return false;
        }

        let inv = 1.0 / denom;
        let u = (dot11 * dot02 - dot01 * dot12) * inv;
        let v = (dot00 * dot12 - dot01 * dot02) * inv;
        u >= 0.0 && v >= 0.0 && u + v <= 1.0
    }

    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }
}
