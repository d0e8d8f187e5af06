//! Triangle octree
//!
//! A static spatial partition of world triangles answering capsule and
//! sphere overlap queries. Built once before gameplay starts and only read
//! afterwards.
//!
//! # Query model
//!
//! A query gathers the candidate triangles from every leaf whose box touches
//! the volume's bounds, then walks them in index order: each triangle hit
//! pushes a scratch copy of the volume out along that triangle's contact.
//! The reported contact is the total displacement of the scratch volume
//! (normal = direction, depth = length). A volume that only touches the
//! geometry reports the summed contact normals with depth 0, so a capsule
//! resting exactly on a floor still reads as grounded.

use glam::Vec3;

use super::collision::{Contact, DEPTH_EPSILON, SpatialIndex};
use super::types::{Aabb, Capsule, Sphere, Triangle};

/// Leaves split once they hold more triangles than this.
const TRIANGLES_PER_LEAF: usize = 8;

/// Hard cap on subdivision depth.
const MAX_DEPTH: u32 = 8;

/// Root bounds are grown by this margin so border triangles are not lost to
/// floating-point error.
const BOUNDS_MARGIN: f32 = 0.01;

#[derive(Debug, Clone)]
struct OctreeNode {
    bounds: Aabb,
    /// Triangle indices, only populated on leaves
    triangles: Vec<u32>,
    children: Vec<OctreeNode>,
}

impl OctreeNode {
    fn leaf(bounds: Aabb, triangles: Vec<u32>) -> Self {
        Self {
            bounds,
            triangles,
            children: Vec::new(),
        }
    }

    fn build(bounds: Aabb, triangles: Vec<u32>, all: &[Triangle], depth: u32) -> Self {
        if triangles.len() <= TRIANGLES_PER_LEAF || depth >= MAX_DEPTH {
            return Self::leaf(bounds, triangles);
        }

        let mut children = Vec::with_capacity(8);
        for octant in bounds.octants() {
            let subset: Vec<u32> = triangles
                .iter()
                .copied()
                .filter(|&i| all[i as usize].bounds().intersects(&octant))
                .collect();
            if subset.is_empty() {
                continue;
            }
            // A child that received everything makes no progress; keep it a leaf.
            if subset.len() == triangles.len() {
                children.push(Self::leaf(octant, subset));
            } else {
                children.push(Self::build(octant, subset, all, depth + 1));
            }
        }

        Self {
            bounds,
            triangles: Vec::new(),
            children,
        }
    }

    fn collect(&self, query: &Aabb, out: &mut Vec<u32>) {
        if !self.bounds.intersects(query) {
            return;
        }
        if self.children.is_empty() {
            out.extend_from_slice(&self.triangles);
        } else {
            for child in &self.children {
                child.collect(query, out);
            }
        }
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(OctreeNode::count).sum::<usize>()
    }
}

/// Static triangle octree implementing [`SpatialIndex`].
#[derive(Debug, Clone)]
pub struct Octree {
    triangles: Vec<Triangle>,
    root: Option<OctreeNode>,
}

impl Default for Octree {
    fn default() -> Self {
        Self::empty()
    }
}

impl Octree {
    /// An index with no geometry; every query misses.
    pub fn empty() -> Self {
        Self {
            triangles: Vec::new(),
            root: None,
        }
    }

    /// Build the tree from a triangle soup. Degenerate triangles are dropped.
    pub fn from_triangles(triangles: impl IntoIterator<Item = Triangle>) -> Self {
        let triangles: Vec<Triangle> = triangles
            .into_iter()
            .filter(|t| t.normal() != Vec3::ZERO)
            .collect();
        if triangles.is_empty() {
            return Self::empty();
        }

        let mut bounds = Aabb::empty();
        for t in &triangles {
            bounds.expand_to(t.a);
            bounds.expand_to(t.b);
            bounds.expand_to(t.c);
        }
        let bounds = bounds.grow(BOUNDS_MARGIN);

        let indices = (0..triangles.len() as u32).collect();
        let root = OctreeNode::build(bounds, indices, &triangles, 0);
        log::debug!(
            "Octree built: {} triangles, {} nodes",
            triangles.len(),
            root.count()
        );

        Self {
            triangles,
            root: Some(root),
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// World bounds covered by the tree.
    pub fn bounds(&self) -> Option<Aabb> {
        self.root.as_ref().map(|root| root.bounds)
    }

    fn candidates(&self, query: &Aabb) -> Vec<u32> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect(query, &mut out);
        }
        out.sort_unstable();
        out.dedup();
        out
    }
}

impl SpatialIndex for Octree {
    fn capsule_intersect(&self, capsule: &Capsule) -> Option<Contact> {
        let mut scratch = *capsule;
        let mut normals = Vec3::ZERO;
        let mut hit = false;

        for i in self.candidates(&capsule.bounds()) {
            if let Some(contact) = triangle_capsule_intersect(&scratch, &self.triangles[i as usize]) {
                hit = true;
                normals += contact.normal;
                scratch.translate(contact.normal * contact.depth);
            }
        }

        if !hit {
            return None;
        }
        accumulated_contact(scratch.center() - capsule.center(), normals)
    }

    fn sphere_intersect(&self, sphere: &Sphere) -> Option<Contact> {
        let mut scratch = *sphere;
        let mut normals = Vec3::ZERO;
        let mut hit = false;

        for i in self.candidates(&sphere.bounds()) {
            if let Some(contact) = triangle_sphere_intersect(&scratch, &self.triangles[i as usize]) {
                hit = true;
                normals += contact.normal;
                scratch.center += contact.normal * contact.depth;
            }
        }

        if !hit {
            return None;
        }
        accumulated_contact(scratch.center - sphere.center, normals)
    }
}

fn accumulated_contact(displacement: Vec3, normals: Vec3) -> Option<Contact> {
    let depth = displacement.length();
    if depth > DEPTH_EPSILON {
        return Some(Contact::new(displacement / depth, depth));
    }
    // Touching only: opposing normals cancel out and mean no usable contact.
    let normal = normals.normalize_or_zero();
    (normal != Vec3::ZERO).then(|| Contact::new(normal, 0.0))
}

// =============================================================================
// Per-triangle tests
// =============================================================================

/// Contact of a capsule against one triangle.
pub fn triangle_capsule_intersect(capsule: &Capsule, triangle: &Triangle) -> Option<Contact> {
    let normal = triangle.normal();
    if normal == Vec3::ZERO {
        return None;
    }

    let r = capsule.radius;
    let d1 = triangle.plane_distance(capsule.start) - r;
    let d2 = triangle.plane_distance(capsule.end) - r;

    if (d1 > 0.0 && d2 > 0.0) || (d1 < -r && d2 < -r) {
        return None;
    }

    // Where the segment is closest to crossing the plane.
    let sum = d1.abs() + d2.abs();
    let t = if sum > 0.0 { (d1 / sum).abs() } else { 0.0 };
    let point = capsule.start.lerp(capsule.end, t);
    if triangle.contains_point(point) {
        return Some(Contact::new(normal, d1.min(d2).abs()));
    }

    let r2 = r * r;
    for (edge_start, edge_end) in triangle.edges() {
        let (on_capsule, on_edge) =
            closest_points_between_segments(capsule.start, capsule.end, edge_start, edge_end);
        let dist2 = on_capsule.distance_squared(on_edge);
        if dist2 < r2 {
            let push = (on_capsule - on_edge).normalize_or_zero();
            if push == Vec3::ZERO {
                continue;
            }
            return Some(Contact::new(push, r - dist2.sqrt()));
        }
    }
    None
}

/// Contact of a sphere against one triangle.
pub fn triangle_sphere_intersect(sphere: &Sphere, triangle: &Triangle) -> Option<Contact> {
    let normal = triangle.normal();
    if normal == Vec3::ZERO {
        return None;
    }

    let distance = triangle.plane_distance(sphere.center);
    if distance.abs() > sphere.radius {
        return None;
    }

    let on_plane = sphere.center - normal * distance;
    if triangle.contains_point(on_plane) {
        return Some(Contact::new(normal, (distance - sphere.radius).abs()));
    }

    let r2 = sphere.radius * sphere.radius;
    for (edge_start, edge_end) in triangle.edges() {
        let closest = closest_point_on_segment(sphere.center, edge_start, edge_end);
        let dist2 = closest.distance_squared(sphere.center);
        if dist2 < r2 {
            let push = (sphere.center - closest).normalize_or_zero();
            if push == Vec3::ZERO {
                continue;
            }
            return Some(Contact::new(push, sphere.radius - dist2.sqrt()));
        }
    }
    None
}

/// Closest point to `point` on the segment `a..b`.
pub fn closest_point_on_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return a;
    }
    let t = ((point - a).dot(ab) / len2).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1..q1` and `p2..q2`.
///
/// Returns `(point_on_first, point_on_second)`.
pub fn closest_points_between_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a <= f32::EPSILON && e <= f32::EPSILON {
        return (p1, p2);
    }

    let (s, t) = if a <= f32::EPSILON {
        (0.0, (f / e).clamp(0.0, 1.0))
    } else {
        let c = d1.dot(r);
        if e <= f32::EPSILON {
            ((-c / a).clamp(0.0, 1.0), 0.0)
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s = if denom.abs() > f32::EPSILON {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t = (b * s + f) / e;
            if t < 0.0 {
                ((-c / a).clamp(0.0, 1.0), 0.0)
            } else if t > 1.0 {
                (((b - c) / a).clamp(0.0, 1.0), 1.0)
            } else {
                (s, t)
            }
        }
    };

    (p1 + d1 * s, p2 + d2 * t)
}
