//! Collision mesh builder
//!
//! Collects static world triangles before the octree is built. The asset
//! loader hands over indexed geometry through [`CollisionMesh::from_indexed`];
//! tests and the headless runner block out levels with boxes and floors.
//!
//! Winding rule: for a triangle `(a, b, c)` the solid side is behind
//! `(b - a) × (c - a)`. Volumes get pushed toward the front.

use glam::Vec3;
use thiserror::Error;

use crate::physics::{Octree, Triangle};

/// Errors that can occur while importing indexed geometry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    /// Index buffer length is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IndicesNotTriangles(usize),
    /// An index points past the vertex buffer.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// Static triangle soup for the world.
#[derive(Debug, Clone, Default)]
pub struct CollisionMesh {
    triangles: Vec<Triangle>,
}

impl CollisionMesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import an indexed triangle list (three indices per triangle).
    pub fn from_indexed(positions: &[[f32; 3]], indices: &[u32]) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndicesNotTriangles(indices.len()));
        }

        let vertex = |index: u32| -> Result<Vec3, MeshError> {
            positions
                .get(index as usize)
                .map(|p| Vec3::from_array(*p))
                .ok_or(MeshError::IndexOutOfRange {
                    index,
                    vertex_count: positions.len(),
                })
        };

        let mut mesh = Self::new();
        for tri in indices.chunks_exact(3) {
            mesh.add_triangle(vertex(tri[0])?, vertex(tri[1])?, vertex(tri[2])?);
        }
        Ok(mesh)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn add_triangle(&mut self, a: Vec3, b: Vec3, c: Vec3) -> &mut Self {
        self.triangles.push(Triangle::new(a, b, c));
        self
    }

    /// Two triangles `(a, b, c)` and `(a, c, d)`.
    pub fn add_quad(&mut self, a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> &mut Self {
        self.add_triangle(a, b, c).add_triangle(a, c, d)
    }

    /// Square floor at `center.y`, facing up.
    pub fn add_floor(&mut self, center: Vec3, half_extent: f32) -> &mut Self {
        let h = half_extent;
        self.add_quad(
            center + Vec3::new(-h, 0.0, -h),
            center + Vec3::new(-h, 0.0, h),
            center + Vec3::new(h, 0.0, h),
            center + Vec3::new(h, 0.0, -h),
        )
    }

    /// Solid axis-aligned box with outward-facing sides.
    pub fn add_box(&mut self, min: Vec3, max: Vec3) -> &mut Self {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let v = Vec3::new;

        // +Y
        self.add_quad(v(x0, y1, z0), v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0));
        // -Y
        self.add_quad(v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1));
        // +X
        self.add_quad(v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1), v(x1, y0, z1));
        // -X
        self.add_quad(v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0));
        // +Z
        self.add_quad(v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1));
        // -Z
        self.add_quad(v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0), v(x1, y0, z0))
    }

    /// A walled square arena: a slab floor with its top at `y = 0` and four
    /// walls of the given height around it.
    pub fn add_arena(&mut self, half_extent: f32, wall_height: f32) -> &mut Self {
        let h = half_extent;
        let t = 1.0;
        self.add_box(Vec3::new(-h, -t, -h), Vec3::new(h, 0.0, h))
            .add_box(Vec3::new(-h - t, -t, -h), Vec3::new(-h, wall_height, h))
            .add_box(Vec3::new(h, -t, -h), Vec3::new(h + t, wall_height, h))
            .add_box(Vec3::new(-h - t, -t, -h - t), Vec3::new(h + t, wall_height, -h))
            .add_box(Vec3::new(-h - t, -t, h), Vec3::new(h + t, wall_height, h + t))
    }

    /// Build the spatial index for this geometry.
    pub fn build_octree(&self) -> Octree {
        Octree::from_triangles(self.triangles.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{SpatialIndex, Sphere};

    #[test]
    fn test_box_faces_point_outward() {
        let mut mesh = CollisionMesh::new();
        mesh.add_box(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(mesh.len(), 12);
        for tri in mesh.triangles() {
            let centroid = (tri.a + tri.b + tri.c) / 3.0;
            assert!(tri.normal().dot(centroid) > 0.0, "inward face {tri:?}");
        }
    }

    #[test]
    fn test_floor_faces_up() {
        let mut mesh = CollisionMesh::new();
        mesh.add_floor(Vec3::ZERO, 5.0);
        assert_eq!(mesh.len(), 2);
        for tri in mesh.triangles() {
            assert!((tri.normal() - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_from_indexed() {
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        let mesh = CollisionMesh::from_indexed(&positions, &[0, 1, 2]).unwrap();
        assert_eq!(mesh.len(), 1);
        assert_eq!(mesh.triangles()[0].c, Vec3::X);
    }

    #[test]
    fn test_from_indexed_rejects_bad_input() {
        let positions = [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]];
        assert_eq!(
            CollisionMesh::from_indexed(&positions, &[0, 1]).unwrap_err(),
            MeshError::IndicesNotTriangles(2)
        );
        assert_eq!(
            CollisionMesh::from_indexed(&positions, &[0, 1, 7]).unwrap_err(),
            MeshError::IndexOutOfRange {
                index: 7,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_arena_walls_push_inward() {
        let mut mesh = CollisionMesh::new();
        mesh.add_arena(10.0, 3.0);
        let tree = mesh.build_octree();

        let near_east_wall = Sphere::new(Vec3::new(9.9, 1.0, 0.0), 0.2);
        let contact = tree.sphere_intersect(&near_east_wall).unwrap();
        assert!(contact.normal.x < -0.99);

        let middle = Sphere::new(Vec3::new(0.0, 1.0, 0.0), 0.2);
        assert!(tree.sphere_intersect(&middle).is_none());
    }
}
