//! World Module
//!
//! Static collision geometry. Levels arrive as triangle lists, are
//! collected into a [`CollisionMesh`] and indexed once with an octree.

pub mod mesh;

pub use mesh::{CollisionMesh, MeshError};
