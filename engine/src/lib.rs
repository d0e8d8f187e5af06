//! Escape Arena Engine Library
//!
//! Physics and projectile core for small 3D arcade games: capsule and
//! sphere collision against a triangle octree, a round-robin projectile
//! pool with elastic exchanges, the player body and a fixed sub-step
//! integrator. Rendering, audio and asset loading stay with the host.
//!
//! # Modules
//!
//! - [`physics`] - Collision volumes, the `SpatialIndex` contract, the octree and ballistics
//! - [`player`] - The player's capsule body
//! - [`input`] - Platform-agnostic movement intent
//! - [`world`] - Collision mesh building
//! - [`render`] - Visual sink and GPU instance data
//! - [`game`] - Projectile pool, targets, simulation state and step integrator
//!
//! # Example
//!
//! ```ignore
//! use escape_arena_engine::game::{SimConfig, SimulationState, StepIntegrator};
//! use escape_arena_engine::world::CollisionMesh;
//!
//! let config = SimConfig::default();
//! let mut mesh = CollisionMesh::new();
//! mesh.add_arena(10.0, 3.0);
//! let world = mesh.build_octree();
//!
//! let integrator = StepIntegrator::new(config.clone());
//! let mut state = SimulationState::new(&config);
//! state.scatter_targets(&world);
//!
//! // Once per rendered frame:
//! let events = integrator.advance(&mut state, &world, frame_delta);
//! ```

pub mod input;
pub mod physics;
pub mod player;
pub mod render;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export commonly used types
pub use input::{KeyCode, MovementIntent};
pub use physics::{Capsule, Contact, Octree, SpatialIndex, Sphere};
pub use player::PlayerBody;
pub use world::CollisionMesh;
