//! Visual sink and GPU instance data
//!
//! The simulation pushes render hints out through [`VisualSink`] and never
//! reads them back. [`InstanceBuffer`] keeps a per-slot array of
//! [`ProjectileInstance`] ready for `queue.write_buffer`.

use crate::physics::Capsule;
use glam::Vec3;

/// GPU instance data for one projectile slot.
///
/// Layout (32 bytes total, 16-byte aligned for GPU compatibility):
/// - position: vec3<f32> (12 bytes) - World position
/// - radius:   f32 (4 bytes) - Sphere radius
/// - opacity:  f32 (4 bytes) - 1 = opaque, 0 = faded out
/// - visible:  u32 (4 bytes) - 0 or 1
/// - _pad:     2 x u32 (8 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectileInstance {
    pub position: [f32; 3],
    pub radius: f32,
    pub opacity: f32,
    pub visible: u32,
    pub _pad: [u32; 2],
}

static_assertions::assert_eq_size!(ProjectileInstance, [u8; 32]);

impl ProjectileInstance {
    pub fn new(position: Vec3, radius: f32, opacity: f32, visible: bool) -> Self {
        Self {
            position: position.to_array(),
            radius,
            opacity,
            visible: u32::from(visible),
            _pad: [0; 2],
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible != 0
    }
}

/// Receiver for per-step render hints.
pub trait VisualSink {
    /// Called for every pool slot, active or not.
    fn write_projectile(&mut self, slot: usize, position: Vec3, radius: f32, opacity: f32, visible: bool);

    /// Called with the player's capsule after collision handling.
    fn write_player(&mut self, capsule: &Capsule);
}

/// Sink that drops everything. Used by headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl VisualSink for NullSink {
    fn write_projectile(&mut self, _slot: usize, _position: Vec3, _radius: f32, _opacity: f32, _visible: bool) {}

    fn write_player(&mut self, _capsule: &Capsule) {}
}

/// CPU-side mirror of the projectile instance buffer plus the last
/// player pose.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    projectiles: Vec<ProjectileInstance>,
    player: Option<Capsule>,
    dirty: bool,
}

impl InstanceBuffer {
    pub fn with_capacity(slots: usize) -> Self {
        Self {
            projectiles: vec![ProjectileInstance::default(); slots],
            player: None,
            dirty: false,
        }
    }

    pub fn projectiles(&self) -> &[ProjectileInstance] {
        &self.projectiles
    }

    pub fn player(&self) -> Option<&Capsule> {
        self.player.as_ref()
    }

    /// Raw bytes for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.projectiles)
    }

    /// Number of slots currently drawn.
    pub fn visible_count(&self) -> usize {
        self.projectiles.iter().filter(|p| p.is_visible()).count()
    }

    /// Whether anything changed since the last call. Clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl VisualSink for InstanceBuffer {
    fn write_projectile(&mut self, slot: usize, position: Vec3, radius: f32, opacity: f32, visible: bool) {
        if slot >= self.projectiles.len() {
            self.projectiles.resize(slot + 1, ProjectileInstance::default());
        }
        let instance = ProjectileInstance::new(position, radius, opacity, visible);
        if self.projectiles[slot] != instance {
            self.projectiles[slot] = instance;
            self.dirty = true;
        }
    }

    fn write_player(&mut self, capsule: &Capsule) {
        if self.player.as_ref() != Some(capsule) {
            self.player = Some(*capsule);
            self.dirty = true;
        }
    }
}
