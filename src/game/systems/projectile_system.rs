//! Projectile pool management system.
//!
//! Owns a fixed array of projectile slots and their physics config,
//! providing spawn / step / clear / iterate operations with zero GPU coupling.
//! Render hints go out through a [`VisualSink`].

use glam::Vec3;

use crate::game::config::ProjectileConfig;
use crate::physics::{BallisticsConfig, Lifetime, Projectile, ProjectileState, SpatialIndex, elastic_exchange};
use crate::player::PlayerBody;
use crate::render::VisualSink;

/// Per-slot data returned by [`ProjectileSystem::step`] so the caller can
/// run gameplay checks without reaching into the pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileUpdate {
    /// Pool slot index.
    pub slot: usize,
    /// Position before this step's integration.
    pub prev_pos: Vec3,
    /// Position after world, player and pairwise responses.
    pub new_pos: Vec3,
    /// World physics state for this step.
    pub state: ProjectileState,
    /// Whether the projectile touched the player this step.
    pub hit_player: bool,
}

/// Fixed-size round-robin pool of thrown projectiles.
///
/// Spawning always takes the slot under the cursor, recycling it even if
/// its previous projectile is still flying.
pub struct ProjectileSystem {
    slots: Vec<Projectile>,
    cursor: usize,
    config: BallisticsConfig,
    lifetime: Option<Lifetime>,
    carry_scale: f32,
    /// Simulation time used for fireball timestamps.
    clock: f64,
}

impl ProjectileSystem {
    /// Create a pool of `config.pool_size` parked slots.
    pub fn new(config: &ProjectileConfig) -> Self {
        let pool_size = config.pool_size.max(1);
        Self {
            slots: vec![Projectile::parked(config.ballistics.radius); pool_size],
            cursor: 0,
            config: config.ballistics,
            lifetime: config.lifetime,
            carry_scale: config.carry_scale,
            clock: 0.0,
        }
    }

    /// Set the simulation time seen by spawns and lifetime updates.
    pub fn set_clock(&mut self, now: f64) {
        self.clock = now;
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Launch a projectile from the slot under the cursor.
    ///
    /// `direction` must be unit length and `impulse` non-negative; the
    /// launcher is responsible for both. Returns the slot used.
    pub fn spawn(&mut self, origin: Vec3, direction: Vec3, impulse: f32, carry_velocity: Vec3) -> usize {
        debug_assert!(
            direction.is_normalized(),
            "projectile direction must be unit length, got {direction}"
        );
        debug_assert!(impulse >= 0.0, "projectile impulse must be >= 0, got {impulse}");

        let slot = self.cursor;
        let projectile = &mut self.slots[slot];
        if projectile.active {
            log::debug!("Projectile pool exhausted, recycling slot {slot}");
        }

        let velocity = direction * impulse + carry_velocity * self.carry_scale;
        let timing = self.lifetime.as_ref().map(|lifetime| (self.clock, lifetime));
        projectile.launch(origin, velocity, timing);

        self.cursor = (self.cursor + 1) % self.slots.len();
        slot
    }

    /// Advance every active projectile by `dt`.
    ///
    /// Per slot: lifetime, world integration, then the player check. The
    /// pairwise projectile pass runs last, over all slots still active.
    pub fn step<I: SpatialIndex + ?Sized>(
        &mut self,
        dt: f32,
        world: &I,
        player: &mut PlayerBody,
    ) -> Vec<ProjectileUpdate> {
        let mut updates = Vec::new();
        let fade_duration = self.lifetime.map(|l| l.fade_duration);

        for (slot, projectile) in self.slots.iter_mut().enumerate() {
            if !projectile.active {
                continue;
            }
            let prev_pos = projectile.position();

            if let Some(fade_duration) = fade_duration {
                if projectile.update_lifetime(self.clock, fade_duration) == ProjectileState::Expired {
                    updates.push(ProjectileUpdate {
                        slot,
                        prev_pos,
                        new_pos: prev_pos,
                        state: ProjectileState::Expired,
                        hit_player: false,
                    });
                    continue;
                }
            }

            let state = projectile.integrate(&self.config, dt, world);
            let hit_player = collide_with_player(projectile, player);

            updates.push(ProjectileUpdate {
                slot,
                prev_pos,
                new_pos: projectile.position(),
                state,
                hit_player,
            });
        }

        self.collide_pairs();

        // Pairwise separation moves centers after the per-slot pass.
        for update in &mut updates {
            update.new_pos = self.slots[update.slot].position();
        }

        log::trace!("Stepped {} projectiles", updates.len());
        updates
    }

    /// Equal-mass elastic exchange for every overlapping pair of active
    /// projectiles; each center moves half the overlap apart.
    fn collide_pairs(&mut self) {
        for i in 0..self.slots.len() {
            if !self.slots[i].active {
                continue;
            }
            let (head, tail) = self.slots.split_at_mut(i + 1);
            let s1 = &mut head[i];

            for s2 in tail.iter_mut().filter(|p| p.active) {
                let offset = s1.collider.center - s2.collider.center;
                let r = s1.collider.radius + s2.collider.radius;
                let d2 = offset.length_squared();
                if d2 >= r * r {
                    continue;
                }
                let Some(normal) = offset.try_normalize() else {
                    continue;
                };

                let (v1, v2) = elastic_exchange(s1.velocity, s2.velocity, normal);
                s1.velocity = v1;
                s2.velocity = v2;

                let d = (r - d2.sqrt()) / 2.0;
                s1.collider.center += normal * d;
                s2.collider.center -= normal * d;
            }
        }
    }

    /// Write every slot's render hints.
    pub fn write_visuals(&self, sink: &mut dyn VisualSink) {
        for (slot, p) in self.slots.iter().enumerate() {
            sink.write_projectile(slot, p.position(), p.collider.radius, p.opacity, p.visible);
        }
    }

    /// Deactivate one slot (e.g. after a target hit consumed it).
    pub fn deactivate(&mut self, slot: usize) {
        if let Some(projectile) = self.slots.get_mut(slot) {
            projectile.deactivate();
        }
    }

    /// Deactivate every slot and rewind the cursor.
    pub fn clear(&mut self) {
        for projectile in &mut self.slots {
            *projectile = Projectile::parked(self.config.radius);
        }
        self.cursor = 0;
    }

    pub fn pool_size(&self) -> usize {
        self.slots.len()
    }

    /// Slot the next spawn will use.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn slot(&self, slot: usize) -> Option<&Projectile> {
        self.slots.get(slot)
    }

    /// Iterate over active projectiles with their slot index.
    pub fn active(&self) -> impl Iterator<Item = (usize, &Projectile)> {
        self.slots.iter().enumerate().filter(|(_, p)| p.active)
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|p| p.active).count()
    }

    /// Access the ballistics configuration.
    pub fn config(&self) -> &BallisticsConfig {
        &self.config
    }
}

/// Test the projectile against the capsule's start, end and midpoint.
///
/// On overlap the velocities swap their normal components and the
/// projectile is pushed back by the full overlap. The player is not moved.
fn collide_with_player(projectile: &mut Projectile, player: &mut PlayerBody) -> bool {
    let capsule = *player.capsule();
    let r = capsule.radius + projectile.collider.radius;
    let mut hit = false;

    for point in [capsule.start, capsule.end, capsule.center()] {
        let offset = point - projectile.collider.center;
        let d2 = offset.length_squared();
        if d2 >= r * r {
            continue;
        }
        let Some(normal) = offset.try_normalize() else {
            continue;
        };

        let (player_velocity, projectile_velocity) =
            elastic_exchange(player.velocity(), projectile.velocity, normal);
        player.set_velocity(player_velocity);
        projectile.velocity = projectile_velocity;

        projectile.collider.center -= normal * (r - d2.sqrt());
        hit = true;
    }

    hit
}
