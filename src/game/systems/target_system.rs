//! Shooting targets.
//!
//! Targets are static spheres scattered through the arena. A projectile
//! that passes close enough scores points by how near the center it was
//! and removes the target.

use glam::Vec3;
use rand::Rng;

use crate::game::config::TargetConfig;
use crate::physics::{SpatialIndex, Sphere};

/// A single target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Stable identifier, unique for the lifetime of the field
    pub id: u32,
    pub position: Vec3,
    pub radius: f32,
}

/// A scored hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetHit {
    pub target: u32,
    pub points: u32,
    /// Where the target stood
    pub position: Vec3,
}

/// The set of live targets and the running score.
#[derive(Debug, Clone)]
pub struct TargetField {
    targets: Vec<Target>,
    score: u32,
    next_id: u32,
    config: TargetConfig,
}

impl TargetField {
    pub fn new(config: TargetConfig) -> Self {
        Self {
            targets: Vec::new(),
            score: 0,
            next_id: 0,
            config,
        }
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn config(&self) -> &TargetConfig {
        &self.config
    }

    /// Place a target at an explicit position. Returns its id.
    pub fn add(&mut self, position: Vec3) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.targets.push(Target {
            id,
            position,
            radius: self.config.radius,
        });
        id
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    /// Points for a hit at `distance` from the center of a target of
    /// `radius`. Never less than 1.
    pub fn points_for(&self, distance: f32, radius: f32) -> u32 {
        let points = (self.config.base_points * (1.0 - distance / radius)).floor();
        points.max(1.0) as u32
    }

    /// Test one projectile against every target, scoring and removing the
    /// ones it hits.
    pub fn check_hits(&mut self, sphere: &Sphere) -> Vec<TargetHit> {
        let mut hits = Vec::new();

        for i in (0..self.targets.len()).rev() {
            let target = self.targets[i];
            let distance = sphere.center.distance(target.position);
            if distance >= sphere.radius + target.radius + self.config.collision_offset {
                continue;
            }

            let points = self.points_for(distance, target.radius);
            self.score += points;
            self.targets.remove(i);
            log::info!("Target {} hit: +{points} (total {})", target.id, self.score);

            hits.push(TargetHit {
                target: target.id,
                points,
                position: target.position,
            });
        }

        hits
    }

    /// Replace the current targets with `count` new ones at random
    /// positions clear of world geometry.
    ///
    /// Each target gets a bounded number of attempts; returns how many were
    /// placed.
    pub fn scatter<R: Rng + ?Sized, I: SpatialIndex + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
        world: &I,
    ) -> usize {
        self.clear();
        let half = self.config.area_size * 0.5;

        for _ in 0..count {
            let placed = (0..self.config.max_spawn_attempts).find_map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-half..=half),
                    rng.gen_range(self.config.min_height..=self.config.max_height),
                    rng.gen_range(-half..=half),
                );
                let probe = Sphere::new(position, self.config.spawn_probe_radius);
                world.sphere_intersect(&probe).is_none().then_some(position)
            });

            match placed {
                Some(position) => {
                    self.add(position);
                }
                None => log::warn!(
                    "Gave up placing a target after {} attempts",
                    self.config.max_spawn_attempts
                ),
            }
        }

        log::debug!("Scattered {} of {count} targets", self.targets.len());
        self.targets.len()
    }
}
