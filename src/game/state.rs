//! Simulation State
//!
//! Everything the step integrator mutates, held in one struct and passed
//! in explicitly each frame.

use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use crate::game::config::SimConfig;
use crate::game::systems::{ProjectileSystem, TargetField};
use crate::input::MovementIntent;
use crate::physics::SpatialIndex;
use crate::player::PlayerBody;

/// A throw from the launch trigger: aim direction and how long the button
/// was held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchRequest {
    pub direction: Vec3,
    pub charge_seconds: f32,
}

impl LaunchRequest {
    pub fn new(direction: Vec3, charge_seconds: f32) -> Self {
        Self {
            direction,
            charge_seconds,
        }
    }
}

/// Rejected launch requests.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum LaunchError {
    #[error("launch direction {0} has no usable length")]
    DegenerateDirection(Vec3),
    #[error("launch charge {0} is not a finite number")]
    InvalidCharge(f32),
}

/// Outcome of a frame, reported synchronously by the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepEvent {
    /// A projectile hit a target.
    TargetHit { target: u32, points: u32, position: Vec3 },
    /// The last target of a wave was hit.
    TargetsCleared,
    /// The player fell out of the world and was put back at spawn.
    PlayerRespawned,
    /// A fireball reached the end of its lifetime.
    ProjectileExpired { slot: usize },
    /// A queued launch took a pool slot.
    ProjectileLaunched { slot: usize },
}

/// Mutable simulation state.
pub struct SimulationState {
    pub player: PlayerBody,
    pub projectiles: ProjectileSystem,
    pub targets: TargetField,
    /// Held keys and camera facing, applied every sub-step
    pub intent: MovementIntent,
    clock: f64,
    frame: u64,
    pending_launches: Vec<LaunchRequest>,
    rng: ChaCha8Rng,
}

impl SimulationState {
    /// Player at spawn, empty pool, no targets.
    pub fn new(config: &SimConfig) -> Self {
        Self {
            player: PlayerBody::new(config.player),
            projectiles: ProjectileSystem::new(&config.projectiles),
            targets: TargetField::new(config.targets),
            intent: MovementIntent::new(),
            clock: 0.0,
            frame: 0,
            pending_launches: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// Simulation time in seconds.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Queue a throw for the next frame.
    ///
    /// The direction is normalized here; zero or non-finite directions are
    /// rejected.
    pub fn queue_launch(&mut self, request: LaunchRequest) -> Result<(), LaunchError> {
        let direction = request
            .direction
            .try_normalize()
            .ok_or(LaunchError::DegenerateDirection(request.direction))?;
        if !request.charge_seconds.is_finite() {
            return Err(LaunchError::InvalidCharge(request.charge_seconds));
        }

        self.pending_launches.push(LaunchRequest {
            direction,
            charge_seconds: request.charge_seconds,
        });
        Ok(())
    }

    pub fn pending_launches(&self) -> &[LaunchRequest] {
        &self.pending_launches
    }

    /// Start a new wave of targets.
    pub fn scatter_targets<I: SpatialIndex + ?Sized>(&mut self, world: &I) -> usize {
        let count = self.targets.config().count;
        self.targets.scatter(count, &mut self.rng, world)
    }

    pub(crate) fn advance_clock(&mut self, frame_delta: f32) -> f64 {
        if frame_delta.is_finite() && frame_delta > 0.0 {
            self.clock += f64::from(frame_delta);
        }
        self.frame += 1;
        self.clock
    }

    pub(crate) fn take_pending_launches(&mut self) -> Vec<LaunchRequest> {
        std::mem::take(&mut self.pending_launches)
    }
}
