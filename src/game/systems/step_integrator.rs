//! Fixed sub-step driver.
//!
//! Turns a variable frame delta into a fixed number of equal sub-steps so
//! the damping and gravity integration behaves the same at any frame rate.
//!
//! Per frame:
//! 1. the simulation clock advances by the raw frame delta
//! 2. queued launches are spawned
//! 3. the clamped delta is split into `steps_per_frame` sub-steps, each of
//!    which runs controls, player integration, player collision,
//!    projectiles, out-of-bounds recovery and target hits in that order

use crate::game::config::SimConfig;
use crate::game::state::{SimulationState, StepEvent};
use crate::physics::{ProjectileState, SpatialIndex};
use crate::render::{NullSink, VisualSink};

/// Advances a [`SimulationState`] frame by frame.
#[derive(Debug, Clone)]
pub struct StepIntegrator {
    config: SimConfig,
}

impl StepIntegrator {
    pub fn new(config: SimConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Length of each sub-step for this frame delta.
    pub fn sub_step(&self, frame_delta: f32) -> f32 {
        self.config.sub_step(frame_delta)
    }

    /// Advance one frame without render output.
    pub fn advance<I: SpatialIndex + ?Sized>(
        &self,
        state: &mut SimulationState,
        world: &I,
        frame_delta: f32,
    ) -> Vec<StepEvent> {
        self.advance_with_sink(state, world, frame_delta, &mut NullSink)
    }

    /// Advance one frame, writing render hints after every sub-step.
    pub fn advance_with_sink<I: SpatialIndex + ?Sized>(
        &self,
        state: &mut SimulationState,
        world: &I,
        frame_delta: f32,
        sink: &mut dyn VisualSink,
    ) -> Vec<StepEvent> {
        let mut events = Vec::new();

        let now = state.advance_clock(frame_delta);
        state.projectiles.set_clock(now);

        self.spawn_pending(state, &mut events);

        let dt = self.sub_step(frame_delta);
        for _ in 0..self.config.steps_per_frame {
            self.sub_step_once(state, world, dt, &mut events);

            state.projectiles.write_visuals(sink);
            sink.write_player(state.player.capsule());
        }

        log::trace!(
            "Frame {}: {} sub-steps of {dt:.4}s, {} events",
            state.frame(),
            self.config.steps_per_frame,
            events.len()
        );
        events
    }

    fn spawn_pending(&self, state: &mut SimulationState, events: &mut Vec<StepEvent>) {
        let charge = &self.config.projectiles.charge;
        for request in state.take_pending_launches() {
            let origin = state.player.launch_origin(request.direction);
            let impulse = charge.impulse(request.charge_seconds);
            let slot = state.projectiles.spawn(
                origin,
                request.direction,
                impulse,
                state.player.velocity(),
            );
            events.push(StepEvent::ProjectileLaunched { slot });
        }
    }

    fn sub_step_once<I: SpatialIndex + ?Sized>(
        &self,
        state: &mut SimulationState,
        world: &I,
        dt: f32,
        events: &mut Vec<StepEvent>,
    ) {
        state.player.apply_controls(&state.intent, dt);
        state.player.integrate(dt);
        state.player.handle_collisions(world);

        for update in state.projectiles.step(dt, world, &mut state.player) {
            if update.state == ProjectileState::Expired {
                events.push(StepEvent::ProjectileExpired { slot: update.slot });
            }
        }

        if state.player.teleport_if_out_of_bounds() {
            events.push(StepEvent::PlayerRespawned);
        }

        if state.targets.is_empty() {
            return;
        }
        for (_, projectile) in state.projectiles.active() {
            for hit in state.targets.check_hits(&projectile.collider) {
                events.push(StepEvent::TargetHit {
                    target: hit.target,
                    points: hit.points,
                    position: hit.position,
                });
            }
        }

        if state.targets.is_empty() {
            log::info!("All targets cleared, score {}", state.targets.score());
            events.push(StepEvent::TargetsCleared);
            if state.targets.config().respawn_on_clear {
                state.scatter_targets(world);
            }
        }
    }
}
