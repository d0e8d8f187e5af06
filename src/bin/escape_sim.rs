//! Escape Arena - headless simulation
//!
//! Runs a scripted session against a walled arena without a window:
//! walks, jumps and throws at the nearest target, then prints the score.
//!
//! Usage: `escape_sim [config.json]` (set `RUST_LOG=debug` for more output)

use std::process::ExitCode;

use escape_arena_engine::game::{SimConfig, SimulationState, StepEvent, StepIntegrator};
use escape_arena_engine::game::LaunchRequest;
use escape_arena_engine::render::InstanceBuffer;
use escape_arena_engine::world::CollisionMesh;
use glam::Vec3;

const FRAME_DELTA: f32 = 1.0 / 60.0;
const SESSION_FRAMES: u32 = 60 * 20;
const THROW_EVERY_FRAMES: u32 = 30;
const ARENA_HALF_EXTENT: f32 = 12.0;
const WALL_HEIGHT: f32 = 4.0;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {path}");
                config
            }
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => SimConfig::default(),
    };

    println!("===========================================");
    println!("   Escape Arena - Headless Session");
    println!("===========================================");

    let mut mesh = CollisionMesh::new();
    mesh.add_arena(ARENA_HALF_EXTENT, WALL_HEIGHT);
    // A couple of crates to bounce off.
    mesh.add_box(Vec3::new(3.0, 0.0, -4.0), Vec3::new(4.0, 1.0, -3.0));
    mesh.add_box(Vec3::new(-5.0, 0.0, 2.0), Vec3::new(-4.0, 2.0, 3.0));
    let world = mesh.build_octree();
    log::info!("Arena built: {} triangles", world.triangle_count());

    let integrator = StepIntegrator::new(config.clone());
    let mut state = SimulationState::new(&config);
    let mut sink = InstanceBuffer::with_capacity(config.projectiles.pool_size);
    let placed = state.scatter_targets(&world);
    log::info!("Placed {placed} targets");

    let mut throws = 0u32;
    let mut hits = 0u32;
    let mut respawns = 0u32;
    let mut waves = 0u32;

    for frame in 0..SESSION_FRAMES {
        script_frame(&mut state, frame);

        if frame % THROW_EVERY_FRAMES == 0 {
            if let Some(request) = aim_at_nearest_target(&state) {
                match state.queue_launch(request) {
                    Ok(()) => throws += 1,
                    Err(e) => log::warn!("Launch rejected: {e}"),
                }
            }
        }

        for event in integrator.advance_with_sink(&mut state, &world, FRAME_DELTA, &mut sink) {
            match event {
                StepEvent::TargetHit { .. } => hits += 1,
                StepEvent::TargetsCleared => waves += 1,
                StepEvent::PlayerRespawned => respawns += 1,
                StepEvent::ProjectileExpired { .. } | StepEvent::ProjectileLaunched { .. } => {}
            }
        }
    }

    println!();
    println!("Simulated {:.1}s in {} frames", state.clock(), state.frame());
    println!("Throws: {throws}, hits: {hits}, waves cleared: {waves}, respawns: {respawns}");
    println!("Projectiles in flight: {}", sink.visible_count());
    println!("Final score: {}", state.targets.score());

    ExitCode::SUCCESS
}

/// Walk a slow square, jumping now and then.
fn script_frame(state: &mut SimulationState, frame: u32) {
    let intent = &mut state.intent;
    intent.release_all();

    let leg = (frame / 120) % 4;
    intent.facing = match leg {
        0 => Vec3::NEG_Z,
        1 => Vec3::X,
        2 => Vec3::Z,
        _ => Vec3::NEG_X,
    };
    intent.forward = frame % 120 < 60;
    intent.jump = frame % 200 == 100;
}

/// Aim from the launch point straight at the closest target.
fn aim_at_nearest_target(state: &SimulationState) -> Option<LaunchRequest> {
    let eye = state.player.capsule().end;
    let target = state
        .targets
        .targets()
        .iter()
        .min_by(|a, b| eye.distance_squared(a.position).total_cmp(&eye.distance_squared(b.position)))?;

    // Lead upward a little to counter the drop.
    let to_target = target.position - eye;
    let direction = to_target + Vec3::Y * to_target.length() * 0.15;
    Some(LaunchRequest::new(direction, 0.4))
}
