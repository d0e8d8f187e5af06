//! Integrator Tests - Frame Clamping, Sub-steps and Full Sessions
//!
//! Drives `StepIntegrator::advance` over a walled arena the way a host
//! render loop would.

use escape_arena_engine::game::{
    LaunchError, LaunchRequest, SimConfig, SimulationState, StepEvent, StepIntegrator,
};
use escape_arena_engine::input::KeyCode;
use escape_arena_engine::physics::Octree;
use escape_arena_engine::render::InstanceBuffer;
use escape_arena_engine::world::CollisionMesh;
use glam::Vec3;

fn arena() -> Octree {
    let mut mesh = CollisionMesh::new();
    mesh.add_arena(10.0, 4.0);
    mesh.build_octree()
}

fn setup(config: &SimConfig) -> (StepIntegrator, SimulationState) {
    (StepIntegrator::new(config.clone()), SimulationState::new(config))
}

// ============================================================================
// Frame delta handling
// ============================================================================

#[test]
fn test_advance_ten_seconds_equals_max_frame() {
    let config = SimConfig::default();
    let world = arena();
    let (integrator, mut a) = setup(&config);
    let (_, mut b) = setup(&config);

    for state in [&mut a, &mut b] {
        state.intent.handle_key(KeyCode::W, true);
        state.queue_launch(LaunchRequest::new(Vec3::new(1.0, 0.5, -1.0), 0.5)).unwrap();
    }

    integrator.advance(&mut a, &world, 10.0);
    integrator.advance(&mut b, &world, 0.05);

    assert_eq!(a.player.capsule(), b.player.capsule());
    assert_eq!(a.player.velocity(), b.player.velocity());
    let pa = a.projectiles.slot(0).unwrap();
    let pb = b.projectiles.slot(0).unwrap();
    assert_eq!(pa.position(), pb.position());
    assert_eq!(pa.velocity, pb.velocity);
}

#[test]
fn test_one_vs_five_sub_steps_agree_for_small_frames() {
    let world = arena();
    let run = |steps_per_frame: u32| {
        let config = SimConfig {
            steps_per_frame,
            ..SimConfig::default()
        };
        let (integrator, mut state) = setup(&config);
        state.queue_launch(LaunchRequest::new(Vec3::new(0.0, 1.0, -1.0), 0.0)).unwrap();
        for _ in 0..30 {
            integrator.advance(&mut state, &world, 1.0 / 240.0);
        }
        state.projectiles.slot(0).unwrap().position()
    };

    let coarse = run(1);
    let fine = run(5);
    assert!((coarse - fine).length() < 0.05, "{coarse} vs {fine}");
}

#[test]
fn test_zero_delta_frame_moves_nothing() {
    let config = SimConfig::default();
    let world = arena();
    let (integrator, mut state) = setup(&config);
    integrator.advance(&mut state, &world, 1.0 / 60.0);
    let before = *state.player.capsule();

    integrator.advance(&mut state, &world, 0.0);
    assert!((state.player.capsule().start - before.start).length() < 1e-5);
    assert!((state.player.capsule().end - before.end).length() < 1e-5);
}

// ============================================================================
// Controls
// ============================================================================

#[test]
fn test_walking_and_jumping() {
    let config = SimConfig::default();
    let world = arena();
    let (integrator, mut state) = setup(&config);

    // Settle onto the floor.
    for _ in 0..10 {
        integrator.advance(&mut state, &world, 1.0 / 60.0);
    }
    assert!(state.player.is_on_floor());

    state.intent.handle_key(KeyCode::W, true);
    for _ in 0..60 {
        integrator.advance(&mut state, &world, 1.0 / 60.0);
    }
    state.intent.handle_key(KeyCode::W, false);
    for _ in 0..60 {
        integrator.advance(&mut state, &world, 1.0 / 60.0);
    }
    assert!(state.player.capsule().start.z < -1.0);
    assert!(state.player.velocity().length() < 0.5);

    state.intent.handle_key(KeyCode::Space, true);
    integrator.advance(&mut state, &world, 1.0 / 60.0);
    state.intent.handle_key(KeyCode::Space, false);
    assert!(state.player.velocity().y > 10.0);

    let mut peak = 0.0f32;
    for _ in 0..120 {
        integrator.advance(&mut state, &world, 1.0 / 60.0);
        peak = peak.max(state.player.capsule().start.y);
    }
    assert!(peak > 2.0);
    assert!(state.player.is_on_floor());
}

#[test]
fn test_walls_stop_the_player() {
    let config = SimConfig::default();
    let world = arena();
    let (integrator, mut state) = setup(&config);

    state.intent.facing = Vec3::X;
    state.intent.handle_key(KeyCode::W, true);
    for _ in 0..600 {
        integrator.advance(&mut state, &world, 1.0 / 60.0);
    }
    let x = state.player.capsule().start.x;
    assert!(x < 10.0 - 0.34 && x > 8.0, "x = {x}");
}

// ============================================================================
// Launches and sessions
// ============================================================================

#[test]
fn test_zero_direction_launch_is_rejected() {
    let config = SimConfig::default();
    let (_, mut state) = setup(&config);
    assert_eq!(
        state.queue_launch(LaunchRequest::new(Vec3::ZERO, 1.0)),
        Err(LaunchError::DegenerateDirection(Vec3::ZERO))
    );
}

#[test]
fn test_longer_charge_throws_further() {
    let config = SimConfig::default();
    let world = Octree::empty();
    let distance = |charge: f32| {
        let (integrator, mut state) = setup(&config);
        state.queue_launch(LaunchRequest::new(Vec3::new(0.0, 0.3, -1.0), charge)).unwrap();
        integrator.advance(&mut state, &world, 1.0 / 60.0);
        for _ in 0..20 {
            integrator.advance(&mut state, &world, 1.0 / 60.0);
        }
        -state.projectiles.slot(0).unwrap().position().z
    };
    assert!(distance(2.0) > distance(0.0) * 1.5);
}

#[test]
fn test_scripted_session_scores() {
    let mut config = SimConfig::default();
    config.targets.count = 3;
    let world = arena();
    let (integrator, mut state) = setup(&config);
    assert_eq!(state.scatter_targets(&world), 3);

    let mut sink = InstanceBuffer::with_capacity(config.projectiles.pool_size);
    let mut hits = 0;
    for frame in 0..1200 {
        if frame % 20 == 0 {
            let eye = state.player.capsule().end;
            if let Some(target) = state.targets.targets().first() {
                // Fast throw, aimed above the target by the expected drop.
                let to_target = target.position - eye;
                let flight = to_target.length() / 40.0;
                let lift = 0.5 * config.projectiles.ballistics.gravity * flight * flight;
                let request = LaunchRequest::new(to_target + Vec3::Y * lift, 3.0);
                state.queue_launch(request).unwrap();
            }
        }
        for event in integrator.advance_with_sink(&mut state, &world, 1.0 / 60.0, &mut sink) {
            if let StepEvent::TargetHit { points, .. } = event {
                assert!(points >= 1);
                hits += 1;
            }
        }
    }

    assert!(hits > 0);
    assert!(state.targets.score() >= hits);
    assert!(sink.player().is_some());
    assert!(sink.visible_count() > 0);
}

#[test]
fn test_config_file_drives_session() {
    let dir = std::env::temp_dir().join(format!("escape_arena_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sim.json");
    std::fs::write(
        &path,
        r#"{ "steps_per_frame": 2, "projectiles": { "pool_size": 2, "lifetime": null } }"#,
    )
    .unwrap();

    let config = SimConfig::load(&path).unwrap();
    std::fs::remove_dir_all(&dir).unwrap();
    assert_eq!(config.steps_per_frame, 2);
    assert_eq!(config.projectiles.lifetime, None);

    let world = arena();
    let (integrator, mut state) = setup(&config);
    let mut slots = Vec::new();
    for _ in 0..3 {
        state.queue_launch(LaunchRequest::new(Vec3::NEG_Z, 0.0)).unwrap();
        for event in integrator.advance(&mut state, &world, 1.0 / 60.0) {
            if let StepEvent::ProjectileLaunched { slot } = event {
                slots.push(slot);
            }
        }
    }
    assert_eq!(slots, vec![0, 1, 0]);
}
