//! Projectile Tests - Pool, Ballistics and Exchanges
//!
//! Runs the projectile pool against real octree geometry and checks the
//! GPU instance layout it writes into.

use escape_arena_engine::game::config::ProjectileConfig;
use escape_arena_engine::game::systems::ProjectileSystem;
use escape_arena_engine::physics::{BallisticsConfig, Capsule, Octree, ProjectileState};
use escape_arena_engine::player::PlayerBody;
use escape_arena_engine::render::{InstanceBuffer, ProjectileInstance};
use escape_arena_engine::world::CollisionMesh;
use glam::Vec3;

fn player_far_away() -> PlayerBody {
    let mut player = PlayerBody::default();
    player.set_capsule(Capsule::new(
        Vec3::new(0.0, 0.35, 400.0),
        Vec3::new(0.0, 1.0, 400.0),
        0.35,
    ));
    player
}

fn no_lifetime(pool_size: usize) -> ProjectileConfig {
    ProjectileConfig {
        pool_size,
        lifetime: None,
        ..ProjectileConfig::default()
    }
}

// ============================================================================
// Pool
// ============================================================================

#[test]
fn test_pool_of_n_reuses_slot_zero_on_spawn_n_plus_one() {
    let n = 100;
    let mut system = ProjectileSystem::new(&no_lifetime(n));
    for i in 0..n {
        assert_eq!(system.spawn(Vec3::ZERO, Vec3::Z, 1.0, Vec3::ZERO), i);
    }
    assert_eq!(system.active_count(), n);

    let reused = system.spawn(Vec3::new(5.0, 5.0, 5.0), Vec3::X, 3.0, Vec3::ZERO);
    assert_eq!(reused, 0);
    assert_eq!(system.active_count(), n);
    let slot = system.slot(0).unwrap();
    assert_eq!(slot.position(), Vec3::new(5.0, 5.0, 5.0));
    assert_eq!(slot.velocity, Vec3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_inactive_slots_are_not_simulated() {
    let mut system = ProjectileSystem::new(&no_lifetime(4));
    let mut player = player_far_away();
    let updates = system.step(0.01, &Octree::empty(), &mut player);
    assert!(updates.is_empty());
    assert!(system.slot(2).unwrap().position().y < -50.0);
}

// ============================================================================
// Ballistics
// ============================================================================

#[test]
fn test_drop_after_one_second() {
    let world = Octree::empty();
    let mut player = player_far_away();

    let mut undamped = ProjectileSystem::new(&ProjectileConfig {
        ballistics: BallisticsConfig::undamped(),
        ..no_lifetime(1)
    });
    let mut damped = ProjectileSystem::new(&no_lifetime(1));
    undamped.spawn(Vec3::ZERO, Vec3::Z, 15.0, Vec3::ZERO);
    damped.spawn(Vec3::ZERO, Vec3::Z, 15.0, Vec3::ZERO);

    // One second of 60 Hz frames with 5 sub-steps each.
    let dt = 1.0 / 300.0;
    for _ in 0..300 {
        undamped.step(dt, &world, &mut player);
        damped.step(dt, &world, &mut player);
    }

    let y = undamped.slot(0).unwrap().position().y;
    assert!((y + 12.5).abs() < 0.1, "undamped y = {y}");

    // Damping only ever slows the fall.
    let y_damped = damped.slot(0).unwrap().position().y;
    assert!(y_damped > y && y_damped < -7.0, "damped y = {y_damped}");
}

#[test]
fn test_bounces_off_floor_and_keeps_moving() {
    let mut mesh = CollisionMesh::new();
    mesh.add_floor(Vec3::ZERO, 50.0);
    let world = mesh.build_octree();
    let mut player = player_far_away();

    let mut system = ProjectileSystem::new(&no_lifetime(1));
    system.spawn(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -0.6, 0.8), 10.0, Vec3::ZERO);

    let mut bounced = false;
    for _ in 0..300 {
        for update in system.step(1.0 / 300.0, &world, &mut player) {
            if let ProjectileState::Hit { normal, .. } = update.state {
                assert!(normal.y > 0.99);
                bounced = true;
            }
        }
        let p = system.slot(0).unwrap();
        assert!(p.position().y > 0.0, "fell through at {}", p.position());
    }
    assert!(bounced);
    assert!(system.slot(0).unwrap().position().z > 2.0);
}

#[test]
fn test_walls_keep_projectiles_in_arena() {
    let mut mesh = CollisionMesh::new();
    mesh.add_arena(5.0, 6.0);
    let world = mesh.build_octree();
    let mut player = player_far_away();

    let mut system = ProjectileSystem::new(&no_lifetime(8));
    for i in 0..8 {
        let angle = i as f32 * std::f32::consts::FRAC_PI_4;
        let direction = Vec3::new(angle.cos(), 0.3, angle.sin()).normalize();
        system.spawn(Vec3::new(0.0, 1.0, 0.0), direction, 30.0, Vec3::ZERO);
    }

    for _ in 0..600 {
        system.step(1.0 / 300.0, &world, &mut player);
    }
    for (slot, p) in system.active() {
        let pos = p.position();
        assert!(pos.x.abs() < 5.0 && pos.z.abs() < 5.0, "slot {slot} escaped to {pos}");
    }
}

// ============================================================================
// Exchanges
// ============================================================================

#[test]
fn test_separated_pair_does_not_exchange() {
    let mut system = ProjectileSystem::new(&ProjectileConfig {
        ballistics: BallisticsConfig {
            gravity: 0.0,
            damping: 0.0,
            ..BallisticsConfig::default()
        },
        ..no_lifetime(2)
    });
    let mut player = player_far_away();

    system.spawn(Vec3::ZERO, Vec3::Z, 2.0, Vec3::ZERO);
    system.spawn(Vec3::new(0.5, 0.0, 0.0), Vec3::Z, 4.0, Vec3::ZERO);
    system.step(0.0, &Octree::empty(), &mut player);

    assert_eq!(system.slot(0).unwrap().velocity, Vec3::new(0.0, 0.0, 2.0));
    assert_eq!(system.slot(1).unwrap().velocity, Vec3::new(0.0, 0.0, 4.0));
}

#[test]
fn test_projectile_knocks_player() {
    let mut system = ProjectileSystem::new(&ProjectileConfig {
        ballistics: BallisticsConfig {
            gravity: 0.0,
            damping: 0.0,
            ..BallisticsConfig::default()
        },
        ..no_lifetime(1)
    });
    let mut player = PlayerBody::default();
    let capsule_before = *player.capsule();

    // Aimed at the capsule's upper end from +Z.
    system.spawn(Vec3::new(0.0, 1.0, 2.0), Vec3::NEG_Z, 20.0, Vec3::ZERO);
    let mut touched = false;
    for _ in 0..30 {
        let updates = system.step(1.0 / 300.0, &Octree::empty(), &mut player);
        if updates.iter().any(|u| u.hit_player) {
            touched = true;
            break;
        }
    }

    assert!(touched);
    assert!(player.velocity().z < -10.0);
    assert!(system.slot(0).unwrap().velocity.z > -10.0);
    // The player body itself is never displaced by the pool.
    assert_eq!(*player.capsule(), capsule_before);
}

// ============================================================================
// Visual output
// ============================================================================

#[test]
fn test_instance_layout() {
    assert_eq!(std::mem::size_of::<ProjectileInstance>(), 32);
    let instance = ProjectileInstance::new(Vec3::new(1.0, 2.0, 3.0), 0.2, 0.75, true);
    let bytes: &[u8] = bytemuck::bytes_of(&instance);
    assert_eq!(bytes.len(), 32);
    let back: &ProjectileInstance = bytemuck::from_bytes(bytes);
    assert_eq!(*back, instance);
}

#[test]
fn test_parked_slots_written_invisible() {
    let mut system = ProjectileSystem::new(&no_lifetime(5));
    system.spawn(Vec3::ONE, Vec3::Z, 1.0, Vec3::ZERO);

    let mut buffer = InstanceBuffer::with_capacity(5);
    system.write_visuals(&mut buffer);

    let instances = buffer.projectiles();
    assert!(instances[0].is_visible());
    assert!(instances[1..].iter().all(|p| !p.is_visible()));
    assert_eq!(buffer.as_bytes().len(), 5 * 32);
}
