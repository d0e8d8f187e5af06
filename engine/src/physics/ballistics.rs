//! Ballistics for thrown projectiles
//!
//! Provides the per-slot projectile body, its world response, the
//! frame-rate independent damping curve and the charge-up curve that turns
//! a held throw into an impulse.
//!
//! # Integration order
//!
//! One call to [`Projectile::integrate`] does, in order:
//! 1. `center += velocity * dt`
//! 2. world contact: bounce (restitution `bounce`) and push out; otherwise
//!    `velocity.y -= gravity * dt`
//! 3. damping `velocity += velocity * (exp(-k * dt) - 1)`
//!
//! # Example
//!
//! ```ignore
//! use escape_arena_engine::physics::ballistics::{BallisticsConfig, Projectile};
//! use glam::Vec3;
//!
//! let config = BallisticsConfig::default();
//! let mut p = Projectile::parked(config.radius);
//! p.launch(Vec3::ZERO, Vec3::Z * 15.0, None);
//! let state = p.integrate(&config, 0.01, &octree);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, DEFAULT_BOUNCE, SpatialIndex, bounce_response, resolve};
use super::types::Sphere;

/// Where parked (never launched) projectiles wait, out of the playfield.
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, -100.0, 0.0);

/// Velocity multiplier for `exp(-k * dt)` damping over one step.
///
/// Adding `v * damping_factor(k, dt)` to `v` scales it by `exp(-k * dt)`, so
/// splitting a step into smaller ones decays by the same total amount.
pub fn damping_factor(k: f32, dt: f32) -> f32 {
    (-k * dt).exp() - 1.0
}

/// Configuration for projectile physics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BallisticsConfig {
    /// Downward gravity acceleration (m/s²), applied when not touching the world
    pub gravity: f32,
    /// Exponential damping rate `k` (1/s)
    pub damping: f32,
    /// Restitution for world bounces (> 1 gains energy)
    pub bounce: f32,
    /// Collider radius of every projectile (meters)
    pub radius: f32,
}

impl Default for BallisticsConfig {
    fn default() -> Self {
        Self {
            gravity: 25.0,
            damping: 1.5,
            bounce: DEFAULT_BOUNCE,
            radius: 0.2,
        }
    }
}

impl BallisticsConfig {
    /// Same gravity, no damping. Pure ballistic arcs.
    pub fn undamped() -> Self {
        Self {
            damping: 0.0,
            ..Self::default()
        }
    }

    pub fn with_gravity(gravity: f32) -> Self {
        Self {
            gravity,
            ..Self::default()
        }
    }
}

/// Exponential charge-up curve for throws.
///
/// `impulse = base + multiplier * (1 - exp(-rate * charge_seconds))`, so a
/// tap gives `base` and holding longer approaches `base + multiplier`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeCurve {
    pub base: f32,
    pub multiplier: f32,
    /// Rate `k` in 1/s
    pub rate: f32,
}

impl Default for ChargeCurve {
    fn default() -> Self {
        Self {
            base: 15.0,
            multiplier: 30.0,
            rate: 1.0,
        }
    }
}

impl ChargeCurve {
    /// Launch impulse for a throw held for `charge_seconds`.
    pub fn impulse(&self, charge_seconds: f32) -> f32 {
        let charge = charge_seconds.max(0.0);
        self.base + self.multiplier * (1.0 - (-self.rate * charge).exp())
    }
}

/// Fireball variant timing: projectiles fade out and expire.
///
/// Times are seconds on the simulation clock.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lifetime {
    /// Seconds from launch until the projectile is deactivated
    pub lifetime: f64,
    /// Seconds from launch until fading starts
    pub fade_start: f64,
    /// Seconds the opacity takes to go from 1 to 0
    pub fade_duration: f64,
}

impl Default for Lifetime {
    fn default() -> Self {
        Self {
            lifetime: 5.0,
            fade_start: 4.0,
            fade_duration: 1.0,
        }
    }
}

/// The state of a projectile after an update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ProjectileState {
    /// Moving freely this step
    #[default]
    Flying,
    /// Touched world geometry this step and bounced
    Hit {
        /// Position after the push-out
        position: Vec3,
        /// World contact normal
        normal: Vec3,
    },
    /// Lifetime ran out (or the slot is not active)
    Expired,
}

/// One projectile pool slot.
///
/// Slots are never reallocated: launching overwrites the collider,
/// velocity and visual state in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    /// Sphere collider (meters)
    pub collider: Sphere,
    /// Current velocity (m/s)
    pub velocity: Vec3,
    /// Whether the slot is simulated
    pub active: bool,
    /// Render hint: draw the projectile at all
    pub visible: bool,
    /// Render hint: 1 = opaque, 0 = faded out
    pub opacity: f32,
    /// Simulation time at which the projectile expires
    pub expires_at: Option<f64>,
    /// Simulation time at which fading starts
    pub fade_starts_at: Option<f64>,
}

impl Projectile {
    /// An inactive, invisible slot parked below the world.
    pub fn parked(radius: f32) -> Self {
        Self {
            collider: Sphere::new(PARKED_POSITION, radius),
            velocity: Vec3::ZERO,
            active: false,
            visible: false,
            opacity: 1.0,
            expires_at: None,
            fade_starts_at: None,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.collider.center
    }

    /// (Re)activate this slot.
    ///
    /// `timing` is `(now, lifetime)` for fireballs, `None` for projectiles
    /// that live until recycled.
    pub fn launch(&mut self, origin: Vec3, velocity: Vec3, timing: Option<(f64, &Lifetime)>) {
        self.collider.center = origin;
        self.velocity = velocity;
        self.active = true;
        self.visible = true;
        self.opacity = 1.0;
        match timing {
            Some((now, lifetime)) => {
                self.expires_at = Some(now + lifetime.lifetime);
                self.fade_starts_at = Some(now + lifetime.fade_start);
            }
            None => {
                self.expires_at = None;
                self.fade_starts_at = None;
            }
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.visible = false;
    }

    /// Update the fade and expiry of a fireball at simulation time `now`.
    ///
    /// Returns [`ProjectileState::Expired`] once, on the update that
    /// deactivates the slot. Opacity is only a render hint.
    pub fn update_lifetime(&mut self, now: f64, fade_duration: f64) -> ProjectileState {
        if !self.active {
            return ProjectileState::Expired;
        }

        if let Some(fade_start) = self.fade_starts_at
            && now > fade_start
        {
            let progress = if fade_duration > 0.0 {
                (now - fade_start) / fade_duration
            } else {
                1.0
            };
            self.opacity = (1.0 - progress).clamp(0.0, 1.0) as f32;
        }

        if let Some(expires_at) = self.expires_at
            && now > expires_at
        {
            self.deactivate();
            return ProjectileState::Expired;
        }

        ProjectileState::Flying
    }

    /// Advance the body by `dt` against the world.
    pub fn integrate<I: SpatialIndex + ?Sized>(
        &mut self,
        config: &BallisticsConfig,
        dt: f32,
        world: &I,
    ) -> ProjectileState {
        if !self.active {
            return ProjectileState::Expired;
        }

        self.collider.center += self.velocity * dt;

        let state = match resolve(&Collider::Sphere(self.collider), world) {
            Some(contact) => {
                self.velocity = bounce_response(self.velocity, &contact, config.bounce);
                self.collider.center += contact.correction();
                ProjectileState::Hit {
                    position: self.collider.center,
                    normal: contact.normal,
                }
            }
            None => {
                self.velocity.y -= config.gravity * dt;
                ProjectileState::Flying
            }
        };

        self.velocity += self.velocity * damping_factor(config.damping, dt);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::octree::Octree;
    use crate::physics::types::Triangle;

    fn launched(velocity: Vec3) -> Projectile {
        let mut p = Projectile::parked(0.2);
        p.launch(Vec3::ZERO, velocity, None);
        p
    }

    #[test]
    fn test_ballistics_config_default() {
        let config = BallisticsConfig::default();
        assert_eq!(config.gravity, 25.0);
        assert_eq!(config.damping, 1.5);
        assert_eq!(config.bounce, 1.5);
        assert_eq!(config.radius, 0.2);
    }

    #[test]
    fn test_state_defaults_to_flying() {
        assert_eq!(ProjectileState::default(), ProjectileState::Flying);
    }

    #[test]
    fn test_parked_slot_is_inactive() {
        let p = Projectile::parked(0.2);
        assert!(!p.active);
        assert!(!p.visible);
        assert_eq!(p.position(), PARKED_POSITION);
    }

    #[test]
    fn test_damping_factor_shape() {
        assert_eq!(damping_factor(1.5, 0.0), 0.0);
        assert!(damping_factor(1.5, 0.01) < 0.0);
        assert!(damping_factor(1.5, 0.01) > -1.0);
    }

    #[test]
    fn test_damping_splits_evenly() {
        // One step of dt vs five of dt/5 decay by the same factor.
        let v0 = 10.0_f32;
        let one = v0 * (1.0 + damping_factor(1.5, 0.05));
        let mut five = v0;
        for _ in 0..5 {
            five += five * damping_factor(1.5, 0.01);
        }
        assert!((one - five).abs() < 1e-4, "{one} vs {five}");
    }

    #[test]
    fn test_charge_curve() {
        let curve = ChargeCurve::default();
        assert_eq!(curve.impulse(0.0), 15.0);
        assert!(curve.impulse(1.0) > 15.0);
        assert!(curve.impulse(100.0) <= 45.0 + 1e-3);
        assert!(curve.impulse(2.0) > curve.impulse(1.0));
        // Negative charge is treated as a tap.
        assert_eq!(curve.impulse(-3.0), 15.0);
    }

    #[test]
    fn test_projectile_falls_in_empty_world() {
        let config = BallisticsConfig::undamped();
        let world = Octree::empty();
        let mut p = launched(Vec3::ZERO);

        for _ in 0..100 {
            assert_eq!(p.integrate(&config, 0.01, &world), ProjectileState::Flying);
        }
        // Position moves before gravity applies, so the drop lags 0.5 * g * t² a little.
        assert!((p.position().y + 12.5).abs() < 0.2, "y = {}", p.position().y);
        assert!((p.velocity.y + 25.0).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_bounces_off_floor() {
        let config = BallisticsConfig::undamped();
        let world = Octree::from_triangles([
            Triangle::new(
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(-10.0, 0.0, 10.0),
                Vec3::new(10.0, 0.0, 10.0),
            ),
            Triangle::new(
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(10.0, 0.0, -10.0),
            ),
        ]);
        let mut p = Projectile::parked(0.2);
        p.launch(Vec3::new(0.0, 0.25, 0.0), Vec3::new(0.0, -10.0, 0.0), None);

        let state = p.integrate(&config, 0.01, &world);
        match state {
            ProjectileState::Hit { position, normal } => {
                assert!((normal - Vec3::Y).length() < 1e-5);
                assert!(position.y >= 0.2 - 1e-5);
            }
            other => panic!("expected Hit, got {other:?}"),
        }
        // -10 reflected with 1.5 restitution: -10 + 15 = 5 upward.
        assert!((p.velocity.y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_inactive_projectile_does_not_move() {
        let config = BallisticsConfig::default();
        let mut p = Projectile::parked(0.2);
        let state = p.integrate(&config, 0.1, &Octree::empty());
        assert_eq!(state, ProjectileState::Expired);
        assert_eq!(p.position(), PARKED_POSITION);
    }

    #[test]
    fn test_lifetime_fades_then_expires() {
        let timing = Lifetime::default();
        let mut p = Projectile::parked(0.2);
        p.launch(Vec3::ZERO, Vec3::ZERO, Some((10.0, &timing)));

        assert_eq!(p.update_lifetime(12.0, timing.fade_duration), ProjectileState::Flying);
        assert_eq!(p.opacity, 1.0);

        assert_eq!(p.update_lifetime(14.5, timing.fade_duration), ProjectileState::Flying);
        assert!((p.opacity - 0.5).abs() < 1e-6);

        assert_eq!(p.update_lifetime(15.5, timing.fade_duration), ProjectileState::Expired);
        assert!(!p.active);
        assert!(!p.visible);
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn test_relaunch_resets_visual_state() {
        let timing = Lifetime::default();
        let mut p = Projectile::parked(0.2);
        p.launch(Vec3::ZERO, Vec3::ZERO, Some((0.0, &timing)));
        p.update_lifetime(6.0, timing.fade_duration);
        assert!(!p.active);

        p.launch(Vec3::ONE, Vec3::X, None);
        assert!(p.active);
        assert!(p.visible);
        assert_eq!(p.opacity, 1.0);
        assert_eq!(p.expires_at, None);
    }
}
