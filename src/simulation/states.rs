//! Core state types for the N-body simulation.
//!
//! A [`Body`] is a spherical point mass with constant density. It owns its
//! position, velocity and a per-step acceleration accumulator; the radius is
//! derived from the mass and refreshed whenever the mass changes.

use nalgebra::Vector3;

use crate::simulation::integrator::IntegratorKind;

pub type NVec3 = Vector3<f64>;

/// Unitless gravitational constant used by [`acceleration_due_to`]
pub const G: f64 = 1.0;

/// Separations below this are treated as self-interaction and contribute nothing
pub const COINCIDENT_DISTANCE: f64 = 3.0 * f64::EPSILON;

/// Radius of a body with `mass` under the constant-density assumption
pub fn radius_for_mass(mass: f64) -> f64 {
    (mass * 10.0).cbrt()
}

/// Acceleration at `at` caused by a point mass `source_mass` located at `source`.
///
/// Returns the zero vector when the two points coincide, so querying a
/// position that holds the only mass in a region never blows up.
pub fn acceleration_due_to(at: &NVec3, source: &NVec3, source_mass: f64) -> NVec3 {
    let r = source - at;
    let dist2 = r.norm_squared();
    if dist2.sqrt() < COINCIDENT_DISTANCE {
        return NVec3::zeros();
    }
    let inv_r = dist2.sqrt().recip();
    let inv_r3 = inv_r * inv_r * inv_r;
    G * source_mass * inv_r3 * r
}

#[derive(Debug, Clone)]
pub struct Body {
    position: NVec3,
    velocity: NVec3,
    mass: f64,
    radius: f64,        // derived from mass, never set directly
    hue: f64,           // [0, 256), cosmetic
    acceleration: NVec3, // accumulated during the force pass
    bootstrapped: bool, // false until the first integration step
}

impl Body {
    pub fn new(position: NVec3, velocity: NVec3, mass: f64, hue: f64) -> Self {
        Self {
            position,
            velocity,
            mass,
            radius: radius_for_mass(mass),
            hue,
            acceleration: NVec3::zeros(),
            bootstrapped: false,
        }
    }

    /// Body of `mass` at rest at `position`
    pub fn at_rest(position: NVec3, mass: f64) -> Self {
        Self::new(position, NVec3::zeros(), mass, 0.0)
    }

    pub fn position(&self) -> NVec3 {
        self.position
    }

    pub fn set_position(&mut self, position: NVec3) {
        self.position = position;
    }

    pub fn velocity(&self) -> NVec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: NVec3) {
        self.velocity = velocity;
    }

    /// Position one step of size `dt` ago, as the Störmer–Verlet scheme sees it
    pub fn previous_position(&self, dt: f64) -> NVec3 {
        self.position - self.velocity * dt
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    pub fn set_mass(&mut self, mass: f64) {
        self.mass = mass;
        self.radius = radius_for_mass(mass);
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn hue(&self) -> f64 {
        self.hue
    }

    pub fn set_hue(&mut self, hue: f64) {
        self.hue = hue;
    }

    pub fn momentum(&self) -> NVec3 {
        self.velocity * self.mass
    }

    pub fn acceleration(&self) -> NVec3 {
        self.acceleration
    }

    pub fn add_acceleration(&mut self, a: NVec3) {
        self.acceleration += a;
    }

    pub fn reset_acceleration(&mut self) {
        self.acceleration = NVec3::zeros();
    }

    /// Whether the body has been through at least one integration step
    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped
    }

    /// Acceleration this body exerts on a point at `at`
    pub fn acceleration_on(&self, at: &NVec3) -> NVec3 {
        acceleration_due_to(at, &self.position, self.mass)
    }

    /// True when the spheres of `self` and `other` intersect
    pub fn overlaps(&self, other: &Body) -> bool {
        let reach = self.radius + other.radius;
        (self.position - other.position).norm_squared() < reach * reach
    }

    /// Advance by one step of size `dt` using the accumulated acceleration,
    /// then clear the accumulator.
    pub fn integrate_step(&mut self, scheme: IntegratorKind, dt: f64) {
        match scheme {
            IntegratorKind::Euler => self.euler_step(dt),
            IntegratorKind::StormerVerlet => self.stormer_verlet_step(dt),
        }
        self.bootstrapped = true;
        self.reset_acceleration();
    }

    // v_n+1 = v_n + a dt, x_n+1 = x_n + v_n+1 dt
    fn euler_step(&mut self, dt: f64) {
        self.velocity += self.acceleration * dt;
        self.position += self.velocity * dt;
    }

    // x_n+1 = 2 x_n - x_n-1 + a dt^2, first step uses a/2
    fn stormer_verlet_step(&mut self, dt: f64) {
        let a = if self.bootstrapped {
            self.acceleration
        } else {
            self.acceleration * 0.5
        };
        let previous = self.previous_position(dt);
        let next = self.position * 2.0 - previous + a * (dt * dt);
        self.velocity = (next - self.position) / dt;
        self.position = next;
    }
}
