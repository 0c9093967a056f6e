//! Fixed-step time integrators for the N-body system
//!
//! Both schemes consume the acceleration each body accumulated during the
//! force pass, so forces are always evaluated once per step before any body
//! moves. One scheme is chosen per universe and applied to every body.

use serde::Deserialize;

use super::states::Body;

/// Which integration scheme advances the bodies
/// integrator: "euler"` or `integrator: "verlet"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegratorKind {
    #[serde(rename = "euler")] // Semi-implicit Euler, velocity first then position
    Euler,

    #[serde(rename = "verlet")] // Störmer–Verlet on positions, half acceleration on the bootstrap step
    #[default]
    StormerVerlet,
}

/// Advance every body by one step of size `dt` using `scheme`.
/// Each body's accumulator is cleared as part of its step.
pub fn integrate_bodies(bodies: &mut [Body], scheme: IntegratorKind, dt: f64) {
    for b in bodies.iter_mut() {
        b.integrate_step(scheme, dt);
    }
}
