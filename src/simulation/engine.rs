//! High-level runtime engine settings
//!
//! Selects the integrator, the gravity strategy, the Barnes–Hut opening
//! angle and whether overlapping bodies merge.

use serde::Deserialize;

use crate::simulation::integrator::IntegratorKind;

/// How the force pass is evaluated
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GravityKind {
    #[serde(rename = "direct")] // O(n^2) pairwise summation
    #[default]
    Direct,

    #[serde(rename = "barnes_hut")] // octree rebuilt once per step, one query per body
    BarnesHut,
}

#[derive(Debug, Clone)]
pub struct Engine {
    pub integrator: IntegratorKind, // euler or verlet
    pub gravity: GravityKind, // direct or barnes-hut
    pub theta: f64, // opening angle for barnes-hut
    pub merge_nearby_bodies: bool, // merge overlapping bodies before each force pass
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            integrator: IntegratorKind::default(),
            gravity: GravityKind::default(),
            theta: 0.5,
            merge_nearby_bodies: true,
        }
    }
}
