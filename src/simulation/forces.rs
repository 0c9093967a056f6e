//! Force / acceleration contributors for the n-body engine
//!
//! Defines the acceleration trait, direct Newtonian gravity and a
//! Barnes–Hut–based variant evaluated through the octree.

use anyhow::Result;
use rayon::prelude::*;

use crate::simulation::barnes_hut::Octree;
use crate::simulation::states::{Body, NVec3, COINCIDENT_DISTANCE};

/// Collection of acceleration terms.
/// Each term implements [`Acceleration`] and their contributions are summed
/// into a single acceleration vector per body
pub struct AccelSet {
    terms: Vec<Box<dyn Acceleration + Send + Sync>>,
}

impl AccelSet {
    /// Create an empty acceleration set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Add an acceleration term
    pub fn with(mut self, term: impl Acceleration + Send + Sync + 'static) -> Self {
        self.terms.push(Box::new(term));
        self
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compute total accelerations for all `bodies`
    /// - `out[i]` will be set to the sum of contributions from all terms
    pub fn accumulate_accels(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        // Zero buffer
        for a in out.iter_mut() {
            *a = NVec3::zeros();
        }
        for term in &self.terms {
            term.acceleration(bodies, out)?;
        }
        Ok(())
    }
}

impl Default for AccelSet {
    fn default() -> Self {
        Self::new()
    }
}

/// Acceleration sources operating on a body slice.
/// Implementations add their contribution into `out[i]` for each body
pub trait Acceleration {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()>;
}

/// Newtonian gravity by direct summation over every unordered pair
#[allow(non_snake_case)]
pub struct NewtonianGravity {
    pub G: f64, // gravitational constant scale
}

impl Acceleration for NewtonianGravity {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        let n = bodies.len();

        // Loop over each unordered pair (i, j) with i < j
        for i in 0..n {
            let xi = bodies[i].position();
            let mi = bodies[i].mass();

            for j in (i + 1)..n {
                let xj = bodies[j].position();
                let mj = bodies[j].mass();

                // r points from i to j: i is pulled along +r, j along -r
                let r = xj - xi;
                let dist = r.norm();

                // coincident bodies exert nothing on each other
                if dist < COINCIDENT_DISTANCE {
                    continue;
                }

                // coef = G / |r|^3
                let coef = self.G / (dist * dist * dist);

                // Equal and opposite:
                // a_i +=  G m_j r / |r|^3
                // a_j += -G m_i r / |r|^3
                out[i] += coef * mj * r;
                out[j] -= coef * mi * r;
            }
        }
        Ok(())
    }
}

// =========================================================================================
// Barnes-hut implementation
// =========================================================================================

/// Newtonian gravity evaluated via a Barnes–Hut octree.
/// The tree is rebuilt from the current positions on every call and only
/// read while the per-body queries run, so queries are spread over rayon's
/// pool with each body writing its own slot.
#[allow(non_snake_case)]
pub struct NewtonianGravityBarnesHut {
    pub G: f64,
    pub theta: f64,
}

impl Acceleration for NewtonianGravityBarnesHut {
    fn acceleration(&self, bodies: &[Body], out: &mut [NVec3]) -> Result<()> {
        if bodies.is_empty() {
            return Ok(());
        }
        let tree = Octree::from_bodies(bodies)?;

        out.par_iter_mut()
            .zip(bodies.par_iter())
            .for_each(|(a, b)| {
                *a += self.G * tree.acceleration(&b.position(), self.theta);
            });
        Ok(())
    }
}
