//! Initial body distributions.
//!
//! A [`BodyDistribution`] turns a body count and a spatial scale into the
//! starting body set of a universe. The engine does not care which one was
//! used; every distribution returns exactly the requested number of bodies,
//! each with finite position and velocity and strictly positive mass.

use std::f64::consts::PI;

use anyhow::Result;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Cauchy, Distribution, StandardNormal};
use serde::Deserialize;

use crate::simulation::hue::HUE_RANGE;
use crate::simulation::states::{Body, NVec3};

/// Lower bound for sampled masses, keeps every radius and division finite
pub const MIN_MASS: f64 = 1e-6;

/// Strategy producing the initial bodies of a universe
pub trait BodyDistribution {
    fn initialize_bodies(
        &self,
        total_bodies: usize,
        size: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Body>>;
}

/// Which distribution a scenario starts from
/// distribution: "ellipsoid" | "ring" | "sphere"
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistributionKind {
    #[serde(rename = "ellipsoid")] // flattened disc spinning about +Y
    #[default]
    Ellipsoid,

    #[serde(rename = "ring")] // thin ring in the XZ plane, at rest
    Ring,

    #[serde(rename = "sphere")] // gaussian sphere with heavy-tailed masses
    Sphere,
}

impl DistributionKind {
    pub fn strategy(&self) -> Box<dyn BodyDistribution> {
        match self {
            DistributionKind::Ellipsoid => Box::new(EllipsoidDistribution),
            DistributionKind::Ring => Box::new(RingDistribution),
            DistributionKind::Sphere => Box::new(SphereDistribution),
        }
    }
}

/// Bodies uniform inside an ellipsoid with radii `(size, size/10, size)`.
///
/// Each body is given a tangential velocity about the +Y axis whose speed is
/// half the circular-orbit speed `sqrt(|a| |r|)` in a softened field.
pub struct EllipsoidDistribution;

impl BodyDistribution for EllipsoidDistribution {
    fn initialize_bodies(
        &self,
        total_bodies: usize,
        size: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Body>> {
        let radii = NVec3::new(size, size / 10.0, size);
        let mut bodies: Vec<Body> = (0..total_bodies)
            .map(|_| {
                let position = random_in_unit_sphere(rng).component_mul(&radii);
                let mass = rng.random_range(MIN_MASS..1.0);
                Body::new(position, NVec3::zeros(), mass, random_hue(rng))
            })
            .collect();

        // softening keeps close pairs from producing huge spin-up speeds
        let soft2 = size * size / 100.0;
        let axis = NVec3::y();
        let velocities: Vec<NVec3> = bodies
            .iter()
            .enumerate()
            .map(|(i, bi)| {
                let mut a = NVec3::zeros();
                for (j, bj) in bodies.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let r = bj.position() - bi.position();
                    let d2 = r.norm_squared() + soft2;
                    a += bj.mass() / (d2 * d2.sqrt()) * r;
                }
                let speed = (a.norm() * bi.position().norm()).sqrt();
                bi.position()
                    .cross(&axis)
                    .try_normalize(f64::EPSILON)
                    .map(|dir| dir * (speed / 2.0))
                    .unwrap_or_else(NVec3::zeros)
            })
            .collect();

        for (b, v) in bodies.iter_mut().zip(velocities) {
            b.set_velocity(v);
        }
        Ok(bodies)
    }
}

/// Bodies on a ring of radius `size` in the XZ plane, each displaced by up
/// to `size/10` in a random direction. All start at rest.
pub struct RingDistribution;

impl BodyDistribution for RingDistribution {
    fn initialize_bodies(
        &self,
        total_bodies: usize,
        size: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Body>> {
        let bodies = (0..total_bodies)
            .map(|_| {
                let angle = rng.random_range(0.0..2.0 * PI);
                let on_ring = NVec3::new(angle.cos(), 0.0, angle.sin()) * size;
                let offset = random_unit_vector(rng) * (rng.random::<f64>() * size / 10.0);
                let mass = rng.random_range(MIN_MASS..1.0);
                Body::new(on_ring + offset, NVec3::zeros(), mass, random_hue(rng))
            })
            .collect();
        Ok(bodies)
    }
}

/// Isotropic directions at gaussian distances `size * N(0, 1)` with masses
/// drawn from `|Cauchy(0, 1)|`.
///
/// Each body moves in a random direction at half the speed that would make
/// its kinetic energy match its potential energy `sqrt(2 |U| / m)`.
pub struct SphereDistribution;

impl BodyDistribution for SphereDistribution {
    fn initialize_bodies(
        &self,
        total_bodies: usize,
        size: f64,
        rng: &mut ChaCha8Rng,
    ) -> Result<Vec<Body>> {
        let cauchy = Cauchy::new(0.0_f64, 1.0)?;
        let mut bodies: Vec<Body> = (0..total_bodies)
            .map(|_| {
                let z: f64 = rng.sample(StandardNormal);
                let position = random_unit_vector(rng) * (size * z);
                let mass = cauchy.sample(rng).abs().max(MIN_MASS);
                Body::new(position, NVec3::zeros(), mass, random_hue(rng))
            })
            .collect();

        let potentials: Vec<f64> = bodies
            .iter()
            .enumerate()
            .map(|(i, bi)| {
                bodies
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != i)
                    .filter_map(|(_, bj)| {
                        let dist = (bi.position() - bj.position()).norm();
                        (dist > 0.0).then(|| -bi.mass() * bj.mass() / dist)
                    })
                    .sum::<f64>()
            })
            .collect();

        for (b, u) in bodies.iter_mut().zip(potentials) {
            let speed = (2.0 * u.abs() / b.mass()).sqrt();
            b.set_velocity(random_unit_vector(rng) * (speed / 2.0));
        }
        Ok(bodies)
    }
}

// helpers ===========================================================================

/// Uniform sample from the closed unit ball, by rejection
pub fn random_in_unit_sphere(rng: &mut ChaCha8Rng) -> NVec3 {
    loop {
        let v = NVec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        if v.norm_squared() <= 1.0 {
            return v;
        }
    }
}

/// Uniformly distributed direction
pub fn random_unit_vector(rng: &mut ChaCha8Rng) -> NVec3 {
    loop {
        if let Some(v) = random_in_unit_sphere(rng).try_normalize(1e-6) {
            return v;
        }
    }
}

fn random_hue(rng: &mut ChaCha8Rng) -> f64 {
    rng.random_range(0.0..HUE_RANGE)
}
