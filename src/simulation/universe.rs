//! The simulated universe and its per-step pipeline
//!
//! A [`Universe`] owns every live body together with:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - the active force set (`AccelSet`)
//!
//! Each call to [`Universe::step`] runs, in order:
//! 1. the merge pass, when `merge_nearby_bodies` is on
//! 2. force accumulation into a scratch buffer, then into each body
//! 3. integration, which also clears every accumulator

use std::fmt;

use anyhow::{ensure, Result};
use log::{debug, info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::configuration::config::ScenarioConfig;
use crate::simulation::collisions::resolve_collisions;
use crate::simulation::distribution::BodyDistribution;
use crate::simulation::engine::{Engine, GravityKind};
use crate::simulation::forces::{AccelSet, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::integrator::integrate_bodies;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

pub struct Universe {
    engine: Engine,
    parameters: Parameters,
    bodies: Vec<Body>,
    forces: AccelSet,
    accel_buf: Vec<NVec3>, // scratch space reused by every force pass
    t: f64,
    steps_taken: u64,
}

impl Universe {
    /// Universe seeded from `distribution` with `parameters.seed`
    pub fn with_distribution(
        total_bodies: usize,
        size: f64,
        distribution: &dyn BodyDistribution,
        engine: Engine,
        parameters: Parameters,
    ) -> Result<Self> {
        ensure!(total_bodies > 0, "a universe needs at least one body");
        ensure!(
            size.is_finite() && size > 0.0,
            "universe size must be positive and finite, got {size}"
        );

        let mut rng = ChaCha8Rng::seed_from_u64(parameters.seed);
        let bodies = distribution.initialize_bodies(total_bodies, size, &mut rng)?;
        ensure!(
            bodies.len() == total_bodies,
            "distribution produced {} bodies, expected {total_bodies}",
            bodies.len()
        );

        Self::from_bodies(bodies, engine, parameters)
    }

    /// Universe from an explicit body list
    pub fn from_bodies(bodies: Vec<Body>, engine: Engine, parameters: Parameters) -> Result<Self> {
        ensure!(
            engine.theta.is_finite() && engine.theta >= 0.0,
            "opening angle theta must be finite and non-negative, got {}",
            engine.theta
        );
        ensure!(
            parameters.h0.is_finite() && parameters.h0 > 0.0,
            "step size h0 must be positive and finite, got {}",
            parameters.h0
        );
        ensure!(
            parameters.G.is_finite(),
            "gravitational constant must be finite, got {}",
            parameters.G
        );
        for (i, b) in bodies.iter().enumerate() {
            ensure!(
                b.position().iter().all(|c| c.is_finite())
                    && b.velocity().iter().all(|c| c.is_finite()),
                "body {i} has a non-finite position or velocity"
            );
            ensure!(
                b.mass().is_finite() && b.mass() > 0.0,
                "body {i} must have positive finite mass, got {}",
                b.mass()
            );
        }

        let forces = match engine.gravity {
            GravityKind::Direct => AccelSet::new().with(NewtonianGravity { G: parameters.G }),
            GravityKind::BarnesHut => AccelSet::new().with(NewtonianGravityBarnesHut {
                G: parameters.G,
                theta: engine.theta,
            }),
        };

        let accel_buf = vec![NVec3::zeros(); bodies.len()];
        Ok(Self {
            engine,
            parameters,
            bodies,
            forces,
            accel_buf,
            t: 0.0,
            steps_taken: 0,
        })
    }

    /// Build the runtime universe described by a scenario file.
    /// Explicit bodies win over the configured distribution.
    pub fn build_universe(cfg: ScenarioConfig) -> Result<Self> {
        let engine = cfg.engine();
        let parameters = cfg.parameters();

        match &cfg.bodies {
            Some(list) => {
                warn!(
                    "scenario lists {} explicit bodies, ignoring the {:?} distribution",
                    list.len(),
                    cfg.universe.distribution
                );
                ensure!(!list.is_empty(), "a universe needs at least one body");
                let bodies = list
                    .iter()
                    .map(|bc| bc.to_body())
                    .collect::<Result<Vec<_>>>()?;
                Self::from_bodies(bodies, engine, parameters)
            }
            None => {
                info!(
                    "seeding {} bodies from the {:?} distribution (size {}, seed {})",
                    cfg.universe.total_bodies,
                    cfg.universe.distribution,
                    cfg.universe.size,
                    parameters.seed
                );
                let strategy = cfg.universe.distribution.strategy();
                Self::with_distribution(
                    cfg.universe.total_bodies,
                    cfg.universe.size,
                    strategy.as_ref(),
                    engine,
                    parameters,
                )
            }
        }
    }

    /// Advance the universe by one frame of size `h0`
    pub fn step(&mut self) -> Result<()> {
        if self.engine.merge_nearby_bodies {
            let merges = resolve_collisions(&mut self.bodies);
            if merges > 0 {
                debug!(
                    "step {}: {merges} merges, {} bodies remain",
                    self.steps_taken,
                    self.bodies.len()
                );
            }
        }

        self.accel_buf.resize(self.bodies.len(), NVec3::zeros());
        self.forces.accumulate_accels(&self.bodies, &mut self.accel_buf)?;
        for (b, a) in self.bodies.iter_mut().zip(self.accel_buf.iter()) {
            b.add_acceleration(*a);
        }

        integrate_bodies(&mut self.bodies, self.engine.integrator, self.parameters.h0);

        self.t += self.parameters.h0;
        self.steps_taken += 1;
        Ok(())
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(Body::mass).sum()
    }

    /// Mass-weighted mean position, the origin when there is no mass
    pub fn center_of_mass(&self) -> NVec3 {
        let total = self.total_mass();
        if total <= 0.0 {
            return NVec3::zeros();
        }
        self.bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + b.position() * b.mass())
            / total
    }

    pub fn total_momentum(&self) -> NVec3 {
        self.bodies
            .iter()
            .fold(NVec3::zeros(), |acc, b| acc + b.momentum())
    }

    /// Root-mean-square distance of the bodies from the center of mass
    pub fn position_standard_deviation(&self) -> f64 {
        let n = self.bodies.len();
        if n == 0 {
            return 0.0;
        }
        let com = self.center_of_mass();
        let variance = self
            .bodies
            .iter()
            .map(|b| (b.position() - com).norm_squared())
            .sum::<f64>()
            / n as f64;
        variance.sqrt()
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            steps_taken: self.steps_taken,
            time: self.t,
            body_count: self.body_count(),
            total_mass: self.total_mass(),
            center_of_mass: self.center_of_mass(),
            total_momentum: self.total_momentum(),
            position_standard_deviation: self.position_standard_deviation(),
        }
    }
}

/// Snapshot of the global quantities of a universe
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostics {
    pub steps_taken: u64,
    pub time: f64,
    pub body_count: usize,
    pub total_mass: f64,
    pub center_of_mass: NVec3,
    pub total_momentum: NVec3,
    pub position_standard_deviation: f64,
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = &self.center_of_mass;
        let p = &self.total_momentum;
        write!(
            f,
            "step {:6} t = {:10.3} n = {:5} M = {:.4} com = ({:.3}, {:.3}, {:.3}) P = ({:.3e}, {:.3e}, {:.3e}) spread = {:.3}",
            self.steps_taken,
            self.time,
            self.body_count,
            self.total_mass,
            c.x,
            c.y,
            c.z,
            p.x,
            p.y,
            p.z,
            self.position_standard_deviation
        )
    }
}
