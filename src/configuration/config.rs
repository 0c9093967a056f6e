//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator, gravity strategy, opening angle, merging
//! - [`ParametersConfig`] – step size, gravity scale, run length, seed
//! - [`UniverseConfig`]   – body count, spatial scale and initial distribution
//! - [`BodyConfig`]       – optional explicit initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! An example scenario matching these types:
//!
//! ```yaml
//! engine:
//!   integrator: "verlet"       # or "euler"
//!   gravity: "barnes_hut"      # or "direct"
//!   theta: 0.5
//!   merge_nearby_bodies: true
//!
//! parameters:
//!   h0: 1.0                    # step size
//!   G: 1.0                     # gravitational constant scale
//!   steps: 2000                # frames to run
//!   report_every: 100          # log diagnostics every n frames
//!   seed: 42                   # deterministic seed
//!
//! universe:
//!   total_bodies: 300
//!   size: 400.0
//!   distribution: "ellipsoid"  # or "ring", "sphere"
//!
//! bodies:                      # optional, replaces the distribution
//!   - x: [ -50.0, 0.0, 0.0 ]
//!     v: [  0.0, 0.05, 0.0 ]
//!     m: 1.0
//!     hue: 30.0
//! ```
//!
//! Everything except `universe` has defaults. The universe then maps this
//! configuration into its runtime engine settings and parameters.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::Deserialize;

use crate::simulation::distribution::DistributionKind;
use crate::simulation::engine::{Engine, GravityKind};
use crate::simulation::integrator::IntegratorKind;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};

/// High-level engine configuration
#[derive(Deserialize, Debug, Clone, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: IntegratorKind, // scheme applied to every body
    #[serde(default)]
    pub gravity: GravityKind, // `direct` - pairwise sum, `barnes_hut` - octree per step
    pub theta: Option<f64>, // opening angle, 0 forces the exact sum
    pub merge_nearby_bodies: Option<bool>, // merge overlapping bodies before each force pass
}

/// Global numerical and physical parameters for a scenario
#[derive(Deserialize, Debug, Clone, Default)]
#[allow(non_snake_case)]
pub struct ParametersConfig {
    pub h0: Option<f64>, // time step size
    pub G: Option<f64>, // gravitational constant scale
    pub steps: Option<u64>, // frames to run
    pub report_every: Option<u64>, // diagnostics interval
    pub seed: Option<u64>, // deterministic seed to make runs reproducable
}

/// Size and shape of the initial universe
#[derive(Deserialize, Debug, Clone)]
pub struct UniverseConfig {
    pub total_bodies: usize, // number of bodies the distribution must produce
    pub size: f64, // spatial scale handed to the distribution
    #[serde(default)]
    pub distribution: DistributionKind,
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: Vec<f64>, // Initial position vector `x` in simulation units
    pub v: Vec<f64>, // Initial velocity vector `v` in simulation units per step
    pub m: f64, // Mass of the body, radius follows from it
    pub hue: Option<f64>, // Hue in [0, 256), 0 if omitted
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    pub universe: UniverseConfig,
    pub bodies: Option<Vec<BodyConfig>>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("failed to parse scenario YAML")
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open scenario {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    /// Runtime engine settings, falling back to [`Engine::default`]
    pub fn engine(&self) -> Engine {
        let defaults = Engine::default();
        Engine {
            integrator: self.engine.integrator,
            gravity: self.engine.gravity,
            theta: self.engine.theta.unwrap_or(defaults.theta),
            merge_nearby_bodies: self
                .engine
                .merge_nearby_bodies
                .unwrap_or(defaults.merge_nearby_bodies),
        }
    }

    /// Runtime parameters, falling back to [`Parameters::default`]
    pub fn parameters(&self) -> Parameters {
        let defaults = Parameters::default();
        let p = &self.parameters;
        Parameters {
            h0: p.h0.unwrap_or(defaults.h0),
            G: p.G.unwrap_or(defaults.G),
            steps: p.steps.unwrap_or(defaults.steps),
            report_every: p.report_every.unwrap_or(defaults.report_every),
            seed: p.seed.unwrap_or(defaults.seed),
        }
    }
}

impl BodyConfig {
    /// Runtime body from this configuration, checking vector lengths
    pub fn to_body(&self) -> Result<Body> {
        Ok(Body::new(
            vec3(&self.x, "x")?,
            vec3(&self.v, "v")?,
            self.m,
            self.hue.unwrap_or(0.0),
        ))
    }
}

fn vec3(values: &[f64], field: &str) -> Result<NVec3> {
    ensure!(
        values.len() == 3,
        "body field `{field}` needs 3 components, got {}",
        values.len()
    );
    Ok(NVec3::new(values[0], values[1], values[2]))
}
