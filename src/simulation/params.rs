//! Numerical and physical parameters for the simulation
//!
//! `Parameters` holds runtime settings:
//! - integration step size
//! - gravitational constant scale
//! - number of steps to run and how often to report
//! - random seed for the body distribution

#[derive(Debug, Clone)]
#[allow(non_snake_case)]
pub struct Parameters {
    pub h0: f64, // step size
    pub G: f64, // gravitational constant scale
    pub steps: u64, // frames to run from the CLI
    pub report_every: u64, // log diagnostics every n steps
    pub seed: u64, // deterministic seed
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            h0: 1.0,
            G: 1.0,
            steps: 1000,
            report_every: 100,
            seed: 42,
        }
    }
}
