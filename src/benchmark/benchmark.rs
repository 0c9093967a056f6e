use std::time::Instant;

use anyhow::Result;

use crate::simulation::engine::{Engine, GravityKind};
use crate::simulation::forces::{Acceleration, NewtonianGravity, NewtonianGravityBarnesHut};
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::universe::Universe;

const BENCH_THETA: f64 = 0.5;

/// Time one direct and one Barnes–Hut force pass for a range of `n`
pub fn bench_gravity() -> Result<()> {
    let ns = [200, 400, 800, 1600, 3200, 6400];

    println!("N,direct_s,bh_s");
    for n in ns {
        let bodies = make_bodies(n);
        let mut out = vec![NVec3::zeros(); n];

        let direct = NewtonianGravity { G: 1.0 };
        let bh = NewtonianGravityBarnesHut {
            G: 1.0,
            theta: BENCH_THETA,
        };

        // Warm up
        direct.acceleration(&bodies, &mut out)?;
        bh.acceleration(&bodies, &mut out)?;

        let t0 = Instant::now();
        direct.acceleration(&bodies, &mut out)?;
        let dt_direct = t0.elapsed().as_secs_f64();

        let t1 = Instant::now();
        bh.acceleration(&bodies, &mut out)?;
        let dt_bh = t1.elapsed().as_secs_f64();

        println!("{n},{dt_direct:.6},{dt_bh:.6}");
    }
    Ok(())
}

/// Whole-step cost for both gravity strategies.
/// Output is CSV so it can be pasted straight into a spreadsheet
pub fn bench_step_curve() -> Result<()> {
    println!("N,direct_ms,bh_ms");

    for n in (200..=6400).step_by(200) {
        // Large n: only 1 step to avoid minutes of runtime
        let steps_direct = if n <= 800 { 5 } else { 1 };
        let steps_bh = if n <= 2000 { 3 } else { 1 };

        let ms_direct = time_steps(n, GravityKind::Direct, steps_direct)?;
        let ms_bh = time_steps(n, GravityKind::BarnesHut, steps_bh)?;

        println!("{n},{ms_direct:.6},{ms_bh:.6}");
    }
    Ok(())
}

// helpers ===========================================================================

/// Deterministic spread of unit masses, no rng needed.
/// Small masses keep radii apart so nothing merges during a run.
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 500.0,
                (i_f * 0.13).cos() * 500.0,
                (i_f * 0.07).sin() * 500.0,
            );
            Body::at_rest(x, 1e-3)
        })
        .collect()
}

fn time_steps(n: usize, gravity: GravityKind, steps: u32) -> Result<f64> {
    let engine = Engine {
        gravity,
        theta: BENCH_THETA,
        merge_nearby_bodies: false,
        ..Engine::default()
    };
    let parameters = Parameters {
        h0: 0.01,
        ..Parameters::default()
    };
    let mut universe = Universe::from_bodies(make_bodies(n), engine, parameters)?;

    let t0 = Instant::now();
    for _ in 0..steps {
        universe.step()?;
    }
    Ok(t0.elapsed().as_secs_f64() * 1000.0 / steps as f64)
}

