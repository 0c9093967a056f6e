use universe_sim::{bench_gravity, bench_step_curve};
use universe_sim::{ScenarioConfig, Universe};

use anyhow::Result;
use clap::Parser;
use log::info;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    /// Scenario file under `scenarios/`
    #[arg(short, default_value = "ellipsoid.yaml")]
    file_name: String,

    /// Override the number of frames to run
    #[arg(long)]
    steps: Option<u64>,

    /// Time direct against Barnes–Hut gravity instead of running a scenario
    #[arg(long)]
    bench: bool,
}

// load here to keep main clean
fn load_scenario_from_yaml(file_name: &str) -> Result<ScenarioConfig> {
    let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("scenarios")
        .join(file_name);
    info!("loading scenario {}", config_path.display());
    ScenarioConfig::from_path(&config_path)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.bench {
        bench_gravity()?;
        bench_step_curve()?;
        return Ok(());
    }

    let scenario_cfg = load_scenario_from_yaml(&args.file_name)?;
    let mut universe = Universe::build_universe(scenario_cfg)?;

    let steps = args.steps.unwrap_or(universe.parameters().steps);
    let report_every = universe.parameters().report_every.max(1);
    info!(
        "running {steps} steps with {:?} integration and {:?} gravity",
        universe.engine().integrator,
        universe.engine().gravity
    );
    info!("{}", universe.diagnostics());

    for _ in 0..steps {
        universe.step()?;
        if universe.steps_taken() % report_every == 0 {
            info!("{}", universe.diagnostics());
        }
    }

    info!("finished: {}", universe.diagnostics());
    Ok(())
}
