use std::path::Path;

use anyhow::Result;
use eigenverb::sim::{Simulation, SimulationConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional JSON config as the only argument
    let config = match std::env::args().nth(1) {
        Some(path) => SimulationConfig::load_json(Path::new(&path))?,
        None => SimulationConfig::default(),
    };
    info!(
        bottom_depth = config.environment.bottom_depth,
        max_time = config.reverb.max_time,
        "starting monostatic reverberation"
    );

    let result = Simulation::new(config)?.run_with_progress(50, |p| {
        info!(
            step = p.steps_done,
            of = p.num_steps,
            time = p.sim_time_s,
            collisions = p.collisions,
            "progress"
        );
    })?;

    println!("# time (s)\tlevel (dB)");
    for (time, level) in result.curve.time_axis().iter().zip(result.curve.to_db()) {
        println!("{time:.3}\t{level:.2}");
    }
    info!(
        eigenverbs = result.eigenverbs,
        total_energy = result.curve.total_energy(),
        "done"
    );
    Ok(())
}
