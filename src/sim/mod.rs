mod config;
mod simulation;

pub use config::{EnvironmentConfig, ReverbConfig, SimulationConfig, WaveConfig};
pub use simulation::{Simulation, SimulationProgress, SimulationResult};
