use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

use crate::ocean::{
    ConstantProfile, FlatBoundary, LAMBERT_COEFFICIENT, LayeredVolume, LinearProfile, Ocean,
    RayleighLoss,
};
use crate::wave::TOO_SHALLOW;

/// Wavefront launch and marching parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Integration time step (s).
    pub time_step: f64,
    /// Frequencies tracked by every ray (Hz).
    pub frequencies: Vec<f64>,
    /// Source latitude (deg).
    pub latitude: f64,
    /// Source longitude (deg).
    pub longitude: f64,
    /// Source depth (m).
    pub source_depth: f64,
    /// Launch depression/elevation angles (deg, positive up).
    pub de_angles: Vec<f64>,
    /// Launch azimuths (deg, clockwise from north).
    pub az_angles: Vec<f64>,
    /// Water depth below which the bottom is treated as flat (m).
    pub min_depth: f64,
}

impl WaveConfig {
    pub fn new() -> Self {
        Self {
            time_step: 0.01,
            frequencies: vec![3000.0],
            latitude: 45.0,
            longitude: -45.0,
            source_depth: 100.0,
            de_angles: linspace(-80.0, 80.0, 17),
            az_angles: linspace(0.0, 330.0, 12),
            min_depth: TOO_SHALLOW,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.time_step > 0.0, "time step must be positive, got {}", self.time_step);
        ensure!(!self.frequencies.is_empty(), "at least one frequency is required");
        ensure!(
            self.frequencies.iter().all(|f| *f > 0.0),
            "frequencies must be positive"
        );
        ensure!(!self.de_angles.is_empty(), "at least one D/E angle is required");
        ensure!(!self.az_angles.is_empty(), "at least one AZ angle is required");
        ensure!(
            self.de_angles.iter().all(|de| de.abs() < 90.0),
            "D/E angles must lie strictly between -90 and 90 degrees"
        );
        ensure!(
            self.latitude.abs() < 90.0,
            "latitude must lie strictly between -90 and 90 degrees"
        );
        ensure!(self.source_depth >= 0.0, "source must be in the water");
        ensure!(self.min_depth >= 0.0, "minimum depth cannot be negative");
        Ok(())
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reverberation curve parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbConfig {
    /// Transmitted pulse length (s).
    pub pulse: f64,
    /// Number of time bins in the curve.
    pub num_bins: usize,
    /// Two-way travel time covered by the curve (s).
    pub max_time: f64,
}

impl ReverbConfig {
    pub fn new() -> Self {
        Self {
            pulse: 0.1,
            num_bins: 400,
            max_time: 4.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.pulse > 0.0, "pulse length must be positive, got {}", self.pulse);
        ensure!(self.num_bins > 0, "reverberation curve needs at least one bin");
        ensure!(
            self.max_time > 0.0,
            "max time must be positive, got {}",
            self.max_time
        );
        Ok(())
    }
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Ocean environment: sound speed, flat Rayleigh bottom and volume layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Sound speed at the surface (m/s).
    pub sound_speed: f64,
    /// Sound speed gradient with depth (1/s). Zero gives isovelocity water.
    pub gradient: f64,
    /// Bottom depth (m).
    pub bottom_depth: f64,
    /// Sediment to water density ratio.
    pub density_ratio: f64,
    /// Sediment to water sound speed ratio.
    pub speed_ratio: f64,
    /// Sediment attenuation (dB per wavelength).
    pub attenuation: f64,
    /// Lambert coefficient of the bottom (linear).
    pub bottom_scattering: f64,
    /// Lambert coefficient of the surface (linear).
    pub surface_scattering: f64,
    /// Depths of the volume scattering layers (m).
    pub volume_layers: Vec<f64>,
    /// Lambert coefficient shared by all volume layers (linear).
    pub volume_scattering: f64,
}

impl EnvironmentConfig {
    pub fn new() -> Self {
        Self {
            sound_speed: 1500.0,
            gradient: 0.0,
            bottom_depth: 1000.0,
            density_ratio: 1.9,
            speed_ratio: 1.1,
            attenuation: 0.8,
            bottom_scattering: LAMBERT_COEFFICIENT,
            surface_scattering: LAMBERT_COEFFICIENT,
            volume_layers: Vec::new(),
            volume_scattering: 1e-4,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.sound_speed > 0.0, "sound speed must be positive");
        ensure!(self.bottom_depth > 0.0, "bottom depth must be positive");
        ensure!(
            self.density_ratio > 0.0 && self.speed_ratio > 0.0,
            "sediment ratios must be positive"
        );
        ensure!(self.attenuation >= 0.0, "sediment attenuation cannot be negative");
        for depth in &self.volume_layers {
            ensure!(
                *depth > 0.0 && *depth < self.bottom_depth,
                "volume layer at {depth} m is not between the surface and the bottom"
            );
        }
        Ok(())
    }

    /// Builds the ocean described by this configuration.
    pub fn build_ocean(&self) -> Ocean {
        let surface = FlatBoundary::surface().with_scattering(self.surface_scattering);
        let bottom = FlatBoundary::bottom(self.bottom_depth)
            .with_loss(RayleighLoss::new(
                self.density_ratio,
                self.speed_ratio,
                self.attenuation,
            ))
            .with_scattering(self.bottom_scattering);

        let ocean = if self.gradient == 0.0 {
            Ocean::new(ConstantProfile::new(self.sound_speed), surface, bottom)
        } else {
            Ocean::new(
                LinearProfile::new(self.sound_speed, self.gradient),
                surface,
                bottom,
            )
        };

        if self.volume_layers.is_empty() {
            return ocean;
        }
        let layers = self
            .volume_layers
            .iter()
            .map(|depth| FlatBoundary::new(*depth).with_scattering(self.volume_scattering))
            .collect();
        ocean.with_volume(LayeredVolume::new(layers))
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete description of a monostatic reverberation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub wave: WaveConfig,
    pub reverb: ReverbConfig,
    pub environment: EnvironmentConfig,
    /// Number of wavefront time steps.
    pub num_steps: usize,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            wave: WaveConfig::new(),
            reverb: ReverbConfig::new(),
            environment: EnvironmentConfig::new(),
            num_steps: 200,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.wave.validate().context("invalid wave configuration")?;
        self.reverb.validate().context("invalid reverberation configuration")?;
        self.environment
            .validate()
            .context("invalid environment configuration")?;
        ensure!(self.num_steps > 0, "at least one time step is required");
        ensure!(
            self.wave.source_depth < self.environment.bottom_depth,
            "source at {} m is below the bottom at {} m",
            self.wave.source_depth,
            self.environment.bottom_depth
        );
        Ok(())
    }

    /// Reads and validates a configuration from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn load_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration to a JSON file.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .with_context(|| format!("Failed to create config: {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)
            .with_context(|| format!("Failed to write config: {}", path.display()))
    }

    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse config from string")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize config to string")
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// `n` evenly spaced values from `first` to `last` inclusive.
fn linspace(first: f64, last: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (n - 1) as f64;
            (0..n).map(|i| first + step * i as f64).collect()
        }
    }
}
