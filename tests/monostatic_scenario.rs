//! End-to-end monostatic reverberation in a flat-bottom ocean.

use anyhow::Result;
use eigenverb::ocean::{ConstantLoss, ConstantProfile, FlatBoundary, LayeredVolume, Ocean};
use eigenverb::reverb::{
    Collision, CollisionListener, EigenverbMonostatic, REVERB_FLOOR, SphericalSpreading,
};
use eigenverb::sim::{ReverbConfig, Simulation, SimulationConfig, WaveConfig};
use eigenverb::wave::WaveQueue;
use tempfile::tempdir;

fn lossless_ocean(depth: f64) -> Ocean {
    Ocean::new(
        ConstantProfile::new(1500.0),
        FlatBoundary::surface(),
        FlatBoundary::bottom(depth).with_loss(ConstantLoss::lossless()),
    )
}

fn fan_config() -> SimulationConfig {
    let mut config = SimulationConfig::new();
    config.wave = WaveConfig {
        de_angles: vec![-80.0, -60.0, -40.0, -20.0],
        az_angles: vec![0.0, 90.0, 180.0, 270.0],
        time_step: 0.02,
        source_depth: 100.0,
        ..WaveConfig::new()
    };
    config.reverb = ReverbConfig {
        pulse: 0.1,
        num_bins: 60,
        max_time: 3.0,
    };
    config.num_steps = 100;
    config
}

fn first_active_time(energy: &[f64], bin_width: f64) -> Option<f64> {
    energy
        .iter()
        .position(|e| *e > REVERB_FLOOR)
        .map(|i| i as f64 * bin_width)
}

#[test]
fn test_bottom_reverberation_starts_after_first_echo() -> Result<()> {
    let result = Simulation::with_ocean(fan_config(), lossless_ocean(1000.0))?.run()?;
    let curve = &result.curve;

    // Steepest ray: 900 m at 80 degrees, there and back
    let first_echo = 2.0 * 900.0 / 80f64.to_radians().sin() / 1500.0;
    let start = first_active_time(curve.energy(), curve.bin_width).expect("reverberation");
    assert!(start >= first_echo - curve.bin_width);
    assert!(start <= first_echo + curve.bin_width);
    assert!(curve.total_energy() > 0.0);
    assert!(result.eigenverbs >= 16);
    Ok(())
}

#[test]
fn test_volume_layer_adds_early_reverberation() -> Result<()> {
    let ocean = lossless_ocean(1000.0)
        .with_volume(LayeredVolume::new(vec![FlatBoundary::new(500.0)]));
    let with_layer = Simulation::with_ocean(fan_config(), ocean)?.run()?;
    let without = Simulation::with_ocean(fan_config(), lossless_ocean(1000.0))?.run()?;

    let width = with_layer.curve.bin_width;
    let early = first_active_time(with_layer.curve.energy(), width).expect("reverberation");
    let late = first_active_time(without.curve.energy(), width).expect("reverberation");
    assert!(early < late);

    // Layer crossed at 400 m below the source by the steepest ray
    let layer_echo = 2.0 * 400.0 / 80f64.to_radians().sin() / 1500.0;
    assert!((early - layer_echo).abs() <= width);
    assert!(with_layer.eigenverbs > without.eigenverbs);
    Ok(())
}

#[test]
fn test_config_file_drives_a_run() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("scenario.json");
    let mut config = fan_config();
    config.environment.bottom_depth = 800.0;
    config.write_json(&path)?;

    let loaded = SimulationConfig::load_json(&path)?;
    assert_eq!(loaded.environment.bottom_depth, 800.0);
    let result = Simulation::new(loaded)?.run()?;
    assert_eq!(result.config.environment.bottom_depth, 800.0);
    assert!(result.curve.total_energy() > 0.0);
    Ok(())
}

/// Listener that wraps the accumulator and checks every collision on the way.
struct Checked<'a> {
    inner: EigenverbMonostatic<'a>,
    collisions: usize,
}

impl CollisionListener for Checked<'_> {
    fn notify_upper_collision(&mut self, collision: &Collision<'_>) -> Result<()> {
        assert!(collision.grazing > 0.0);
        assert!((collision.direction.length() - collision.speed).abs() < 1e-6);
        self.collisions += 1;
        self.inner.notify_upper_collision(collision)
    }

    fn notify_lower_collision(&mut self, collision: &Collision<'_>) -> Result<()> {
        assert!(collision.grazing > 0.0);
        assert!((collision.direction.length() - collision.speed).abs() < 1e-6);
        self.collisions += 1;
        self.inner.notify_lower_collision(collision)
    }
}

#[test]
fn test_manual_driver_with_custom_listener() -> Result<()> {
    let ocean = lossless_ocean(1000.0);
    let config = fan_config();
    let spreading = SphericalSpreading::from_grid(&config.wave.de_angles, &config.wave.az_angles);
    let mut listener = Checked {
        inner: EigenverbMonostatic::new(&ocean, spreading, &config.reverb)?,
        collisions: 0,
    };
    let mut queue = WaveQueue::new(&ocean, &config.wave)?;
    for _ in 0..config.num_steps {
        queue.step(&mut listener)?;
    }
    assert_eq!(listener.collisions, listener.inner.num_eigenverbs());
    // one bottom bounce per ray, two for the steepest
    assert_eq!(listener.inner.bottom().len(), 20);

    listener.inner.compute_energy()?;
    assert!(listener.inner.curve().total_energy() > 0.0);
    Ok(())
}
