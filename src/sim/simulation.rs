use anyhow::Result;
use tracing::info;

use crate::ocean::Ocean;
use crate::reverb::{EigenverbMonostatic, ReverbCurve, SphericalSpreading};
use crate::wave::WaveQueue;

use super::config::SimulationConfig;

#[derive(Debug, Clone, Copy)]
pub struct SimulationProgress {
    /// Number of completed steps (0..=num_steps).
    pub steps_done: usize,
    pub num_steps: usize,
    /// Wavefront time (s).
    pub sim_time_s: f64,
    /// Collisions reported so far.
    pub collisions: usize,
}

/// Result of a monostatic reverberation run.
pub struct SimulationResult {
    /// Reverberation energy per time bin.
    pub curve: ReverbCurve,
    /// Boundary collisions reported by the wavefront.
    pub collisions: usize,
    /// Eigenverbs collected over all boundaries.
    pub eigenverbs: usize,
    /// Configuration used for this simulation
    pub config: SimulationConfig,
}

/// Monostatic reverberation run: marches the wavefront, collects
/// eigenverbs, and convolves them into a reverberation curve.
pub struct Simulation {
    config: SimulationConfig,
    ocean: Ocean,
}

/// Receives progress while the wavefront is marched.
trait ProgressReporter {
    /// True when progress after `steps_done` of `num_steps` should be reported.
    fn is_due(&self, steps_done: usize, num_steps: usize) -> bool;
    fn report(&mut self, progress: &SimulationProgress);
}

struct NoProgress;
impl ProgressReporter for NoProgress {
    fn is_due(&self, _steps_done: usize, _num_steps: usize) -> bool {
        false
    }
    fn report(&mut self, _progress: &SimulationProgress) {}
}

/// Calls a closure at the start, every `every_steps` steps and at the end.
struct FnProgress<F> {
    every_steps: usize,
    f: F,
}
impl<F> ProgressReporter for FnProgress<F>
where
    F: FnMut(&SimulationProgress),
{
    fn is_due(&self, steps_done: usize, num_steps: usize) -> bool {
        self.every_steps > 0
            && (steps_done.is_multiple_of(self.every_steps) || steps_done == num_steps)
    }
    fn report(&mut self, progress: &SimulationProgress) {
        (self.f)(progress);
    }
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let ocean = config.environment.build_ocean();
        Ok(Self { config, ocean })
    }

    /// Runs with a caller-supplied ocean instead of the configured one.
    pub fn with_ocean(config: SimulationConfig, ocean: Ocean) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, ocean })
    }

    pub fn ocean(&self) -> &Ocean {
        &self.ocean
    }

    pub fn run(self) -> Result<SimulationResult> {
        self.run_inner(NoProgress)
    }

    /// Runs the simulation while periodically reporting progress.
    ///
    /// `every_steps=0` disables progress reporting. Otherwise the reporter is
    /// called once at launch (`steps_done=0`), every `every_steps`, and once
    /// at the end.
    pub fn run_with_progress<F>(self, every_steps: usize, report: F) -> Result<SimulationResult>
    where
        F: FnMut(&SimulationProgress),
    {
        self.run_inner(FnProgress {
            every_steps,
            f: report,
        })
    }

    fn run_inner<R: ProgressReporter>(self, mut reporter: R) -> Result<SimulationResult> {
        let num_steps = self.config.num_steps;
        let wave = &self.config.wave;
        let spreading = SphericalSpreading::from_grid(&wave.de_angles, &wave.az_angles);
        let mut reverb = EigenverbMonostatic::new(&self.ocean, spreading, &self.config.reverb)?;
        let mut queue = WaveQueue::new(&self.ocean, wave)?;

        let mut collisions = 0;
        for steps_done in 0..=num_steps {
            if steps_done > 0 {
                collisions += queue.step(&mut reverb)?;
            }
            if reporter.is_due(steps_done, num_steps) {
                reporter.report(&SimulationProgress {
                    steps_done,
                    num_steps,
                    sim_time_s: queue.time(),
                    collisions,
                });
            }
        }
        info!(
            steps = num_steps,
            time = queue.time(),
            collisions,
            "wavefront finished"
        );

        reverb.compute_energy()?;
        let eigenverbs = reverb.num_eigenverbs();
        let curve = reverb.into_curve();
        Ok(SimulationResult {
            curve,
            collisions,
            eigenverbs,
            config: self.config,
        })
    }
}
