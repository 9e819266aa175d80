use crate::ocean::SoundSpeedProfile;

use super::front::WaveFront;
use super::integrator::{ab3, startup};

/// The four most recent wavefront snapshots, spaced by a fixed time step.
///
/// `past`, `prev`, `curr` and `next` sit at `time - 2 dt`, `time - dt`,
/// `time` and `time + dt`. This is the minimum history the Adams-Bashforth
/// integrator needs.
#[derive(Debug, Clone)]
pub struct WaveHistory {
    pub past: WaveFront,
    pub prev: WaveFront,
    pub curr: WaveFront,
    pub next: WaveFront,
    time_step: f64,
    time: f64,
    frequencies: Vec<f64>,
}

impl WaveHistory {
    /// Builds a consistent history around `curr` at time zero.
    ///
    /// `prev` and `past` are obtained by integrating backward with the
    /// Runge-Kutta startup sequence, `next` with one Adams-Bashforth step.
    pub fn new(
        curr: WaveFront,
        time_step: f64,
        frequencies: Vec<f64>,
        profile: &dyn SoundSpeedProfile,
    ) -> Self {
        let prev = startup(-time_step, &curr, profile);
        let past = startup(-time_step, &prev, profile);
        let next = ab3(time_step, &past, &prev, &curr, profile);
        Self {
            past,
            prev,
            curr,
            next,
            time_step,
            time: 0.0,
            frequencies,
        }
    }

    /// Wraps four existing snapshots.
    pub fn from_snapshots(
        snapshots: [WaveFront; 4],
        time: f64,
        time_step: f64,
        frequencies: Vec<f64>,
    ) -> Self {
        let [past, prev, curr, next] = snapshots;
        Self {
            past,
            prev,
            curr,
            next,
            time_step,
            time,
            frequencies,
        }
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Time of the `curr` snapshot.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn num_de(&self) -> usize {
        self.curr.num_de()
    }

    pub fn num_az(&self) -> usize {
        self.curr.num_az()
    }

    /// Retires `past` and admits a new `next`, moving time forward one step.
    pub fn rotate(&mut self, next: WaveFront) {
        let retired = std::mem::replace(&mut self.next, next);
        let retired = std::mem::replace(&mut self.curr, retired);
        let retired = std::mem::replace(&mut self.prev, retired);
        self.past = retired;
        self.time += self.time_step;
    }

    /// Marches the whole grid forward by one time step.
    pub fn advance(&mut self, profile: &dyn SoundSpeedProfile) {
        let next = ab3(self.time_step, &self.prev, &self.curr, &self.next, profile);
        self.rotate(next);
    }
}
