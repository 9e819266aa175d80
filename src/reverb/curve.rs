/// Smallest energy a bin may hold, so the curve can always be shown in dB.
pub const REVERB_FLOOR: f64 = 1e-20;

/// Reverberation energy-time curve with fixed-width bins.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverbCurve {
    /// Two-way travel time covered by the curve (s).
    pub max_time: f64,
    /// Bin width in seconds.
    pub bin_width: f64,
    energy: Vec<f64>,
}

impl ReverbCurve {
    /// Creates a curve of `num_bins` bins spanning `[0, max_time)`, every bin
    /// starting at the floor.
    pub fn new(num_bins: usize, max_time: f64) -> Self {
        let bin_width = if num_bins > 0 {
            max_time / num_bins as f64
        } else {
            0.0
        };
        Self {
            max_time,
            bin_width,
            energy: vec![REVERB_FLOOR; num_bins],
        }
    }

    pub fn num_bins(&self) -> usize {
        self.energy.len()
    }

    /// Index of the bin holding `time`, or None outside `[0, max_time)`.
    pub fn bin_index(&self, time: f64) -> Option<usize> {
        if !(0.0..self.max_time).contains(&time) || self.energy.is_empty() {
            return None;
        }
        let bin = (time / self.bin_width) as usize;
        Some(bin.min(self.energy.len() - 1))
    }

    /// Adds energy at a given two-way travel time.
    ///
    /// Energy that is not positive and finite is ignored, so bins never
    /// decrease.
    pub fn add(&mut self, time: f64, energy: f64) {
        if !(energy.is_finite() && energy > 0.0) {
            return;
        }
        if let Some(bin) = self.bin_index(time) {
            self.energy[bin] += energy;
        }
    }

    /// Adds a full set of per-bin energies, e.g. from one convolution worker.
    pub fn accumulate(&mut self, bins: &[f64]) {
        for (b, e) in self.energy.iter_mut().zip(bins.iter()) {
            if e.is_finite() && *e > 0.0 {
                *b += e;
            }
        }
    }

    /// Energy per bin.
    pub fn energy(&self) -> &[f64] {
        &self.energy
    }

    /// Start time of each bin.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.energy.len())
            .map(|i| i as f64 * self.bin_width)
            .collect()
    }

    /// Energy per bin in dB.
    pub fn to_db(&self) -> Vec<f64> {
        self.energy.iter().map(|e| 10.0 * e.log10()).collect()
    }

    /// Total energy above the floor, summed over all bins.
    pub fn total_energy(&self) -> f64 {
        self.energy.iter().map(|e| e - REVERB_FLOOR).sum()
    }

    /// Returns every bin to the floor.
    pub fn reset(&mut self) {
        for bin in &mut self.energy {
            *bin = REVERB_FLOOR;
        }
    }
}
