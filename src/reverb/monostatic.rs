use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::ocean::{Boundary, Ocean};
use crate::sim::ReverbConfig;

use super::curve::ReverbCurve;
use super::eigenverb::{Collision, CollisionOrigin, Eigenverb};
use super::spreading::SpreadingModel;
use super::CollisionListener;

/// Monostatic reverberation from eigenverb self-convolution.
///
/// Source and receiver share a position, so the eigenverbs collected on one
/// boundary are convolved with themselves. Collections are kept per boundary
/// (surface, bottom, and the upper and lower side of each volume layer) and
/// each is convolved with the scattering model of its own boundary.
pub struct EigenverbMonostatic<'a> {
    ocean: &'a Ocean,
    spreading: Box<dyn SpreadingModel>,
    pulse: f64,
    curve: ReverbCurve,
    surface: Vec<Eigenverb>,
    bottom: Vec<Eigenverb>,
    upper: Vec<Vec<Eigenverb>>,
    lower: Vec<Vec<Eigenverb>>,
}

impl<'a> EigenverbMonostatic<'a> {
    pub fn new(
        ocean: &'a Ocean,
        spreading: impl SpreadingModel + 'static,
        config: &ReverbConfig,
    ) -> Result<Self> {
        config.validate()?;
        let layers = ocean.layer_count();
        Ok(Self {
            ocean,
            spreading: Box::new(spreading),
            pulse: config.pulse,
            curve: ReverbCurve::new(config.num_bins, config.max_time),
            surface: Vec::new(),
            bottom: Vec::new(),
            upper: vec![Vec::new(); layers],
            lower: vec![Vec::new(); layers],
        })
    }

    pub fn pulse(&self) -> f64 {
        self.pulse
    }

    pub fn curve(&self) -> &ReverbCurve {
        &self.curve
    }

    /// Returns the curve, consuming the accumulator.
    pub fn into_curve(self) -> ReverbCurve {
        self.curve
    }

    pub fn surface(&self) -> &[Eigenverb] {
        &self.surface
    }

    pub fn bottom(&self) -> &[Eigenverb] {
        &self.bottom
    }

    /// Eigenverbs on the underside of volume layer `layer`.
    pub fn upper(&self, layer: usize) -> Option<&[Eigenverb]> {
        self.upper.get(layer).map(Vec::as_slice)
    }

    /// Eigenverbs on the top side of volume layer `layer`.
    pub fn lower(&self, layer: usize) -> Option<&[Eigenverb]> {
        self.lower.get(layer).map(Vec::as_slice)
    }

    /// Total number of eigenverbs collected so far.
    pub fn num_eigenverbs(&self) -> usize {
        self.surface.len()
            + self.bottom.len()
            + self.upper.iter().map(Vec::len).sum::<usize>()
            + self.lower.iter().map(Vec::len).sum::<usize>()
    }

    pub fn compute_bottom_energy(&mut self) {
        convolve_eigenverbs(&self.bottom, self.ocean.bottom(), &mut self.curve);
    }

    pub fn compute_surface_energy(&mut self) {
        convolve_eigenverbs(&self.surface, self.ocean.surface(), &mut self.curve);
    }

    /// Convolves the underside collection of every volume layer.
    pub fn compute_upper_volume_energy(&mut self) -> Result<()> {
        let ocean = self.ocean;
        for (k, set) in self.upper.iter().enumerate() {
            convolve_eigenverbs(set, volume_layer(ocean, k)?, &mut self.curve);
        }
        Ok(())
    }

    /// Convolves the top side collection of every volume layer.
    pub fn compute_lower_volume_energy(&mut self) -> Result<()> {
        let ocean = self.ocean;
        for (k, set) in self.lower.iter().enumerate() {
            convolve_eigenverbs(set, volume_layer(ocean, k)?, &mut self.curve);
        }
        Ok(())
    }

    /// Runs every convolution pass.
    pub fn compute_energy(&mut self) -> Result<()> {
        self.compute_bottom_energy();
        self.compute_surface_energy();
        self.compute_upper_volume_energy()?;
        self.compute_lower_volume_energy()?;
        info!(
            eigenverbs = self.num_eigenverbs(),
            energy = self.curve.total_energy(),
            "reverberation computed"
        );
        Ok(())
    }

    fn volume_set(sets: &mut [Vec<Eigenverb>], layer: usize) -> Result<&mut Vec<Eigenverb>> {
        let count = sets.len();
        sets.get_mut(layer)
            .with_context(|| format!("volume layer {layer} out of range ({count} layers)"))
    }
}

impl CollisionListener for EigenverbMonostatic<'_> {
    fn notify_upper_collision(&mut self, collision: &Collision<'_>) -> Result<()> {
        let verb = Eigenverb::new(collision, self.spreading.as_ref(), self.pulse);
        debug!(de = verb.de, az = verb.az, time = verb.time, "upper eigenverb");
        match collision.origin {
            CollisionOrigin::Primary => self.surface.push(verb),
            CollisionOrigin::VolumeLayer(k) => Self::volume_set(&mut self.upper, k)?.push(verb),
        }
        Ok(())
    }

    fn notify_lower_collision(&mut self, collision: &Collision<'_>) -> Result<()> {
        let verb = Eigenverb::new(collision, self.spreading.as_ref(), self.pulse);
        debug!(de = verb.de, az = verb.az, time = verb.time, "lower eigenverb");
        match collision.origin {
            CollisionOrigin::Primary => self.bottom.push(verb),
            CollisionOrigin::VolumeLayer(k) => Self::volume_set(&mut self.lower, k)?.push(verb),
        }
        Ok(())
    }
}

fn volume_layer(ocean: &Ocean, layer: usize) -> Result<&dyn Boundary> {
    ocean
        .volume()
        .and_then(|v| v.layer(layer))
        .with_context(|| format!("ocean has no volume layer {layer}"))
}

/// Convolves a set of eigenverbs with itself and adds the result to `curve`.
///
/// Every ordered pair is visited, including each eigenverb with itself.
/// Pairs whose two-way travel time reaches the end of the curve are skipped.
/// Rows are processed in parallel, each into its own set of bins.
pub fn convolve_eigenverbs(set: &[Eigenverb], boundary: &dyn Boundary, curve: &mut ReverbCurve) {
    let num_bins = curve.num_bins();
    let grid: &ReverbCurve = curve;
    let bins = set
        .par_iter()
        .map(|u| {
            let mut row = vec![0.0; num_bins];
            for v in set {
                let travel_time = u.time + v.time;
                if grid.max_time <= travel_time {
                    continue;
                }
                let Some(bin) = grid.bin_index(travel_time) else {
                    continue;
                };
                let energy = contribution(u, v, boundary);
                if energy.is_finite() && energy > 0.0 {
                    row[bin] += energy;
                }
            }
            row
        })
        .reduce(
            || vec![0.0; num_bins],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        );
    curve.accumulate(&bins);
}

/// Energy scattered from eigenverb `u` back along eigenverb `v`.
///
/// Product of both footprints' energies, the boundary scattering strength,
/// and the overlap integral of the two Gaussian footprints, averaged over
/// frequency.
pub fn contribution(u: &Eigenverb, v: &Eigenverb, boundary: &dyn Boundary) -> f64 {
    let num_freqs = u.frequencies.len();
    let (su, sv) = (u.area(), v.area());
    if num_freqs == 0 || su + sv <= 0.0 {
        return 0.0;
    }
    let d = u.position.distance(&v.position);
    let overlap =
        2.0 * std::f64::consts::PI * su * sv / (su + sv) * (-d * d / (2.0 * (su + sv))).exp();

    let scattering =
        boundary.scattering_strength(&u.position, &u.frequencies, u.grazing, v.grazing);
    let level: f64 = (0..num_freqs)
        .map(|f| {
            let s = scattering.get(f).copied().unwrap_or(0.0);
            u.energy_factor(f) * v.energy_factor(f) * s
        })
        .sum::<f64>()
        / num_freqs as f64;
    level * overlap
}
