use crate::geom::EARTH_RADIUS;
use crate::{Position, Vector};

use super::reflect_loss::{ConstantLoss, ReflectLossModel};

/// Lambert scattering coefficient (-27 dB), typical for a sandy bottom.
pub const LAMBERT_COEFFICIENT: f64 = 0.001_995_262_314_968_879_6;

/// A reflecting or scattering interface in the ocean.
///
/// Bottom, surface and volume layers all share this interface.
pub trait Boundary: Send + Sync {
    /// Returns the boundary height (rho of the interface, m) and the unit
    /// normal pointing into the water column at the given position.
    fn height_and_normal(&self, position: &Position) -> (f64, Vector);

    /// Returns `(amplitude, phase)` per frequency: loss in dB and phase
    /// change in radians for a ray hitting the boundary at `grazing`.
    fn reflection_loss(
        &self,
        position: &Position,
        frequencies: &[f64],
        grazing: f64,
    ) -> (Vec<f64>, Vec<f64>);

    /// Linear scattering strength per frequency for energy arriving at
    /// `grazing_in` and leaving at `grazing_out`.
    ///
    /// Defaults to Lambert's law.
    fn scattering_strength(
        &self,
        _position: &Position,
        frequencies: &[f64],
        grazing_in: f64,
        grazing_out: f64,
    ) -> Vec<f64> {
        let s = LAMBERT_COEFFICIENT * grazing_in.sin().abs() * grazing_out.sin().abs();
        vec![s; frequencies.len()]
    }
}

/// Interface at a constant depth below the sea surface.
///
/// Used for flat bottoms, for the sea surface (depth zero) and for volume
/// scattering layers.
pub struct FlatBoundary {
    /// Depth of the interface (m).
    pub depth: f64,
    /// Normal returned by height queries.
    normal: Vector,
    loss: Box<dyn ReflectLossModel>,
    scattering: f64,
}

impl FlatBoundary {
    /// Creates a lossless interface at the given depth.
    pub fn new(depth: f64) -> Self {
        Self {
            depth,
            normal: Vector::radial(),
            loss: Box::new(ConstantLoss::lossless()),
            scattering: LAMBERT_COEFFICIENT,
        }
    }

    /// Flat bottom at the given depth.
    pub fn bottom(depth: f64) -> Self {
        Self::new(depth)
    }

    /// Sea surface.
    pub fn surface() -> Self {
        Self::new(0.0)
    }

    /// Replaces the reflection loss model.
    pub fn with_loss(mut self, loss: impl ReflectLossModel + 'static) -> Self {
        self.loss = Box::new(loss);
        self
    }

    /// Overrides the interface normal (e.g. to model a sloped seafloor patch).
    ///
    /// The normal is normalized; a zero vector keeps the radial normal.
    pub fn with_normal(mut self, normal: Vector) -> Self {
        self.normal = normal.normalize().unwrap_or(Vector::radial());
        self
    }

    /// Sets the Lambert scattering coefficient (linear).
    pub fn with_scattering(mut self, coefficient: f64) -> Self {
        self.scattering = coefficient;
        self
    }
}

impl Boundary for FlatBoundary {
    fn height_and_normal(&self, _position: &Position) -> (f64, Vector) {
        (EARTH_RADIUS - self.depth, self.normal)
    }

    fn reflection_loss(
        &self,
        position: &Position,
        frequencies: &[f64],
        grazing: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        self.loss.reflect_loss(position, frequencies, grazing)
    }

    fn scattering_strength(
        &self,
        _position: &Position,
        frequencies: &[f64],
        grazing_in: f64,
        grazing_out: f64,
    ) -> Vec<f64> {
        let s = self.scattering * grazing_in.sin().abs() * grazing_out.sin().abs();
        vec![s; frequencies.len()]
    }
}

/// Collection of volume scattering layers.
pub trait VolumeModel: Send + Sync {
    fn layer_count(&self) -> usize;

    /// Returns the layer at `index`, or None when it does not exist.
    fn layer(&self, index: usize) -> Option<&dyn Boundary>;
}

/// Volume made of flat layers, ordered as given.
pub struct LayeredVolume {
    layers: Vec<FlatBoundary>,
}

impl LayeredVolume {
    pub fn new(layers: Vec<FlatBoundary>) -> Self {
        Self { layers }
    }
}

impl VolumeModel for LayeredVolume {
    fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer(&self, index: usize) -> Option<&dyn Boundary> {
        self.layers.get(index).map(|l| l as &dyn Boundary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_bottom_height() {
        let bottom = FlatBoundary::bottom(1000.0);
        let (height, normal) = bottom.height_and_normal(&Position::from_depth(10.0, 1.0, 0.0));
        assert!((EARTH_RADIUS - height - 1000.0).abs() < 1e-6);
        assert_eq!(normal, Vector::radial());
    }

    #[test]
    fn test_with_normal_is_normalized() {
        let bottom = FlatBoundary::bottom(50.0).with_normal(Vector::new(1.0, 1.0, 0.0));
        let (_, normal) = bottom.height_and_normal(&Position::from_depth(10.0, 1.0, 0.0));
        assert!((normal.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_lambert_scattering() {
        let bottom = FlatBoundary::bottom(1000.0).with_scattering(0.01);
        let p = Position::from_depth(1000.0, 1.0, 0.0);
        let s = bottom.scattering_strength(&p, &[1.0, 2.0], 0.5, 0.3);
        assert_eq!(s.len(), 2);
        assert!((s[0] - 0.01 * 0.5f64.sin() * 0.3f64.sin()).abs() < 1e-15);
        // Grazing incidence scatters nothing
        let s = bottom.scattering_strength(&p, &[1.0], 0.0, 0.3);
        assert_eq!(s[0], 0.0);
    }

    #[test]
    fn test_layered_volume() {
        let volume = LayeredVolume::new(vec![FlatBoundary::new(100.0), FlatBoundary::new(300.0)]);
        assert_eq!(volume.layer_count(), 2);
        assert!(volume.layer(1).is_some());
        assert!(volume.layer(2).is_none());
    }
}
