use crate::{Position, Vector};

use super::spreading::SpreadingModel;

/// Where a collision happened, relative to the wavefront that reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionOrigin {
    /// The ocean surface (upper) or bottom (lower).
    Primary,
    /// A volume scattering layer, by layer index.
    VolumeLayer(usize),
}

impl CollisionOrigin {
    /// Decodes a numeric collision identity.
    ///
    /// The numbering is local to this crate: `reference` itself is the
    /// primary boundary pair, and `reference + 1 + k` is volume layer `k`.
    /// There is no separate source constant and no `reference - 1` offset.
    /// Identities below `reference` are not collisions of this wavefront.
    pub fn from_id(id: usize, reference: usize) -> Option<Self> {
        match id.checked_sub(reference)? {
            0 => Some(Self::Primary),
            n => Some(Self::VolumeLayer(n - 1)),
        }
    }
}

/// Everything a boundary collision reports to a listener.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision<'f> {
    pub de: usize,
    pub az: usize,
    /// Time of the `curr` snapshot (s).
    pub time: f64,
    /// Offset from `time` to the collision (s).
    pub dt: f64,
    /// Grazing angle (rad).
    pub grazing: f64,
    /// Sound speed at the collision (m/s).
    pub speed: f64,
    pub frequencies: &'f [f64],
    pub position: Position,
    pub direction: Vector,
    /// Boundary loss per frequency (dB).
    pub boundary_loss: Vec<f64>,
    pub origin: CollisionOrigin,
}

/// Gaussian footprint of one ray on one boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigenverb {
    pub de: usize,
    pub az: usize,
    /// One-way travel time to the boundary (s).
    pub time: f64,
    /// Pulse length (s).
    pub duration: f64,
    pub grazing: f64,
    pub speed: f64,
    pub frequencies: Vec<f64>,
    pub position: Position,
    pub direction: Vector,
    /// Spreading intensity per frequency.
    pub intensity: Vec<f64>,
    /// Boundary loss per frequency (dB).
    pub loss: Vec<f64>,
    /// Footprint width along the ray's vertical plane (m).
    pub sigma_de: f64,
    /// Footprint width across it (m).
    pub sigma_az: f64,
}

impl Eigenverb {
    /// Packages a collision together with the ray's spreading at that time.
    ///
    /// The footprint is stretched along the boundary by `1 / sin(grazing)`,
    /// but never beyond the length the pulse covers on the boundary.
    pub fn new(collision: &Collision<'_>, spreading: &dyn SpreadingModel, pulse: f64) -> Self {
        let time = collision.time + collision.dt;
        let spread = spreading.spread(
            collision.de,
            collision.az,
            time,
            collision.speed,
            collision.frequencies,
        );
        let (sin_g, cos_g) = collision.grazing.sin_cos();
        let stretched = spread.sigma_de / sin_g.max(1e-6);
        let pulse_length = collision.speed * pulse / (2.0 * cos_g.max(1e-6));

        Self {
            de: collision.de,
            az: collision.az,
            time,
            duration: pulse,
            grazing: collision.grazing,
            speed: collision.speed,
            frequencies: collision.frequencies.to_vec(),
            position: collision.position,
            direction: collision.direction,
            intensity: spread.intensity,
            loss: collision.boundary_loss.clone(),
            sigma_de: stretched.min(pulse_length),
            sigma_az: spread.sigma_az,
        }
    }

    /// Linear energy of this footprint at frequency index `f`, after
    /// spreading and boundary loss.
    pub fn energy_factor(&self, f: usize) -> f64 {
        let intensity = self.intensity.get(f).copied().unwrap_or(0.0);
        let loss = self.loss.get(f).copied().unwrap_or(0.0);
        intensity * 10f64.powf(-loss / 10.0)
    }

    /// Variance-like area term of the footprint (m^2).
    pub fn area(&self) -> f64 {
        self.sigma_de * self.sigma_az
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reverb::spreading::SphericalSpreading;

    fn collision(freqs: &[f64], grazing_deg: f64) -> Collision<'_> {
        Collision {
            de: 2,
            az: 3,
            time: 1.0,
            dt: 0.004,
            grazing: grazing_deg.to_radians(),
            speed: 1500.0,
            frequencies: freqs,
            position: Position::from_depth(1000.0, 1.0, 0.0),
            direction: Vector::new(1.0, 0.0, 1.0),
            boundary_loss: vec![3.0, 10.0],
            origin: CollisionOrigin::Primary,
        }
    }

    #[test]
    fn test_origin_from_id() {
        assert_eq!(CollisionOrigin::from_id(10, 10), Some(CollisionOrigin::Primary));
        assert_eq!(
            CollisionOrigin::from_id(11, 10),
            Some(CollisionOrigin::VolumeLayer(0))
        );
        assert_eq!(
            CollisionOrigin::from_id(13, 10),
            Some(CollisionOrigin::VolumeLayer(2))
        );
        assert_eq!(CollisionOrigin::from_id(9, 10), None);
    }

    #[test]
    fn test_eigenverb_time_and_loss() {
        let freqs = [1000.0, 2000.0];
        let spreading = SphericalSpreading::new(0.01, 0.01);
        let verb = Eigenverb::new(&collision(&freqs, 30.0), &spreading, 0.1);
        assert!((verb.time - 1.004).abs() < 1e-12);
        assert_eq!(verb.duration, 0.1);
        assert_eq!((verb.de, verb.az), (2, 3));

        let intensity = 1.0 / (1500.0_f64 * 1.004).powi(2);
        assert!((verb.energy_factor(0) - intensity * 10f64.powf(-0.3)).abs() < 1e-18);
        assert!((verb.energy_factor(1) - intensity * 0.1).abs() < 1e-18);
        assert_eq!(verb.energy_factor(5), 0.0);
    }

    #[test]
    fn test_footprint_stretch_and_pulse_limit() {
        let freqs = [1000.0];
        let spreading = SphericalSpreading::new(0.01, 0.01);

        // Steep: stretch by 1/sin(30 deg) stays under the pulse footprint
        let verb = Eigenverb::new(&collision(&freqs, 30.0), &spreading, 1.0);
        let sigma = 0.5 * 1500.0 * 1.004 * 0.01;
        assert!((verb.sigma_de - 2.0 * sigma).abs() < 1e-9);
        assert!((verb.sigma_az - sigma).abs() < 1e-9);

        // Grazing: the pulse footprint takes over
        let verb = Eigenverb::new(&collision(&freqs, 0.01), &spreading, 0.001);
        let limit = 1500.0 * 0.001 / (2.0 * 0.01f64.to_radians().cos());
        assert!((verb.sigma_de - limit).abs() < 1e-9);
    }
}
