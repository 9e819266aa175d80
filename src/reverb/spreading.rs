/// Intensity and beam footprint of one ray at a given travel time.
#[derive(Debug, Clone, PartialEq)]
pub struct Spreading {
    /// Linear intensity per frequency.
    pub intensity: Vec<f64>,
    /// Beam width across the D/E direction (m).
    pub sigma_de: f64,
    /// Beam width across the AZ direction (m).
    pub sigma_az: f64,
}

/// Spreading loss and beam width of the rays in a wavefront.
pub trait SpreadingModel: Send + Sync {
    fn spread(
        &self,
        de: usize,
        az: usize,
        travel_time: f64,
        speed: f64,
        frequencies: &[f64],
    ) -> Spreading;
}

/// Spherical spreading with beam widths set by the angular grid spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalSpreading {
    /// D/E spacing between neighbouring rays (rad).
    pub de_spacing: f64,
    /// AZ spacing between neighbouring rays (rad).
    pub az_spacing: f64,
}

impl SphericalSpreading {
    pub fn new(de_spacing: f64, az_spacing: f64) -> Self {
        Self {
            de_spacing,
            az_spacing,
        }
    }

    /// Uses the mean spacing of launch angles given in degrees.
    ///
    /// A grid with a single angle gets a full circle for that axis.
    pub fn from_grid(de_angles: &[f64], az_angles: &[f64]) -> Self {
        Self::new(mean_spacing(de_angles), mean_spacing(az_angles))
    }
}

impl SpreadingModel for SphericalSpreading {
    fn spread(
        &self,
        _de: usize,
        _az: usize,
        travel_time: f64,
        speed: f64,
        frequencies: &[f64],
    ) -> Spreading {
        let range = (speed * travel_time).max(1.0);
        Spreading {
            intensity: vec![1.0 / (range * range); frequencies.len()],
            sigma_de: 0.5 * range * self.de_spacing,
            sigma_az: 0.5 * range * self.az_spacing,
        }
    }
}

fn mean_spacing(angles: &[f64]) -> f64 {
    match angles {
        [] | [_] => 2.0 * std::f64::consts::PI,
        [first, .., last] => ((last - first).abs() / (angles.len() - 1) as f64).to_radians(),
    }
}
