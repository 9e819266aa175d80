use crate::{Position, Vector};

/// Sound speed as a function of position.
pub trait SoundSpeedProfile: Send + Sync {
    /// Returns the sound speed (m/s) and its gradient in the local spherical
    /// basis (1/s per meter along rho-hat, theta-hat, phi-hat).
    fn sound_speed(&self, position: &Position) -> (f64, Vector);
}

/// Isovelocity water column.
pub struct ConstantProfile {
    pub speed: f64,
}

impl ConstantProfile {
    pub fn new(speed: f64) -> Self {
        Self { speed }
    }
}

impl SoundSpeedProfile for ConstantProfile {
    fn sound_speed(&self, _position: &Position) -> (f64, Vector) {
        (self.speed, Vector::default())
    }
}

/// Sound speed varying linearly with depth: c = c0 + g * depth.
pub struct LinearProfile {
    /// Sound speed at the surface (m/s).
    pub surface_speed: f64,
    /// Change of sound speed per meter of depth (1/s).
    pub gradient: f64,
}

impl LinearProfile {
    pub fn new(surface_speed: f64, gradient: f64) -> Self {
        Self {
            surface_speed,
            gradient,
        }
    }
}

impl SoundSpeedProfile for LinearProfile {
    fn sound_speed(&self, position: &Position) -> (f64, Vector) {
        let c = self.surface_speed + self.gradient * position.depth();
        // depth grows as rho shrinks
        (c, Vector::new(-self.gradient, 0.0, 0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_profile() {
        let profile = ConstantProfile::new(1500.0);
        let (c, g) = profile.sound_speed(&Position::from_depth(300.0, 1.0, 0.0));
        assert!((c - 1500.0).abs() < 1e-10);
        assert_eq!(g, Vector::default());
    }

    #[test]
    fn test_linear_profile() {
        let profile = LinearProfile::new(1500.0, 0.017);
        let (c, g) = profile.sound_speed(&Position::from_depth(1000.0, 1.0, 0.0));
        assert!((c - 1517.0).abs() < 1e-6);
        assert!((g.rho + 0.017).abs() < 1e-12);
        assert_eq!(g.theta, 0.0);
    }
}
