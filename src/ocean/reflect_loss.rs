use std::f64::consts::{LOG10_E, PI};

use num_complex::Complex64;

use crate::Position;

/// Reflection loss of a boundary as a function of frequency and grazing angle.
pub trait ReflectLossModel: Send + Sync {
    /// Returns `(amplitude, phase)` per frequency.
    ///
    /// `amplitude` is a loss in dB (positive values remove energy),
    /// `phase` is the phase change in radians.
    fn reflect_loss(
        &self,
        position: &Position,
        frequencies: &[f64],
        grazing: f64,
    ) -> (Vec<f64>, Vec<f64>);
}

/// Frequency and angle independent reflection loss.
pub struct ConstantLoss {
    pub amplitude: f64,
    pub phase: f64,
}

impl ConstantLoss {
    pub fn new(amplitude: f64, phase: f64) -> Self {
        Self { amplitude, phase }
    }

    /// Perfect reflector (0 dB, no phase change).
    pub fn lossless() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl ReflectLossModel for ConstantLoss {
    fn reflect_loss(
        &self,
        _position: &Position,
        frequencies: &[f64],
        _grazing: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        (
            vec![self.amplitude; frequencies.len()],
            vec![self.phase; frequencies.len()],
        )
    }
}

/// Rayleigh reflection coefficient of a fluid-fluid interface.
///
/// The bottom is a homogeneous fluid half-space described by its density and
/// sound speed relative to the water, and by its compressional attenuation.
pub struct RayleighLoss {
    /// Bottom density / water density.
    pub density_ratio: f64,
    /// Bottom sound speed / water sound speed.
    pub speed_ratio: f64,
    /// Compressional attenuation in dB per wavelength.
    pub attenuation: f64,
}

impl RayleighLoss {
    pub fn new(density_ratio: f64, speed_ratio: f64, attenuation: f64) -> Self {
        Self {
            density_ratio,
            speed_ratio,
            attenuation,
        }
    }

    /// Medium sand, a common bottom type for sonar studies.
    pub fn sand() -> Self {
        Self::new(1.9, 1.1, 0.8)
    }

    /// Complex reflection coefficient at a grazing angle.
    fn coefficient(&self, grazing: f64) -> Complex64 {
        // loss tangent from dB per wavelength
        let eta = self.attenuation / (40.0 * PI * LOG10_E);
        let n = Complex64::new(1.0, eta) / self.speed_ratio;
        let (sin_g, cos_g) = grazing.sin_cos();
        let root = (n * n - cos_g * cos_g).sqrt();
        let m_sin = Complex64::new(self.density_ratio * sin_g, 0.0);
        (m_sin - root) / (m_sin + root)
    }
}

impl ReflectLossModel for RayleighLoss {
    fn reflect_loss(
        &self,
        _position: &Position,
        frequencies: &[f64],
        grazing: f64,
    ) -> (Vec<f64>, Vec<f64>) {
        let r = self.coefficient(grazing);
        let amplitude = -20.0 * r.norm().max(1e-30).log10();
        let phase = r.arg();
        (
            vec![amplitude; frequencies.len()],
            vec![phase; frequencies.len()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Position {
        Position::from_depth(1000.0, 1.0, 0.0)
    }

    #[test]
    fn test_constant_loss() {
        let loss = ConstantLoss::new(3.0, 0.5);
        let (amp, phase) = loss.reflect_loss(&origin(), &[100.0, 200.0, 400.0], 0.2);
        assert_eq!(amp, vec![3.0; 3]);
        assert_eq!(phase, vec![0.5; 3]);
    }

    #[test]
    fn test_rayleigh_normal_incidence() {
        // Lossless: R = (rho2 c2 - rho1 c1) / (rho2 c2 + rho1 c1)
        let loss = RayleighLoss::new(2.0, 1.2, 0.0);
        let (amp, phase) = loss.reflect_loss(&origin(), &[1000.0], PI / 2.0);
        let r: f64 = (2.4 - 1.0) / (2.4 + 1.0);
        assert!((amp[0] + 20.0 * r.log10()).abs() < 1e-9);
        assert!(phase[0].abs() < 1e-9);
    }

    #[test]
    fn test_rayleigh_total_reflection_below_critical_angle() {
        // critical grazing angle = acos(1/1.2) ~ 33.6 deg
        let loss = RayleighLoss::new(2.0, 1.2, 0.0);
        let (amp, phase) = loss.reflect_loss(&origin(), &[1000.0], 10f64.to_radians());
        assert!(amp[0].abs() < 1e-9);
        assert!(phase[0].abs() > 0.0);
    }

    #[test]
    fn test_rayleigh_attenuation_adds_loss() {
        let lossless = RayleighLoss::new(1.9, 1.1, 0.0);
        let lossy = RayleighLoss::sand();
        let g = 10f64.to_radians();
        let (a0, _) = lossless.reflect_loss(&origin(), &[1000.0], g);
        let (a1, _) = lossy.reflect_loss(&origin(), &[1000.0], g);
        assert!(a1[0] > a0[0]);
        assert!(a1[0] > 0.0);
    }

    #[test]
    fn test_rayleigh_phase_below_critical_angle() {
        // R = (m sin g - i b) / (m sin g + i b), b = sqrt(cos^2 g - n^2)
        let loss = RayleighLoss::new(2.0, 1.2, 0.0);
        let g = 10f64.to_radians();
        let b = (g.cos().powi(2) - 1.0 / 1.44).sqrt();
        let expected = -2.0 * b.atan2(2.0 * g.sin());
        let r = loss.coefficient(g);
        assert!((r.norm() - 1.0).abs() < 1e-12);
        assert!((r.arg() - expected).abs() < 1e-12);
    }
}
