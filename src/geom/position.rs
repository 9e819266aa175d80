use crate::Vector;
use crate::geom::{EARTH_RADIUS, EPS};
use std::fmt;
use std::ops::Add;

/// Position in the earth-centered spherical frame.
///
/// - `rho`: distance from the center of the earth (m)
/// - `theta`: colatitude (rad), 0 at the north pole
/// - `phi`: longitude (rad)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub rho: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Position {
    pub fn new(rho: f64, theta: f64, phi: f64) -> Self {
        Self { rho, theta, phi }
    }

    /// Creates a position at a depth below the sea surface.
    pub fn from_depth(depth: f64, theta: f64, phi: f64) -> Self {
        Self::new(EARTH_RADIUS - depth, theta, phi)
    }

    /// Creates a position from latitude/longitude in degrees and depth in meters.
    pub fn from_lat_lon(latitude: f64, longitude: f64, depth: f64) -> Self {
        Self::from_depth(
            depth,
            (90.0 - latitude).to_radians(),
            longitude.to_radians(),
        )
    }

    /// Height above the sea surface (negative under water).
    pub fn altitude(&self) -> f64 {
        self.rho - EARTH_RADIUS
    }

    /// Depth below the sea surface (positive under water).
    pub fn depth(&self) -> f64 {
        -self.altitude()
    }

    /// Cartesian coordinates (x, y, z) of this position.
    pub fn to_cartesian(&self) -> [f64; 3] {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        [self.rho * st * cp, self.rho * st * sp, self.rho * ct]
    }

    /// Straight-line (chord) distance between two positions.
    pub fn distance(&self, other: &Self) -> f64 {
        let a = self.to_cartesian();
        let b = other.to_cartesian();
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2) + (a[2] - b[2]).powi(2)).sqrt()
    }

    /// Returns true if both positions are very close to each other.
    pub fn is_close(&self, other: &Self) -> bool {
        (self.rho - other.rho).abs() < EPS * EARTH_RADIUS
            && (self.theta - other.theta).abs() < EPS
            && (self.phi - other.phi).abs() < EPS
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new(EARTH_RADIUS, std::f64::consts::FRAC_PI_2, 0.0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Position(alt={:.prec$}, theta={:.prec$}, phi={:.prec$})",
            self.altitude(),
            self.theta,
            self.phi,
            prec = prec
        )
    }
}

// Componentwise coordinate increment, used with coordinate rates times a time step.
impl Add<Vector> for Position {
    type Output = Position;
    fn add(self, other: Vector) -> Self {
        Self {
            rho: self.rho + other.rho,
            theta: self.theta + other.theta,
            phi: self.phi + other.phi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_and_altitude() {
        let p = Position::from_depth(1000.0, 1.0, 0.5);
        assert!((p.depth() - 1000.0).abs() < 1e-6);
        assert!((p.altitude() + 1000.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_lat_lon() {
        let p = Position::from_lat_lon(0.0, 90.0, 10.0);
        assert!((p.theta - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        assert!((p.phi - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_distance() {
        let a = Position::from_depth(0.0, 1.0, 0.0);
        let b = Position::from_depth(100.0, 1.0, 0.0);
        assert!((a.distance(&b) - 100.0).abs() < 1e-6);
        assert!(a.distance(&a) < 1e-9);

        // Small arc along the equator
        let c = Position::from_depth(0.0, std::f64::consts::FRAC_PI_2, 0.0);
        let d = Position::from_depth(0.0, std::f64::consts::FRAC_PI_2, 1e-4);
        assert!((c.distance(&d) - EARTH_RADIUS * 1e-4).abs() < 1e-3);
    }

    #[test]
    fn test_add_rates() {
        let p = Position::from_depth(10.0, 1.0, 2.0);
        let q = p + Vector::new(-5.0, 0.1, 0.0);
        assert!((q.depth() - 15.0).abs() < 1e-6);
        assert!((q.theta - 1.1).abs() < 1e-12);
        assert!(p.is_close(&p));
    }
}
