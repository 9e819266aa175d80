use crate::geom::EPS;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Vector expressed in the local spherical basis (rho-hat, theta-hat, phi-hat)
/// of the position it is attached to.
///
/// The same type also carries coordinate rates (d rho/dt, d theta/dt, d phi/dt)
/// when used as a position derivative.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub rho: f64,
    pub theta: f64,
    pub phi: f64,
}

impl Vector {
    pub fn new(rho: f64, theta: f64, phi: f64) -> Self {
        Self { rho, theta, phi }
    }

    /// Unit vector pointing away from the center of the earth.
    pub fn radial() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// Dot product between 2 vectors.
    pub fn dot(self, other: Self) -> f64 {
        self.rho * other.rho + self.theta * other.theta + self.phi * other.phi
    }

    /// Returns the length of the vector.
    pub fn length(&self) -> f64 {
        (self.rho.powi(2) + self.theta.powi(2) + self.phi.powi(2)).sqrt()
    }

    /// Length of the tangential (theta, phi) part.
    pub fn horizontal(&self) -> f64 {
        self.theta.hypot(self.phi)
    }

    pub fn is_close(&self, other: &Self) -> bool {
        (self.rho - other.rho).abs() < EPS
            && (self.theta - other.theta).abs() < EPS
            && (self.phi - other.phi).abs() < EPS
    }

    /// Normalizes the vector (divides by its length) and returns a copy.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPS {
            None
        } else {
            Some(*self * (1.0 / len))
        }
    }

    /// Rescales the vector to the given length.
    ///
    /// Returns None for a zero-length vector.
    pub fn with_length(&self, length: f64) -> Option<Self> {
        self.normalize().map(|unit| unit * length)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = f.precision().unwrap_or(2); // Default 2 decimals
        write!(
            f,
            "Vector({:.prec$}, {:.prec$}, {:.prec$})",
            self.rho,
            self.theta,
            self.phi,
            prec = prec
        )
    }
}

// Implement +
impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            rho: self.rho + other.rho,
            theta: self.theta + other.theta,
            phi: self.phi + other.phi,
        }
    }
}

// Implement -
impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self {
            rho: self.rho - other.rho,
            theta: self.theta - other.theta,
            phi: self.phi - other.phi,
        }
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

// Implement *
impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, other: f64) -> Self {
        Self {
            rho: self.rho * other,
            theta: self.theta * other,
            phi: self.phi * other,
        }
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;
    fn mul(self, other: Vector) -> Vector {
        other * self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_and_length() {
        let a = Vector::new(3., 4., 0.);
        let b = Vector::new(1., 0., 2.);
        assert_eq!(a.dot(b), 3.);
        assert_eq!(a.length(), 5.);
        assert_eq!(a.horizontal(), 4.);
    }

    #[test]
    fn test_normalize() {
        let v = Vector::new(9., 0., 0.);
        let vnorm = v.normalize();
        assert!(vnorm.is_some());
        assert_eq!(vnorm.unwrap(), Vector::radial());
        // Zero-length vector
        let v = Vector::new(0., 0., 0.);
        assert!(v.normalize().is_none());
    }

    #[test]
    fn test_with_length() {
        let v = Vector::new(1., 1., 1.).with_length(1500.).unwrap();
        assert!((v.length() - 1500.).abs() < 1e-9);
        assert!((v.rho - v.phi).abs() < 1e-9);
    }

    #[test]
    fn test_ops() {
        let a = Vector::new(1., 2., 3.);
        let b = Vector::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Vector::new(1.5, 2.5, 3.5));
        assert_eq!(a - b, Vector::new(0.5, 1.5, 2.5));
        assert_eq!(2.0 * a, a * 2.0);
        assert_eq!(-a, Vector::new(-1., -2., -3.));
    }
}
