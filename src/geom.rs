pub mod position;
pub mod vector;

/// Geometric precision
const EPS: f64 = 1e-13;

/// Mean radius of the earth in meters.
///
/// Positions are expressed in a spherical frame centered on the earth, so the
/// sea surface is the sphere of this radius.
pub const EARTH_RADIUS: f64 = 6_378_101.030201019;
