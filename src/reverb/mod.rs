//! Reverberation from boundary collisions.
//!
//! Each collision reported by the wavefront becomes an eigenverb, a Gaussian
//! footprint of the ray on the boundary. Monostatic reverberation is the
//! overlap of every footprint with every other footprint on the same
//! boundary, binned by two-way travel time.

pub mod curve;
pub mod eigenverb;
pub mod monostatic;
pub mod spreading;

use anyhow::Result;

pub use curve::{REVERB_FLOOR, ReverbCurve};
pub use eigenverb::{Collision, CollisionOrigin, Eigenverb};
pub use monostatic::EigenverbMonostatic;
pub use spreading::{SphericalSpreading, Spreading, SpreadingModel};

/// Receives boundary collisions from a marching wavefront.
///
/// Upper collisions are hits from below (the surface, or a volume layer
/// crossed upward). Lower collisions are hits from above (the bottom, or a
/// volume layer crossed downward).
pub trait CollisionListener {
    fn notify_upper_collision(&mut self, collision: &Collision<'_>) -> Result<()>;
    fn notify_lower_collision(&mut self, collision: &Collision<'_>) -> Result<()>;
}

/// Listener that discards every collision.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoListener;

impl CollisionListener for NoListener {
    fn notify_upper_collision(&mut self, _collision: &Collision<'_>) -> Result<()> {
        Ok(())
    }

    fn notify_lower_collision(&mut self, _collision: &Collision<'_>) -> Result<()> {
        Ok(())
    }
}
