//! Wavefront marching and boundary reflection.
//!
//! A wavefront is a grid of rays indexed by launch D/E and AZ angle. Four
//! snapshots of the grid are kept so the ray equations can be integrated
//! with a third-order Adams-Bashforth scheme. Rays that cross the bottom or
//! the surface are reflected in place and their history is rebuilt.

pub mod collision;
pub mod front;
pub mod history;
pub mod integrator;
pub mod queue;
pub mod reflection;

pub use collision::{CollisionPoint, collision_location};
pub use front::{RayState, WaveFront};
pub use history::WaveHistory;
pub use queue::{WaveQueue, launch_direction};
pub use reflection::{BoundaryHit, ReflectionModel, TOO_SHALLOW};
