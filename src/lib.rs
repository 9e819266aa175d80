pub mod geom;
pub mod ocean;
pub mod reverb;
pub mod sim;
pub mod wave;

// Prelude
pub use geom::position::Position;
pub use geom::vector::Vector;
