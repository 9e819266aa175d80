use ndarray::{Array2, Array3};

use crate::ocean::SoundSpeedProfile;
use crate::{Position, Vector};

/// Kinematic state of a single ray at one instant.
///
/// This is everything a snapshot stores per cell except attenuation and
/// phase, which stay with the cell when the state is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RayState {
    pub position: Position,
    /// Time derivative of the position coordinates.
    pub pos_gradient: Vector,
    /// Unit propagation direction times the local sound speed.
    pub direction: Vector,
    /// Time derivative of `direction`.
    pub dir_gradient: Vector,
    pub sound_gradient: Vector,
    pub sound_speed: f64,
    /// Path length travelled since launch (m).
    pub distance: f64,
}

/// Snapshot of the full ray grid at one instant, indexed by `[[de, az]]`.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveFront {
    pub position: Array2<Position>,
    pub pos_gradient: Array2<Vector>,
    pub direction: Array2<Vector>,
    pub dir_gradient: Array2<Vector>,
    pub sound_gradient: Array2<Vector>,
    pub sound_speed: Array2<f64>,
    pub distance: Array2<f64>,
    /// Accumulated loss in dB, indexed by `[[de, az, frequency]]`.
    pub attenuation: Array3<f64>,
    /// Accumulated phase in radians, indexed by `[[de, az, frequency]]`.
    pub phase: Array3<f64>,
}

impl WaveFront {
    /// Creates a grid of `num_de` x `num_az` rays tracking `num_frequencies`.
    pub fn new(num_de: usize, num_az: usize, num_frequencies: usize) -> Self {
        let shape = (num_de, num_az);
        Self {
            position: Array2::from_elem(shape, Position::default()),
            pos_gradient: Array2::default(shape),
            direction: Array2::default(shape),
            dir_gradient: Array2::default(shape),
            sound_gradient: Array2::default(shape),
            sound_speed: Array2::zeros(shape),
            distance: Array2::zeros(shape),
            attenuation: Array3::zeros((num_de, num_az, num_frequencies)),
            phase: Array3::zeros((num_de, num_az, num_frequencies)),
        }
    }

    pub fn num_de(&self) -> usize {
        self.position.nrows()
    }

    pub fn num_az(&self) -> usize {
        self.position.ncols()
    }

    pub fn num_frequencies(&self) -> usize {
        self.attenuation.shape()[2]
    }

    /// Recomputes sound speed, its gradient, and the ray-equation derivatives
    /// of every cell from the current positions and directions.
    pub fn update(&mut self, profile: &dyn SoundSpeedProfile) {
        for ((de, az), position) in self.position.indexed_iter() {
            let (c, gradient) = profile.sound_speed(position);
            let (pos_rate, dir_rate) =
                ray_derivatives(position, self.direction[[de, az]], c, gradient);
            self.sound_speed[[de, az]] = c;
            self.sound_gradient[[de, az]] = gradient;
            self.pos_gradient[[de, az]] = pos_rate;
            self.dir_gradient[[de, az]] = dir_rate;
        }
    }

    /// Kinematic state of one cell.
    pub fn state(&self, de: usize, az: usize) -> RayState {
        RayState {
            position: self.position[[de, az]],
            pos_gradient: self.pos_gradient[[de, az]],
            direction: self.direction[[de, az]],
            dir_gradient: self.dir_gradient[[de, az]],
            sound_gradient: self.sound_gradient[[de, az]],
            sound_speed: self.sound_speed[[de, az]],
            distance: self.distance[[de, az]],
        }
    }

    /// Overwrites the kinematic state of one cell, leaving attenuation and
    /// phase untouched.
    pub fn set_state(&mut self, de: usize, az: usize, state: &RayState) {
        self.position[[de, az]] = state.position;
        self.pos_gradient[[de, az]] = state.pos_gradient;
        self.direction[[de, az]] = state.direction;
        self.dir_gradient[[de, az]] = state.dir_gradient;
        self.sound_gradient[[de, az]] = state.sound_gradient;
        self.sound_speed[[de, az]] = state.sound_speed;
        self.distance[[de, az]] = state.distance;
    }

    /// Adds reflection loss (dB) and phase (rad) to one cell, per frequency.
    ///
    /// `phase_shift` is added to every frequency on top of `phase`.
    pub fn add_loss(
        &mut self,
        de: usize,
        az: usize,
        amplitude: &[f64],
        phase: &[f64],
        phase_shift: f64,
    ) {
        for f in 0..self.num_frequencies() {
            self.attenuation[[de, az, f]] += amplitude.get(f).copied().unwrap_or(0.0);
            self.phase[[de, az, f]] += phase.get(f).copied().unwrap_or(0.0) + phase_shift;
        }
    }
}

/// Right-hand side of the ray equations in the earth-centered spherical frame.
///
/// The ray velocity `velocity` has magnitude `speed`. Returns the coordinate
/// rates (d rho/dt, d theta/dt, d phi/dt) and the time derivative of the
/// velocity components in the local basis.
pub fn ray_derivatives(
    position: &Position,
    velocity: Vector,
    speed: f64,
    gradient: Vector,
) -> (Vector, Vector) {
    let rho = position.rho;
    let (sin_t, cos_t) = position.theta.sin_cos();
    let cot_t = cos_t / sin_t;
    let v = velocity;

    let pos_rate = Vector::new(v.rho, v.theta / rho, v.phi / (rho * sin_t));

    // Cartesian refraction term: dv/dt = 2 (g.v) v / c - c g
    let accel = v * (2.0 * gradient.dot(v) / speed) - gradient * speed;

    // Rotation of the local basis along the path
    let dir_rate = Vector::new(
        accel.rho + (v.theta * v.theta + v.phi * v.phi) / rho,
        accel.theta - (v.rho * v.theta - v.phi * v.phi * cot_t) / rho,
        accel.phi - v.phi * (v.rho + v.theta * cot_t) / rho,
    );
    (pos_rate, dir_rate)
}
