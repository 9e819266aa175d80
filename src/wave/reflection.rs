use std::f64::consts::PI;

use tracing::{debug, warn};

use crate::geom::EARTH_RADIUS;
use crate::ocean::{Boundary, Ocean};
use crate::{Position, Vector};

use super::collision::collision_location;
use super::front::WaveFront;
use super::history::WaveHistory;
use super::integrator::{ab3, startup};

/// Water depth below which the bottom is treated as horizontal.
pub const TOO_SHALLOW: f64 = 300.0;

/// Outcome of a ray striking a boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryHit {
    /// Time after `curr` at which the ray meets the boundary (s).
    pub time_water: f64,
    /// Grazing angle (rad), always positive.
    pub grazing: f64,
    /// Sound speed at the collision (m/s).
    pub speed: f64,
    pub position: Position,
    /// Direction just before the collision.
    pub incident: Vector,
    /// Direction just after the collision, with length `speed`.
    pub direction: Vector,
    /// Boundary loss per frequency (dB).
    pub amplitude: Vec<f64>,
    /// Boundary phase change per frequency (rad).
    pub phase: Vec<f64>,
}

/// Reflects individual rays from the ocean bottom and surface and rebuilds
/// their integration history.
pub struct ReflectionModel<'a> {
    ocean: &'a Ocean,
    min_depth: f64,
}

impl<'a> ReflectionModel<'a> {
    pub fn new(ocean: &'a Ocean) -> Self {
        Self {
            ocean,
            min_depth: TOO_SHALLOW,
        }
    }

    /// Sets the water depth below which the bottom is flattened.
    pub fn with_min_depth(mut self, min_depth: f64) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Reflects ray `(de, az)` from the bottom.
    ///
    /// Returns false on a near miss, in which case nothing is modified.
    pub fn bottom_reflection(&self, wave: &mut WaveHistory, de: usize, az: usize) -> bool {
        self.reflect_bottom(wave, de, az).is_some()
    }

    /// Reflects ray `(de, az)` from the surface.
    ///
    /// Returns false on a near miss, in which case nothing is modified.
    pub fn surface_reflection(&self, wave: &mut WaveHistory, de: usize, az: usize) -> bool {
        self.reflect_surface(wave, de, az).is_some()
    }

    /// Bottom reflection returning the details of the collision.
    ///
    /// The ray is expected to be above the bottom in `curr` and below it in
    /// `next`. Reflection loss is added to `next`, the reflected direction
    /// is `R = I - 2 (n.I) n`, and all four snapshots of the cell are rebuilt.
    pub fn reflect_bottom(
        &self,
        wave: &mut WaveHistory,
        de: usize,
        az: usize,
    ) -> Option<BoundaryHit> {
        let boundary = self.ocean.bottom();
        let dt = wave.time_step();
        let position = wave.curr.position[[de, az]];
        let direction = wave.curr.direction[[de, az]];

        // height_water > 0 when curr is still in the water
        let (bottom_rho, normal) = boundary.height_and_normal(&position);
        let normal = self.flatten_if_shallow(bottom_rho, normal);
        let height_water = position.rho - bottom_rho;

        let mut time_water = 0.0;
        if height_water > 0.0 {
            let dot_full = normal.dot(direction);
            if dot_full >= 0.0 {
                debug!(de, az, "near miss of the bottom");
                return None;
            }
            let dot_water = -height_water * normal.rho;
            time_water = (dot_water / dot_full).clamp(0.0, dt);
        }

        // Precise values at the point of collision; skipping this causes
        // grazing angle errors in strongly refracting water.
        let hit = collision_location(wave, de, az, time_water);
        let (bottom_rho, normal) = boundary.height_and_normal(&hit.position);
        let normal = self.flatten_if_shallow(bottom_rho, normal);
        let dot_full = normal.dot(hit.direction);
        if dot_full >= 0.0 {
            debug!(de, az, "near miss of the bottom after refinement");
            return None;
        }
        let grazing = (-dot_full / hit.speed).min(1.0).asin();

        let (amplitude, phase) =
            boundary.reflection_loss(&hit.position, wave.frequencies(), grazing);
        wave.next.add_loss(de, az, &amplitude, &phase, 0.0);

        let reflected = hit.direction - normal * (2.0 * dot_full);
        let reflected = reflected.with_length(hit.speed).unwrap_or(reflected);
        debug!(
            de,
            az,
            grazing_deg = grazing.to_degrees(),
            time_water,
            "bottom reflection"
        );

        self.reflection_reinit(wave, de, az, time_water, hit.position, reflected);
        Some(BoundaryHit {
            time_water,
            grazing,
            speed: hit.speed,
            position: hit.position,
            incident: hit.direction,
            direction: reflected,
            amplitude,
            phase,
        })
    }

    /// Surface reflection returning the details of the collision.
    ///
    /// The surface normal is always radial, so the reflection simply negates
    /// the radial direction component. The phase receives an extra pi shift.
    pub fn reflect_surface(
        &self,
        wave: &mut WaveHistory,
        de: usize,
        az: usize,
    ) -> Option<BoundaryHit> {
        let boundary = self.ocean.surface();
        let position = wave.curr.position[[de, az]];
        let direction = wave.curr.direction[[de, az]];

        let (surface_rho, _) = boundary.height_and_normal(&position);
        let altitude = position.rho - surface_rho;
        let time_water = if direction.rho == 0.0 {
            0.0
        } else {
            -altitude / direction.rho
        };

        let grazing = direction.rho.atan2(direction.horizontal());
        if grazing <= 0.0 {
            debug!(de, az, "near miss of the surface");
            return None;
        }

        let hit = collision_location(wave, de, az, time_water);
        let (amplitude, phase) =
            boundary.reflection_loss(&hit.position, wave.frequencies(), grazing);
        wave.next.add_loss(de, az, &amplitude, &phase, -PI);

        let mut reflected = hit.direction;
        reflected.rho = -reflected.rho;
        let reflected = reflected.with_length(hit.speed).unwrap_or(reflected);
        debug!(
            de,
            az,
            grazing_deg = grazing.to_degrees(),
            time_water,
            "surface reflection"
        );

        self.reflection_reinit(wave, de, az, time_water, hit.position, reflected);
        Some(BoundaryHit {
            time_water,
            grazing,
            speed: hit.speed,
            position: hit.position,
            incident: hit.direction,
            direction: reflected,
            amplitude,
            phase,
        })
    }

    /// Crossing of a volume layer by ray `(de, az)` between `curr` and `next`.
    ///
    /// Volume layers scatter energy but do not redirect the ray, so the
    /// history is left untouched. Returns None when the ray runs parallel
    /// to the layer.
    pub fn volume_hit(
        &self,
        wave: &WaveHistory,
        layer: &dyn Boundary,
        de: usize,
        az: usize,
    ) -> Option<BoundaryHit> {
        let dt = wave.time_step();
        let position = wave.curr.position[[de, az]];
        let direction = wave.curr.direction[[de, az]];

        let (layer_rho, normal) = layer.height_and_normal(&position);
        let dot_full = normal.dot(direction);
        if dot_full == 0.0 {
            return None;
        }
        let height = position.rho - layer_rho;
        let time_water = (-height * normal.rho / dot_full).clamp(0.0, dt);

        let hit = collision_location(wave, de, az, time_water);
        let (_, normal) = layer.height_and_normal(&hit.position);
        let grazing = (normal.dot(hit.direction).abs() / hit.speed).min(1.0).asin();
        if grazing <= 0.0 {
            return None;
        }
        let (amplitude, phase) = layer.reflection_loss(&hit.position, wave.frequencies(), grazing);
        Some(BoundaryHit {
            time_water,
            grazing,
            speed: hit.speed,
            position: hit.position,
            incident: hit.direction,
            direction: hit.direction,
            amplitude,
            phase,
        })
    }

    /// Rebuilds the four snapshots of cell `(de, az)` after a reflection.
    ///
    /// The reflected state at `time_water` past `curr` is integrated back to
    /// the time of `curr` with the Runge-Kutta startup sequence, then back
    /// one step for `prev` and another for `past`. `next` comes from an
    /// Adams-Bashforth step, exactly as when the wavefront was launched.
    /// Attenuation and phase of the cell are left alone.
    pub fn reflection_reinit(
        &self,
        wave: &mut WaveHistory,
        de: usize,
        az: usize,
        time_water: f64,
        position: Position,
        direction: Vector,
    ) {
        let profile = self.ocean.profile();
        let dt = wave.time_step();

        let mut start = WaveFront::new(1, 1, wave.frequencies().len());
        start.position[[0, 0]] = position;
        start.direction[[0, 0]] = direction;
        start.update(profile);
        start.distance[[0, 0]] =
            wave.curr.distance[[de, az]] + start.sound_speed[[0, 0]] * time_water;

        let curr = startup(-time_water, &start, profile);
        let prev = startup(-dt, &curr, profile);
        let past = startup(-dt, &prev, profile);
        let next = ab3(dt, &past, &prev, &curr, profile);

        wave.past.set_state(de, az, &past.state(0, 0));
        wave.prev.set_state(de, az, &prev.state(0, 0));
        wave.curr.set_state(de, az, &curr.state(0, 0));
        wave.next.set_state(de, az, &next.state(0, 0));
    }

    /// Replaces the bottom normal with the radial unit vector in very
    /// shallow water, so rays are not reflected onto land.
    fn flatten_if_shallow(&self, bottom_rho: f64, normal: Vector) -> Vector {
        let depth = EARTH_RADIUS - bottom_rho;
        if depth < self.min_depth {
            warn!(
                depth,
                min_depth = self.min_depth,
                "bottom too shallow, treating it as flat"
            );
            Vector::radial()
        } else {
            normal
        }
    }
}
