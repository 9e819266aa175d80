use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::ocean::{Boundary, Ocean};
use crate::reverb::{Collision, CollisionListener, CollisionOrigin};
use crate::sim::WaveConfig;
use crate::{Position, Vector};

use super::front::WaveFront;
use super::history::WaveHistory;
use super::reflection::{BoundaryHit, ReflectionModel};

/// Marches a wavefront through the ocean, reflecting rays from the bottom
/// and surface and reporting every boundary collision.
pub struct WaveQueue<'a> {
    ocean: &'a Ocean,
    reflection: ReflectionModel<'a>,
    history: WaveHistory,
    source: Position,
    de_angles: Vec<f64>,
    az_angles: Vec<f64>,
}

impl<'a> WaveQueue<'a> {
    /// Launches one ray per (D/E, AZ) pair from the configured source.
    pub fn new(ocean: &'a Ocean, config: &WaveConfig) -> Result<Self> {
        config.validate()?;
        let profile = ocean.profile();
        let source =
            Position::from_lat_lon(config.latitude, config.longitude, config.source_depth);
        let (speed, _) = profile.sound_speed(&source);

        let mut front = WaveFront::new(
            config.de_angles.len(),
            config.az_angles.len(),
            config.frequencies.len(),
        );
        for (i, de) in config.de_angles.iter().enumerate() {
            for (j, az) in config.az_angles.iter().enumerate() {
                front.position[[i, j]] = source;
                front.direction[[i, j]] = launch_direction(*de, *az) * speed;
            }
        }
        front.update(profile);

        let history = WaveHistory::new(
            front,
            config.time_step,
            config.frequencies.clone(),
            profile,
        );
        info!(
            rays = config.de_angles.len() * config.az_angles.len(),
            depth = config.source_depth,
            "wavefront launched"
        );
        Ok(Self {
            ocean,
            reflection: ReflectionModel::new(ocean).with_min_depth(config.min_depth),
            history,
            source,
            de_angles: config.de_angles.clone(),
            az_angles: config.az_angles.clone(),
        })
    }

    pub fn history(&self) -> &WaveHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut WaveHistory {
        &mut self.history
    }

    /// Time of the `curr` snapshot (s).
    pub fn time(&self) -> f64 {
        self.history.time()
    }

    pub fn source(&self) -> Position {
        self.source
    }

    pub fn de_angles(&self) -> &[f64] {
        &self.de_angles
    }

    pub fn az_angles(&self) -> &[f64] {
        &self.az_angles
    }

    /// Handles collisions between `curr` and `next`, then moves forward one
    /// time step. Returns the number of collisions reported.
    pub fn step(&mut self, listener: &mut dyn CollisionListener) -> Result<usize> {
        let collisions = self.detect_reflections(listener)?;
        self.advance();
        Ok(collisions)
    }

    /// Moves the wavefront forward one time step without collision handling.
    pub fn advance(&mut self) {
        self.history.advance(self.ocean.profile());
    }

    /// Reflects every ray whose `next` position has left the water and
    /// reports bottom, surface and volume layer collisions to `listener`.
    ///
    /// Volume layers are checked first, while `curr` and `next` still hold
    /// the path before any reflection rewrites them.
    pub fn detect_reflections(&mut self, listener: &mut dyn CollisionListener) -> Result<usize> {
        let mut count = 0;
        for de in 0..self.history.num_de() {
            for az in 0..self.history.num_az() {
                count += self.detect_volume(listener, de, az)?;
                count += self.detect_boundaries(listener, de, az)?;
            }
        }
        if count > 0 {
            debug!(time = self.time(), count, "collisions");
        }
        Ok(count)
    }

    fn detect_boundaries(
        &mut self,
        listener: &mut dyn CollisionListener,
        de: usize,
        az: usize,
    ) -> Result<usize> {
        let next = self.history.next.position[[de, az]];
        let (bottom_rho, _) = self.ocean.bottom().height_and_normal(&next);
        let (surface_rho, _) = self.ocean.surface().height_and_normal(&next);

        if next.rho < bottom_rho {
            if let Some(hit) = self.reflection.reflect_bottom(&mut self.history, de, az) {
                let collision = self.collision(de, az, &hit, CollisionOrigin::Primary);
                listener.notify_lower_collision(&collision)?;
                return Ok(1);
            }
        } else if next.rho > surface_rho {
            if let Some(hit) = self.reflection.reflect_surface(&mut self.history, de, az) {
                let collision = self.collision(de, az, &hit, CollisionOrigin::Primary);
                listener.notify_upper_collision(&collision)?;
                return Ok(1);
            }
        }
        Ok(0)
    }

    fn detect_volume(
        &self,
        listener: &mut dyn CollisionListener,
        de: usize,
        az: usize,
    ) -> Result<usize> {
        let Some(volume) = self.ocean.volume() else {
            return Ok(0);
        };
        let curr = self.history.curr.position[[de, az]];
        let next = self.history.next.position[[de, az]];
        let mut count = 0;
        for k in 0..volume.layer_count() {
            let layer: &dyn Boundary = volume
                .layer(k)
                .with_context(|| format!("volume layer {k} missing"))?;
            let (layer_rho, _) = layer.height_and_normal(&curr);
            let downward = curr.rho > layer_rho && next.rho <= layer_rho;
            let upward = curr.rho < layer_rho && next.rho >= layer_rho;
            if !(downward || upward) {
                continue;
            }
            let Some(hit) = self.reflection.volume_hit(&self.history, layer, de, az) else {
                continue;
            };
            let collision = self.collision(de, az, &hit, CollisionOrigin::VolumeLayer(k));
            if downward {
                listener.notify_lower_collision(&collision)?;
            } else {
                listener.notify_upper_collision(&collision)?;
            }
            count += 1;
        }
        Ok(count)
    }

    fn collision(
        &self,
        de: usize,
        az: usize,
        hit: &BoundaryHit,
        origin: CollisionOrigin,
    ) -> Collision<'_> {
        Collision {
            de,
            az,
            time: self.history.time(),
            dt: hit.time_water,
            grazing: hit.grazing,
            speed: hit.speed,
            frequencies: self.history.frequencies(),
            position: hit.position,
            direction: hit.direction,
            boundary_loss: hit.amplitude.clone(),
            origin,
        }
    }
}

/// Unit launch direction for a D/E angle (positive up) and an azimuth
/// (clockwise from north), both in degrees.
pub fn launch_direction(de: f64, az: f64) -> Vector {
    let (sin_de, cos_de) = de.to_radians().sin_cos();
    let (sin_az, cos_az) = az.to_radians().sin_cos();
    Vector::new(sin_de, -cos_de * cos_az, cos_de * sin_az)
}
