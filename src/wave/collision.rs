use crate::{Position, Vector};

use super::history::WaveHistory;

/// Ray position, direction and sound speed at the instant of a collision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPoint {
    pub position: Position,
    pub direction: Vector,
    pub speed: f64,
}

/// Refines the state of ray `(de, az)` at `time_water` seconds after `curr`.
///
/// Uses a second-order Taylor series centered on `curr`, with derivatives
/// from central differences of `prev` and `next`. Sound speed, the three
/// position coordinates and the three direction components are expanded
/// independently.
pub fn collision_location(
    wave: &WaveHistory,
    de: usize,
    az: usize,
    time_water: f64,
) -> CollisionPoint {
    let dt = wave.time_step();
    let prev = wave.prev.state(de, az);
    let curr = wave.curr.state(de, az);
    let next = wave.next.state(de, az);
    let expand = |p: f64, c: f64, n: f64| taylor(p, c, n, dt, time_water);

    CollisionPoint {
        speed: expand(prev.sound_speed, curr.sound_speed, next.sound_speed),
        position: Position::new(
            expand(prev.position.rho, curr.position.rho, next.position.rho),
            expand(prev.position.theta, curr.position.theta, next.position.theta),
            expand(prev.position.phi, curr.position.phi, next.position.phi),
        ),
        direction: Vector::new(
            expand(prev.direction.rho, curr.direction.rho, next.direction.rho),
            expand(prev.direction.theta, curr.direction.theta, next.direction.theta),
            expand(prev.direction.phi, curr.direction.phi, next.direction.phi),
        ),
    }
}

fn taylor(prev: f64, curr: f64, next: f64, dt: f64, t: f64) -> f64 {
    let first = (next - prev) / (2.0 * dt);
    let second = (next + prev - 2.0 * curr) / (dt * dt);
    curr + first * t + 0.5 * second * t * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wave::front::WaveFront;

    fn scalar_front(rho: f64, speed: f64, dir: f64) -> WaveFront {
        let mut w = WaveFront::new(1, 1, 1);
        w.position[[0, 0]] = Position::new(rho, 1.0, 0.5);
        w.direction[[0, 0]] = Vector::new(dir, 0.0, 0.0);
        w.sound_speed[[0, 0]] = speed;
        w
    }

    #[test]
    fn test_taylor_is_exact_for_quadratics() {
        // y = 3 + 2t - 0.5 t^2 sampled at -1, 0, 1
        let y = |t: f64| 3.0 + 2.0 * t - 0.5 * t * t;
        for t in [0.0, 0.25, 0.5, 1.0, -0.3] {
            assert!((taylor(y(-1.0), y(0.0), y(1.0), 1.0, t) - y(t)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_collision_location_interpolates_all_fields() {
        let dt = 0.1;
        let rho = |t: f64| 6.0e6 - 100.0 * t - 30.0 * t * t;
        let speed = |t: f64| 1500.0 + 5.0 * t;
        let dir = |t: f64| -1000.0 + 40.0 * t * t;
        let snap = |t: f64| scalar_front(rho(t), speed(t), dir(t));
        let wave = WaveHistory::from_snapshots(
            [snap(-2.0 * dt), snap(-dt), snap(0.0), snap(dt)],
            0.0,
            dt,
            vec![1000.0],
        );

        let hit = collision_location(&wave, 0, 0, 0.04);
        assert!((hit.position.rho - rho(0.04)).abs() < 1e-6);
        assert!((hit.speed - speed(0.04)).abs() < 1e-9);
        assert!((hit.direction.rho - dir(0.04)).abs() < 1e-9);
        assert!((hit.position.theta - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_offset_returns_curr() {
        let snap = |r: f64| scalar_front(r, 1500.0, -1.0);
        let wave = WaveHistory::from_snapshots(
            [snap(4.0), snap(3.0), snap(2.0), snap(1.0)],
            0.0,
            0.1,
            vec![],
        );
        let hit = collision_location(&wave, 0, 0, 0.0);
        assert_eq!(hit.position.rho, 2.0);
        assert_eq!(hit.speed, 1500.0);
    }
}
