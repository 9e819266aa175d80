//! Multistep integration of the ray equations.
//!
//! Marching starts with a three-stage Runge-Kutta sequence (first-order
//! predictor, second-order corrector, third-order corrector) and continues
//! with the third-order Adams-Bashforth scheme, which needs the derivatives
//! of the three most recent snapshots.

use crate::ocean::SoundSpeedProfile;
use crate::Vector;

use super::front::WaveFront;

/// First Runge-Kutta stage: `w2 = w1 + dt f(w1)`.
pub fn rk1(dt: f64, w1: &WaveFront, profile: &dyn SoundSpeedProfile) -> WaveFront {
    combine(dt, w1, &[(1.0, w1)], profile)
}

/// Second Runge-Kutta stage: `w3 = w1 + dt/4 (f(w1) + f(w2))`.
pub fn rk2(
    dt: f64,
    w1: &WaveFront,
    w2: &WaveFront,
    profile: &dyn SoundSpeedProfile,
) -> WaveFront {
    combine(dt, w1, &[(0.25, w1), (0.25, w2)], profile)
}

/// Third Runge-Kutta stage: `w4 = w1 + dt/6 (f(w1) + f(w2) + 4 f(w3))`.
pub fn rk3(
    dt: f64,
    w1: &WaveFront,
    w2: &WaveFront,
    w3: &WaveFront,
    profile: &dyn SoundSpeedProfile,
) -> WaveFront {
    combine(
        dt,
        w1,
        &[(1.0 / 6.0, w1), (1.0 / 6.0, w2), (4.0 / 6.0, w3)],
        profile,
    )
}

/// Full third-order startup step from `start`, each stage feeding the next.
///
/// A negative `dt` integrates backward in time.
pub fn startup(dt: f64, start: &WaveFront, profile: &dyn SoundSpeedProfile) -> WaveFront {
    let stage1 = rk1(dt, start, profile);
    let stage2 = rk2(dt, start, &stage1, profile);
    rk3(dt, start, &stage1, &stage2, profile)
}

/// Third-order Adams-Bashforth step:
/// `next = curr + dt/12 (23 f(curr) - 16 f(prev) + 5 f(past))`.
///
/// Attenuation and phase are carried over from `curr`.
pub fn ab3(
    dt: f64,
    past: &WaveFront,
    prev: &WaveFront,
    curr: &WaveFront,
    profile: &dyn SoundSpeedProfile,
) -> WaveFront {
    combine(
        dt,
        curr,
        &[(23.0 / 12.0, curr), (-16.0 / 12.0, prev), (5.0 / 12.0, past)],
        profile,
    )
}

/// `base + dt * sum(coeff * f(w))` for positions, directions and distance.
fn combine(
    dt: f64,
    base: &WaveFront,
    terms: &[(f64, &WaveFront)],
    profile: &dyn SoundSpeedProfile,
) -> WaveFront {
    let mut out = base.clone();
    for ((de, az), position) in out.position.indexed_iter_mut() {
        let mut pos_rate = Vector::default();
        let mut dir_rate = Vector::default();
        let mut speed = 0.0;
        for &(coeff, w) in terms {
            debug_assert_eq!(w.position.dim(), base.position.dim());
            pos_rate = pos_rate + w.pos_gradient[[de, az]] * coeff;
            dir_rate = dir_rate + w.dir_gradient[[de, az]] * coeff;
            speed += w.sound_speed[[de, az]] * coeff;
        }
        *position = base.position[[de, az]] + pos_rate * dt;
        out.direction[[de, az]] = base.direction[[de, az]] + dir_rate * dt;
        out.distance[[de, az]] = base.distance[[de, az]] + speed * dt;
    }
    out.update(profile);
    out
}
