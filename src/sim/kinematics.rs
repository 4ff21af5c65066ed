//! Projectile kinematics
//!
//! Pure functions from a discrete frame index to simulated time, and from time
//! to screen-space position. Screen y grows downward, so height above the
//! baseline is subtracted from `Y_OFFSET`.

use glam::DVec2;

use super::state::{DerivedConstants, SimulationParameters};
use crate::consts::{X_OFFSET, Y_OFFSET};

/// Simulated time (seconds) at a frame index
#[inline]
pub fn time_at_frame(frame: u64, ms_per_frame: u32) -> f64 {
    frame as f64 * ms_per_frame as f64 / 1000.0
}

/// Horizontal screen position at time `t`
#[inline]
pub fn x_position(t: f64, velocity_x: f64, x_offset: f64) -> f64 {
    x_offset + velocity_x * t
}

/// Vertical screen position at time `t`
#[inline]
pub fn y_position(
    t: f64,
    initial_height: f64,
    velocity_y: f64,
    gravity: f64,
    y_offset: f64,
) -> f64 {
    y_offset - initial_height - (velocity_y * t - gravity * t * t / 2.0)
}

/// Screen position of the projectile at a frame index
pub fn position_at_frame(
    frame: u64,
    params: &SimulationParameters,
    derived: &DerivedConstants,
) -> DVec2 {
    let t = time_at_frame(frame, derived.milliseconds_per_frame);
    DVec2::new(
        x_position(t, derived.velocity_x, X_OFFSET),
        y_position(
            t,
            params.initial_height,
            derived.velocity_y,
            params.gravity,
            Y_OFFSET,
        ),
    )
}

/// Landing condition: at or below the baseline after at least one step.
///
/// Frame 0 never lands, even when the launch point sits on the baseline.
#[inline]
pub fn has_landed(frame: u64, y: f64) -> bool {
    frame > 0 && y >= Y_OFFSET
}

/// Time at which the height returns to zero, if it ever does
pub fn flight_time(params: &SimulationParameters, derived: &DerivedConstants) -> Option<f64> {
    let h = params.initial_height;
    let vy = derived.velocity_y;
    let g = params.gravity;

    if g == 0.0 {
        // Straight line: only comes down if launched downward
        return (vy < 0.0).then(|| h / -vy);
    }

    // h + vy t - g t² / 2 = 0, larger root
    let disc = vy * vy + 2.0 * g * h;
    Some((vy + disc.sqrt()) / g)
}
