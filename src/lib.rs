//! Parabolic Motion - a real-time projectile simulator
//!
//! Core modules:
//! - `sim`: Pure simulation (kinematics, data model, animation clock)
//! - `controller`: Start/pause/reset state machine driving the clock and renderer
//! - `renderer`: Surface abstraction and scene drawing (canvas, SVG, recording)
//! - `platform`: Browser scheduling (`setInterval`)
//! - `settings`: Persisted parameters and overlay toggles

pub mod controller;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use controller::{Simulation, TickOutcome};
pub use settings::Settings;

/// Canvas geometry and default launch parameters
pub mod consts {
    /// Canvas dimensions (pixels, 1 px = 1 m)
    pub const CANVAS_WIDTH: f64 = 1000.0;
    pub const CANVAS_HEIGHT: f64 = 630.0;

    /// Launch point: left margin of the x axis
    pub const X_OFFSET: f64 = 30.0;
    /// Baseline (ground level) in screen space, y grows downward
    pub const Y_OFFSET: f64 = 600.0;
    /// Distance of axis tick labels from the axis line
    pub const TEXT_OFFSET: f64 = 20.0;

    /// Spacing of axis ticks and grid lines (m)
    pub const GRID_STEP: usize = 50;
    /// Length of the labelled x axis (m)
    pub const AXIS_EXTENT: usize = 900;

    /// Stroke colours
    pub const STROKE_DEFAULT: &str = "#000";
    pub const STROKE_PATH: &str = "#00f";
    pub const STROKE_GRID: &str = "#999";

    /// Default launch parameters
    pub const DEFAULT_HEIGHT: f64 = 0.0;
    pub const DEFAULT_VELOCITY: f64 = 90.0;
    pub const DEFAULT_ANGLE_DEG: f64 = 60.0;
    pub const DEFAULT_RADIUS: f64 = 10.0;
    pub const DEFAULT_FRAME_RATE: u32 = 60;
    pub const DEFAULT_GRAVITY: f64 = 9.8;

    /// Highest frame rate that still yields a non-zero integer period
    pub const MAX_FRAME_RATE: u32 = 1000;
}
