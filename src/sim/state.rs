//! Simulation data model
//!
//! Parameters are an immutable snapshot per run; everything the physics needs at
//! runtime is derived from them on reset.

use serde::{Deserialize, Serialize};

use super::error::SimError;
use crate::consts::*;

/// Lifecycle of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Inputs editable, no active timer
    #[default]
    Idle,
    /// Timer active, inputs locked
    Running,
    /// Timer inactive, inputs locked, frame counter retained
    Paused,
}

impl RunState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunState::Idle => "Idle",
            RunState::Running => "Running",
            RunState::Paused => "Paused",
        }
    }

    /// UI enablement for this state
    pub fn controls(&self) -> Controls {
        let idle = *self == RunState::Idle;
        Controls {
            inputs_enabled: idle,
            start_enabled: idle,
            pause_enabled: !idle,
            pause_label: if *self == RunState::Running {
                "Pause"
            } else {
                "Resume"
            },
            reset_enabled: !idle,
        }
    }
}

/// Which buttons and inputs the UI should enable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    /// Numeric fields and overlay checkboxes
    pub inputs_enabled: bool,
    pub start_enabled: bool,
    pub pause_enabled: bool,
    /// "Pause" while running, "Resume" otherwise
    pub pause_label: &'static str,
    pub reset_enabled: bool,
}

/// Launch parameters for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Launch height above the baseline (m)
    pub initial_height: f64,
    /// Launch speed (m/s)
    pub initial_velocity: f64,
    /// Launch angle above the horizontal (degrees)
    pub launch_angle_degrees: f64,
    /// Projectile radius (m)
    pub radius: f64,
    /// Animation frame rate (fps)
    pub frame_rate: u32,
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            initial_height: DEFAULT_HEIGHT,
            initial_velocity: DEFAULT_VELOCITY,
            launch_angle_degrees: DEFAULT_ANGLE_DEG,
            radius: DEFAULT_RADIUS,
            frame_rate: DEFAULT_FRAME_RATE,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

impl SimulationParameters {
    /// Check that the parameters describe a runnable simulation.
    ///
    /// Zero velocity and zero gravity are accepted; they give a degenerate
    /// but well-defined trajectory.
    pub fn validate(&self) -> Result<(), SimError> {
        non_negative("initial height", self.initial_height)?;
        non_negative("initial velocity", self.initial_velocity)?;
        non_negative("gravity", self.gravity)?;

        if !self.launch_angle_degrees.is_finite() {
            return Err(SimError::InvalidParameter {
                field: "launch angle",
                value: self.launch_angle_degrees,
            });
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(SimError::InvalidRadius(self.radius));
        }
        if self.frame_rate == 0 || self.frame_rate > MAX_FRAME_RATE {
            return Err(SimError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidParameter { field, value })
    }
}

/// Values computed once per reset from the parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedConstants {
    pub angle_radians: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    /// Period of the animation clock, also the simulated time step
    pub milliseconds_per_frame: u32,
}

impl DerivedConstants {
    pub fn from_params(params: &SimulationParameters) -> Self {
        let angle_radians = params.launch_angle_degrees.to_radians();
        Self {
            angle_radians,
            velocity_x: params.initial_velocity * angle_radians.cos(),
            velocity_y: params.initial_velocity * angle_radians.sin(),
            milliseconds_per_frame: 1000 / params.frame_rate.max(1),
        }
    }
}

/// Rendering toggles; no effect on the physics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayFlags {
    /// Trace of every position from frame 0 to the current frame
    pub show_path: bool,
    /// Full-width line through the projectile
    pub show_horizontal_line: bool,
    /// Full-height line through the projectile
    pub show_vertical_line: bool,
    /// t/x/y readout next to the projectile
    pub show_coordinates: bool,
    pub show_axes: bool,
    pub show_grid: bool,
}

impl Default for OverlayFlags {
    fn default() -> Self {
        Self {
            show_path: true,
            show_horizontal_line: false,
            show_vertical_line: false,
            show_coordinates: false,
            show_axes: true,
            show_grid: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_constants_default_params() {
        let derived = DerivedConstants::from_params(&SimulationParameters::default());
        assert!((derived.velocity_x - 45.0).abs() < 1e-9);
        assert!((derived.velocity_y - 90.0 * 3f64.sqrt() / 2.0).abs() < 1e-9);
        assert_eq!(derived.milliseconds_per_frame, 16);
    }

    #[test]
    fn test_derived_constants_floor_period() {
        let params = SimulationParameters {
            frame_rate: 7,
            ..Default::default()
        };
        assert_eq!(DerivedConstants::from_params(&params).milliseconds_per_frame, 142);
    }

    #[test]
    fn test_validate_accepts_degenerate_inputs() {
        let params = SimulationParameters {
            initial_velocity: 0.0,
            gravity: 0.0,
            launch_angle_degrees: -45.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let zero_fps = SimulationParameters {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(zero_fps.validate(), Err(SimError::InvalidFrameRate(0)));

        let too_fast = SimulationParameters {
            frame_rate: 1001,
            ..Default::default()
        };
        assert_eq!(too_fast.validate(), Err(SimError::InvalidFrameRate(1001)));

        let no_radius = SimulationParameters {
            radius: 0.0,
            ..Default::default()
        };
        assert_eq!(no_radius.validate(), Err(SimError::InvalidRadius(0.0)));

        let below_ground = SimulationParameters {
            initial_height: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            below_ground.validate(),
            Err(SimError::InvalidParameter {
                field: "initial height",
                ..
            })
        ));

        let nan_angle = SimulationParameters {
            launch_angle_degrees: f64::NAN,
            ..Default::default()
        };
        assert!(nan_angle.validate().is_err());
    }

    #[test]
    fn test_controls_follow_run_state() {
        let idle = RunState::Idle.controls();
        assert!(idle.inputs_enabled && idle.start_enabled);
        assert!(!idle.pause_enabled && !idle.reset_enabled);

        let running = RunState::Running.controls();
        assert!(!running.inputs_enabled && !running.start_enabled);
        assert!(running.pause_enabled && running.reset_enabled);
        assert_eq!(running.pause_label, "Pause");

        assert_eq!(RunState::Paused.controls().pause_label, "Resume");
    }

    #[test]
    fn test_parameters_fill_missing_fields_from_defaults() {
        let params: SimulationParameters =
            serde_json::from_str(r#"{ "initial_height": 25.0, "gravity": 1.6 }"#).unwrap();
        assert_eq!(params.initial_height, 25.0);
        assert_eq!(params.gravity, 1.6);
        assert_eq!(params.frame_rate, DEFAULT_FRAME_RATE);
    }
}
