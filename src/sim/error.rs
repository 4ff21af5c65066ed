use thiserror::Error;

use super::state::RunState;

/// Errors raised by parameter validation and lifecycle transitions
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("{field} must be a finite, non-negative number, got {value}")]
    InvalidParameter { field: &'static str, value: f64 },

    #[error("radius must be a positive number, got {0}")]
    InvalidRadius(f64),

    #[error("frame rate must be between 1 and 1000 fps, got {0}")]
    InvalidFrameRate(u32),

    #[error("cannot {op} a simulation that is {}", .state.as_str())]
    InvalidTransition { op: &'static str, state: RunState },

    #[error("scheduling unavailable: {0}")]
    SchedulerUnavailable(String),
}
