//! Pure simulation module
//!
//! Everything here is deterministic and free of rendering or platform
//! dependencies:
//! - Time is a frame index times a fixed step
//! - Position is a closed-form function of time
//! - Scheduling is reached only through the `Scheduler` trait

pub mod clock;
pub mod error;
pub mod kinematics;
pub mod state;

pub use clock::{AnimationClock, ManualScheduler, Scheduler, TimerHandle};
pub use error::SimError;
pub use kinematics::{
    flight_time, has_landed, position_at_frame, time_at_frame, x_position, y_position,
};
pub use state::{Controls, DerivedConstants, OverlayFlags, RunState, SimulationParameters};
