//! Platform abstraction layer
//!
//! Browser implementations of the simulation's host interfaces. Native
//! builds drive the deterministic `sim::ManualScheduler` instead.

#[cfg(target_arch = "wasm32")]
pub mod interval;

#[cfg(target_arch = "wasm32")]
pub use interval::IntervalScheduler;
