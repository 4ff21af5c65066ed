//! Simulation controller
//!
//! Owns the parameters, the constants derived from them, the frame counter and
//! the animation clock. All mutation goes through the transition methods below:
//!
//! ```text
//!   set_parameters / set_overlays / reset  ->  Idle   (frame 0 drawn)
//!   start                  Idle | Paused   ->  Running
//!   pause                        Running   ->  Paused
//!   resume                        Paused   ->  Running
//!   tick (landing)               Running   ->  Idle
//! ```

use glam::DVec2;

use crate::renderer::{Surface, render};
use crate::sim::{
    AnimationClock, Controls, DerivedConstants, ManualScheduler, OverlayFlags, RunState,
    Scheduler, SimError, SimulationParameters, TimerHandle, has_landed, position_at_frame,
    time_at_frame,
};

/// Result of delivering one clock firing
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The handle was not the live timer; nothing happened
    Stale,
    /// `frame` was drawn and the counter moved past it
    Advanced { frame: u64, position: DVec2 },
    /// `frame` was drawn at or below the baseline; the run is over
    Landed { frame: u64, position: DVec2 },
}

/// A projectile simulation session
pub struct Simulation<S: Scheduler> {
    params: SimulationParameters,
    derived: DerivedConstants,
    overlays: OverlayFlags,
    frame: u64,
    run_state: RunState,
    clock: AnimationClock<S>,
}

impl<S: Scheduler> Simulation<S> {
    /// New idle session with default parameters and overlays
    pub fn new(scheduler: S) -> Self {
        let params = SimulationParameters::default();
        Self {
            derived: DerivedConstants::from_params(&params),
            params,
            overlays: OverlayFlags::default(),
            frame: 0,
            run_state: RunState::Idle,
            clock: AnimationClock::new(scheduler),
        }
    }

    /// Session with the given parameters; nothing is drawn until `reset`
    pub fn with_params(
        params: SimulationParameters,
        overlays: OverlayFlags,
        scheduler: S,
    ) -> Result<Self, SimError> {
        params.validate()?;
        let mut sim = Self::new(scheduler);
        sim.derived = DerivedConstants::from_params(&params);
        sim.params = params;
        sim.overlays = overlays;
        Ok(sim)
    }

    /// Replace the parameters and reset. Invalid parameters leave the session untouched.
    pub fn set_parameters(
        &mut self,
        params: SimulationParameters,
        surface: &mut impl Surface,
    ) -> Result<(), SimError> {
        if let Err(e) = params.validate() {
            log::warn!("Rejected parameters {:?}: {}", params, e);
            return Err(e);
        }
        self.params = params;
        self.reset(surface);
        Ok(())
    }

    /// Replace the overlay toggles and reset
    pub fn set_overlays(&mut self, overlays: OverlayFlags, surface: &mut impl Surface) {
        self.overlays = overlays;
        self.reset(surface);
    }

    /// Back to Idle at frame 0, constants recomputed, frame 0 drawn
    pub fn reset(&mut self, surface: &mut impl Surface) -> DVec2 {
        self.derived = DerivedConstants::from_params(&self.params);
        self.clock.stop();
        self.frame = 0;
        self.set_run_state(RunState::Idle);
        self.draw(surface)
    }

    /// Start or continue the run. No-op while already running.
    ///
    /// If the host cannot schedule the clock, the run state is left as it was.
    pub fn start(&mut self) -> Result<(), SimError> {
        if self.run_state == RunState::Running {
            return Ok(());
        }
        self.clock.start(self.derived.milliseconds_per_frame)?;
        self.set_run_state(RunState::Running);
        Ok(())
    }

    /// Stop ticking, keeping the current frame. Pausing a paused run does nothing.
    pub fn pause(&mut self) -> Result<(), SimError> {
        match self.run_state {
            RunState::Running => {
                self.clock.stop();
                self.set_run_state(RunState::Paused);
                Ok(())
            }
            RunState::Paused => Ok(()),
            RunState::Idle => Err(SimError::InvalidTransition {
                op: "pause",
                state: RunState::Idle,
            }),
        }
    }

    /// Continue a paused run from its current frame
    pub fn resume(&mut self) -> Result<(), SimError> {
        match self.run_state {
            RunState::Paused => self.start(),
            RunState::Running => Ok(()),
            RunState::Idle => Err(SimError::InvalidTransition {
                op: "resume",
                state: RunState::Idle,
            }),
        }
    }

    /// Pause when running, resume when paused
    pub fn toggle_pause(&mut self) -> Result<(), SimError> {
        match self.run_state {
            RunState::Running => self.pause(),
            _ => self.resume(),
        }
    }

    /// Handle one firing of the clock.
    ///
    /// Draws the current frame, then either ends the run (landing) or
    /// advances the counter.
    pub fn tick(&mut self, handle: TimerHandle, surface: &mut impl Surface) -> TickOutcome {
        if self.run_state != RunState::Running || !self.clock.owns(handle) {
            log::trace!("Ignoring stale tick {:?}", handle);
            return TickOutcome::Stale;
        }

        let frame = self.frame;
        let position = self.draw(surface);

        if has_landed(frame, position.y) {
            self.clock.stop();
            self.frame = 0;
            self.set_run_state(RunState::Idle);
            log::info!(
                "Landed at frame {} (t = {:.3}s, x = {:.3}m)",
                frame,
                time_at_frame(frame, self.derived.milliseconds_per_frame),
                position.x - crate::consts::X_OFFSET
            );
            return TickOutcome::Landed { frame, position };
        }

        self.frame += 1;
        TickOutcome::Advanced { frame, position }
    }

    fn draw(&self, surface: &mut impl Surface) -> DVec2 {
        render(
            surface,
            self.frame,
            &self.params,
            &self.derived,
            &self.overlays,
        )
    }

    fn set_run_state(&mut self, state: RunState) {
        if self.run_state != state {
            log::debug!("{} -> {}", self.run_state.as_str(), state.as_str());
        }
        self.run_state = state;
        debug_assert_eq!(self.clock.is_running(), state == RunState::Running);
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn derived(&self) -> &DerivedConstants {
        &self.derived
    }

    pub fn overlays(&self) -> &OverlayFlags {
        &self.overlays
    }

    /// Frame that the next tick will draw
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    /// Simulated time at the current frame (s)
    pub fn time(&self) -> f64 {
        time_at_frame(self.frame, self.derived.milliseconds_per_frame)
    }

    /// Projectile position at the current frame
    pub fn position(&self) -> DVec2 {
        position_at_frame(self.frame, &self.params, &self.derived)
    }

    pub fn controls(&self) -> Controls {
        self.run_state.controls()
    }

    pub fn clock(&self) -> &AnimationClock<S> {
        &self.clock
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.clock.scheduler_mut()
    }
}

impl Simulation<ManualScheduler> {
    /// Let `ms` milliseconds pass, delivering every firing in order
    pub fn advance(&mut self, ms: u64, surface: &mut impl Surface) -> Vec<TickOutcome> {
        let deadline = self.scheduler_mut().now_ms() + ms;
        let mut outcomes = Vec::new();
        while let Some(handle) = self.scheduler_mut().fire_next(deadline) {
            outcomes.push(self.tick(handle, surface));
        }
        self.scheduler_mut().advance_to(deadline);
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{X_OFFSET, Y_OFFSET};
    use crate::renderer::RecordingSurface;

    fn sim_with(params: SimulationParameters) -> (Simulation<ManualScheduler>, RecordingSurface) {
        let mut surface = RecordingSurface::new();
        let mut sim =
            Simulation::with_params(params, OverlayFlags::default(), ManualScheduler::new())
                .unwrap();
        sim.reset(&mut surface);
        (sim, surface)
    }

    /// First frame at or below the baseline, computed straight from the kinematics
    fn expected_landing_frame(sim: &Simulation<ManualScheduler>) -> u64 {
        (1..)
            .find(|&f| position_at_frame(f, sim.params(), sim.derived()).y >= Y_OFFSET)
            .unwrap()
    }

    #[test]
    fn test_reset_draws_launch_point() {
        let params = SimulationParameters {
            initial_height: 75.0,
            ..Default::default()
        };
        let (mut sim, mut surface) = sim_with(params);

        // Move away from the start first
        sim.start().unwrap();
        sim.advance(500, &mut surface);
        assert!(sim.frame() > 0);

        let pos = sim.reset(&mut surface);
        assert_eq!(pos, DVec2::new(X_OFFSET, Y_OFFSET - 75.0));
        assert_eq!(surface.arcs(), vec![(X_OFFSET, Y_OFFSET - 75.0, params.radius)]);
        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.run_state(), RunState::Idle);
        assert!(!sim.clock().is_running());
    }

    #[test]
    fn test_no_landing_at_frame_zero() {
        let params = SimulationParameters {
            initial_height: 0.0,
            initial_velocity: 90.0,
            launch_angle_degrees: 60.0,
            gravity: 9.8,
            frame_rate: 60,
            ..Default::default()
        };
        let (mut sim, mut surface) = sim_with(params);
        assert_eq!(sim.position(), DVec2::new(X_OFFSET, Y_OFFSET));

        sim.start().unwrap();
        let outcomes = sim.advance(16, &mut surface);
        assert_eq!(
            outcomes,
            vec![TickOutcome::Advanced {
                frame: 0,
                position: DVec2::new(X_OFFSET, Y_OFFSET)
            }]
        );
        assert_eq!(sim.run_state(), RunState::Running);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_lands_on_exact_tick() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        let landing = expected_landing_frame(&sim);
        assert!(landing > 0);

        sim.start().unwrap();
        let outcomes = sim.advance(60_000, &mut surface);

        // Frames 0..=landing drawn once each, nothing after
        assert_eq!(outcomes.len() as u64, landing + 1);
        for (i, outcome) in outcomes[..outcomes.len() - 1].iter().enumerate() {
            assert!(matches!(outcome, TickOutcome::Advanced { frame, .. } if *frame == i as u64));
        }
        match outcomes.last() {
            Some(TickOutcome::Landed { frame, position }) => {
                assert_eq!(*frame, landing);
                assert!(position.y >= Y_OFFSET);
            }
            other => panic!("expected landing, got {:?}", other),
        }

        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.run_state(), RunState::Idle);
        assert_eq!(sim.scheduler_mut().live_timers(), 0);
    }

    #[test]
    fn test_landed_frame_stays_on_screen() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        let landing = expected_landing_frame(&sim);
        sim.start().unwrap();
        sim.advance(60_000, &mut surface);

        let landed = position_at_frame(landing, sim.params(), sim.derived());
        assert_eq!(surface.arcs(), vec![(landed.x, landed.y, sim.params().radius)]);
    }

    #[test]
    fn test_restart_after_landing_replays_from_zero() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.advance(60_000, &mut surface);
        assert_eq!(sim.run_state(), RunState::Idle);

        sim.start().unwrap();
        let outcomes = sim.advance(16, &mut surface);
        assert!(matches!(outcomes[..], [TickOutcome::Advanced { frame: 0, .. }]));
    }

    #[test]
    fn test_double_start_keeps_single_timer() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.start().unwrap();
        assert_eq!(sim.scheduler_mut().live_timers(), 1);

        // One tick per period, not two
        assert_eq!(sim.advance(160, &mut surface).len(), 10);
        assert_eq!(sim.frame(), 10);

        sim.pause().unwrap();
        assert!(sim.advance(1000, &mut surface).is_empty());
        assert_eq!(sim.frame(), 10);
    }

    #[test]
    fn test_overlay_change_resets_run() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        let before = *sim.derived();

        sim.start().unwrap();
        sim.advance(320, &mut surface);
        sim.pause().unwrap();
        assert_eq!(sim.frame(), 20);

        let overlays = OverlayFlags {
            show_grid: true,
            show_coordinates: true,
            ..Default::default()
        };
        sim.set_overlays(overlays, &mut surface);

        assert_eq!(sim.frame(), 0);
        assert_eq!(sim.run_state(), RunState::Idle);
        assert_eq!(*sim.derived(), before);
        assert_eq!(*sim.overlays(), overlays);
        assert!(!surface.texts().is_empty());
    }

    #[test]
    fn test_pause_while_idle_is_rejected() {
        let (mut sim, _surface) = sim_with(SimulationParameters::default());

        assert_eq!(
            sim.pause(),
            Err(SimError::InvalidTransition {
                op: "pause",
                state: RunState::Idle
            })
        );
        assert!(sim.resume().is_err());
        assert!(sim.toggle_pause().is_err());
        assert_eq!(sim.run_state(), RunState::Idle);
        assert_eq!(sim.frame(), 0);
        assert!(!sim.clock().is_running());
    }

    /// Host whose timer facility is gone
    struct UnavailableScheduler;

    impl Scheduler for UnavailableScheduler {
        fn schedule_periodic(&mut self, _period_ms: u32) -> Result<TimerHandle, SimError> {
            Err(SimError::SchedulerUnavailable("setInterval: denied".into()))
        }

        fn cancel(&mut self, _handle: TimerHandle) {}
    }

    #[test]
    fn test_start_without_scheduler_stays_idle() {
        let mut surface = RecordingSurface::new();
        let mut sim = Simulation::new(UnavailableScheduler);
        sim.reset(&mut surface);

        assert!(matches!(sim.start(), Err(SimError::SchedulerUnavailable(_))));
        assert_eq!(sim.run_state(), RunState::Idle);
        assert!(!sim.clock().is_running());
        assert!(sim.controls().start_enabled);
        assert!(sim.controls().inputs_enabled);
        assert!(sim.pause().is_err());
    }

    #[test]
    fn test_pause_resume_keeps_frame() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.advance(80, &mut surface);
        assert_eq!(sim.frame(), 5);

        sim.pause().unwrap();
        sim.pause().unwrap();
        assert_eq!(sim.run_state(), RunState::Paused);
        assert_eq!(sim.controls().pause_label, "Resume");

        sim.resume().unwrap();
        assert_eq!(sim.run_state(), RunState::Running);
        assert_eq!(sim.controls().pause_label, "Pause");
        let outcomes = sim.advance(16, &mut surface);
        assert!(matches!(outcomes[..], [TickOutcome::Advanced { frame: 5, .. }]));
    }

    #[test]
    fn test_toggle_pause_alternates() {
        let (mut sim, _surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.toggle_pause().unwrap();
        assert_eq!(sim.run_state(), RunState::Paused);
        sim.toggle_pause().unwrap();
        assert_eq!(sim.run_state(), RunState::Running);
    }

    #[test]
    fn test_stale_handle_is_ignored() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        let old = sim.scheduler_mut().advance(16)[0];
        assert!(matches!(sim.tick(old, &mut surface), TickOutcome::Advanced { .. }));

        sim.pause().unwrap();
        assert_eq!(sim.tick(old, &mut surface), TickOutcome::Stale);

        sim.resume().unwrap();
        // Still stale: resuming schedules a new timer
        assert_eq!(sim.tick(old, &mut surface), TickOutcome::Stale);
        assert_eq!(sim.frame(), 1);
    }

    #[test]
    fn test_stop_twice_is_harmless() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.pause().unwrap();
        sim.reset(&mut surface);
        sim.reset(&mut surface);
        assert_eq!(sim.run_state(), RunState::Idle);
        assert!(!sim.clock().is_running());
    }

    #[test]
    fn test_invalid_parameters_leave_session_untouched() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.advance(48, &mut surface);

        let bad = SimulationParameters {
            frame_rate: 0,
            ..Default::default()
        };
        assert_eq!(
            sim.set_parameters(bad, &mut surface),
            Err(SimError::InvalidFrameRate(0))
        );
        assert_eq!(sim.params().frame_rate, 60);
        assert_eq!(sim.run_state(), RunState::Running);
        assert_eq!(sim.frame(), 3);
    }

    #[test]
    fn test_parameter_change_uses_new_constants() {
        let (mut sim, mut surface) = sim_with(SimulationParameters::default());
        sim.start().unwrap();
        sim.advance(100, &mut surface);

        let params = SimulationParameters {
            frame_rate: 25,
            initial_height: 10.0,
            ..Default::default()
        };
        sim.set_parameters(params, &mut surface).unwrap();
        assert_eq!(sim.derived().milliseconds_per_frame, 40);
        assert_eq!(sim.run_state(), RunState::Idle);
        assert_eq!(sim.scheduler_mut().live_timers(), 0);

        sim.start().unwrap();
        assert!(sim.advance(39, &mut surface).is_empty());
        assert_eq!(sim.advance(1, &mut surface).len(), 1);
        assert!((sim.time() - 0.04).abs() < 1e-12);
    }

    #[test]
    fn test_weightless_run_never_lands() {
        let params = SimulationParameters {
            gravity: 0.0,
            ..Default::default()
        };
        let (mut sim, mut surface) = sim_with(params);
        sim.start().unwrap();
        let outcomes = sim.advance(1600, &mut surface);
        assert_eq!(outcomes.len(), 100);
        assert!(outcomes.iter().all(|o| matches!(o, TickOutcome::Advanced { .. })));
    }

    #[test]
    fn test_downward_launch_lands_on_first_step() {
        let params = SimulationParameters {
            launch_angle_degrees: -30.0,
            ..Default::default()
        };
        let (mut sim, mut surface) = sim_with(params);
        sim.start().unwrap();
        let outcomes = sim.advance(32, &mut surface);
        assert!(matches!(
            outcomes[..],
            [TickOutcome::Advanced { frame: 0, .. }, TickOutcome::Landed { frame: 1, .. }]
        ));
        assert_eq!(sim.frame(), 0);
    }
}
