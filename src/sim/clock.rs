//! Animation clock
//!
//! Wraps a host [`Scheduler`] so that at most one periodic timer is live at a
//! time. The scheduler reports each firing by handle; the owner of the clock
//! checks [`AnimationClock::owns`] before acting on it, so a firing that was
//! already queued when the timer was cancelled is never applied.

use super::error::SimError;

/// Opaque token for a scheduled periodic timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u32);

impl TimerHandle {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Periodic scheduling primitive provided by the host
pub trait Scheduler {
    /// Begin firing every `period_ms` milliseconds until cancelled
    fn schedule_periodic(&mut self, period_ms: u32) -> Result<TimerHandle, SimError>;

    /// Stop a timer; firings after this call must not be delivered
    fn cancel(&mut self, handle: TimerHandle);
}

/// Single-timer wrapper around a [`Scheduler`]
#[derive(Debug)]
pub struct AnimationClock<S: Scheduler> {
    scheduler: S,
    active: Option<TimerHandle>,
}

impl<S: Scheduler> AnimationClock<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            active: None,
        }
    }

    /// Start ticking. No-op when already running.
    ///
    /// The clock stays stopped if the scheduler refuses the timer.
    pub fn start(&mut self, period_ms: u32) -> Result<(), SimError> {
        if self.active.is_some() {
            return Ok(());
        }
        let handle = self.scheduler.schedule_periodic(period_ms)?;
        log::debug!("Clock started: {:?} every {} ms", handle, period_ms);
        self.active = Some(handle);
        Ok(())
    }

    /// Cancel the active timer, if any
    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.scheduler.cancel(handle);
            log::debug!("Clock stopped: {:?}", handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Whether `handle` is the live timer of this clock
    pub fn owns(&self, handle: TimerHandle) -> bool {
        self.active == Some(handle)
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

impl<S: Scheduler> Drop for AnimationClock<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone)]
struct ManualTimer {
    handle: TimerHandle,
    period_ms: u64,
    next_due_ms: u64,
}

/// Deterministic scheduler advanced by hand
///
/// Used by tests and the native headless runner. Like `setInterval`, a timer
/// first fires one full period after it is scheduled.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u32,
    timers: Vec<ManualTimer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current scheduler time (ms)
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers that have not been cancelled
    pub fn live_timers(&self) -> usize {
        self.timers.len()
    }

    /// Fire the earliest timer due at or before `deadline_ms`.
    ///
    /// Time moves forward to the firing; ties go to the older timer. Returns
    /// `None` once nothing is due, leaving time untouched.
    pub fn fire_next(&mut self, deadline_ms: u64) -> Option<TimerHandle> {
        let timer = self
            .timers
            .iter_mut()
            .filter(|t| t.next_due_ms <= deadline_ms)
            .min_by_key(|t| (t.next_due_ms, t.handle.raw()))?;

        self.now_ms = self.now_ms.max(timer.next_due_ms);
        timer.next_due_ms += timer.period_ms;
        Some(timer.handle)
    }

    /// Move time forward to `ms` without firing anything
    pub fn advance_to(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Fire everything due within the next `ms` milliseconds
    pub fn advance(&mut self, ms: u64) -> Vec<TimerHandle> {
        let deadline = self.now_ms + ms;
        let mut fired = Vec::new();
        while let Some(handle) = self.fire_next(deadline) {
            fired.push(handle);
        }
        self.advance_to(deadline);
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_periodic(&mut self, period_ms: u32) -> Result<TimerHandle, SimError> {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        // A zero period would never let time advance
        let period_ms = u64::from(period_ms.max(1));
        self.timers.push(ManualTimer {
            handle,
            period_ms,
            next_due_ms: self.now_ms + period_ms,
        });
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.timers.retain(|t| t.handle != handle);
    }
}
