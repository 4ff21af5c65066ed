//! `setInterval`-backed scheduler

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::sim::{Scheduler, SimError, TimerHandle};

/// Scheduler on top of `window.setInterval`
///
/// Every interval shares one dispatch closure; the timer handle travels as
/// the interval's argument so the dispatcher knows which timer fired.
pub struct IntervalScheduler {
    window: web_sys::Window,
    dispatch: Closure<dyn FnMut(u32)>,
    next_id: u32,
    /// Our handle -> browser interval id
    live: Vec<(TimerHandle, i32)>,
}

impl IntervalScheduler {
    /// `on_tick` receives the handle of each firing timer
    pub fn new(window: web_sys::Window, mut on_tick: impl FnMut(TimerHandle) + 'static) -> Self {
        let dispatch = Closure::<dyn FnMut(u32)>::new(move |raw: u32| {
            on_tick(TimerHandle::from_raw(raw));
        });
        Self {
            window,
            dispatch,
            next_id: 0,
            live: Vec::new(),
        }
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_periodic(&mut self, period_ms: u32) -> Result<TimerHandle, SimError> {
        self.next_id = self.next_id.wrapping_add(1);
        let handle = TimerHandle::from_raw(self.next_id);

        let id = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_1(
                self.dispatch.as_ref().unchecked_ref(),
                period_ms.min(i32::MAX as u32) as i32,
                &JsValue::from(handle.raw()),
            )
            .map_err(|e| SimError::SchedulerUnavailable(format!("setInterval: {:?}", e)))?;
        self.live.push((handle, id));
        Ok(handle)
    }

    fn cancel(&mut self, handle: TimerHandle) {
        let window = &self.window;
        self.live.retain(|&(h, id)| {
            if h == handle {
                window.clear_interval_with_handle(id);
                false
            } else {
                true
            }
        });
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, id) in self.live.drain(..) {
            self.window.clear_interval_with_handle(id);
        }
    }
}
