//! Identify blink state machine.
//!
//! While a device is being commissioned, identify mode makes it visibly
//! blink so an installer can pick it out. The session is the only
//! cancelable operation in the system:
//!
//! ```text
//!          start(sched)                stop(sched, leds)
//!   Idle ───────────────▶ Blinking ───────────────────▶ Idle
//!    ▲                      │  ▲
//!    └── stop() is a no-op  └──┘ on_tick: toggle LED
//! ```
//!
//! `Blinking` carries only the alarm handle — the token threaded through
//! every reschedule. Stopping cancels the alarm and forces the identify
//! LED off; starting while already blinking leaves the live session
//! untouched (no double-scheduling).

use log::warn;

use crate::app::ports::{IndicatorPort, Led};
use crate::scheduler::{AlarmHandle, AlarmId, AlarmScheduler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlinkState {
    Idle,
    Blinking { handle: AlarmHandle },
}

pub struct IdentifyBlinker {
    state: BlinkState,
    interval_ms: u32,
    /// Toggles since the session started (diagnostics only).
    toggles: u32,
    led_on: bool,
}

impl IdentifyBlinker {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            state: BlinkState::Idle,
            interval_ms,
            toggles: 0,
            led_on: false,
        }
    }

    /// Begin a blink session. Valid only from `Idle`: when already
    /// blinking the existing session keeps running unchanged and this
    /// returns `false`. Also `false` if no alarm slot was free.
    pub fn start(&mut self, sched: &mut AlarmScheduler, now_ms: u64) -> bool {
        if matches!(self.state, BlinkState::Blinking { .. }) {
            return false;
        }

        match sched.schedule_repeating(AlarmId::IdentifyBlink, self.interval_ms, now_ms) {
            Some(handle) => {
                self.state = BlinkState::Blinking { handle };
                self.toggles = 0;
                self.led_on = false;
                true
            }
            None => {
                warn!("identify: no alarm slot free, blink not started");
                false
            }
        }
    }

    /// End the session: cancel the pending alarm and force the identify
    /// LED off. Calling from `Idle` is a no-op, not an error.
    pub fn stop(&mut self, sched: &mut AlarmScheduler, leds: &mut impl IndicatorPort) {
        if let BlinkState::Blinking { handle } = self.state {
            sched.cancel(handle);
            leds.set(Led::Identify, false);
            self.led_on = false;
            self.state = BlinkState::Idle;
        }
    }

    /// Handle one blink alarm fire: flip the identify LED.
    pub fn on_tick(&mut self, leds: &mut impl IndicatorPort) {
        if matches!(self.state, BlinkState::Blinking { .. }) {
            self.led_on = !self.led_on;
            leds.set(Led::Identify, self.led_on);
            self.toggles = self.toggles.wrapping_add(1);
        }
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.state, BlinkState::Blinking { .. })
    }

    pub fn toggle_count(&self) -> u32 {
        self.toggles
    }
}
