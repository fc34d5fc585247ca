//! Monotonic clock adapter.
//!
//! Millisecond uptime for the scheduler and the blink session. On the
//! host this wraps `std::time::Instant`; a hardware build would wrap the
//! platform's high-resolution timer behind the same two methods.

pub struct MonotonicClock {
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since construction (monotonic).
    pub fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Microseconds since construction (monotonic).
    pub fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}
