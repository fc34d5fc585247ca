//! Status LED bank.
//!
//! Three discrete indicators: run heartbeat, network-joined, identify.
//! State is tracked in memory so the host build and the tests can read
//! back what the core last commanded; a hardware build maps each `set`
//! onto its GPIO.

use crate::app::ports::{IndicatorPort, Led};

pub struct StatusLeds {
    run: bool,
    network: bool,
    identify: bool,
}

impl Default for StatusLeds {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusLeds {
    pub fn new() -> Self {
        Self {
            run: false,
            network: false,
            identify: false,
        }
    }

    /// Last commanded state of `led`.
    pub fn get(&self, led: Led) -> bool {
        match led {
            Led::Run => self.run,
            Led::Network => self.network,
            Led::Identify => self.identify,
        }
    }

    /// All indicators off (startup state).
    pub fn all_off(&mut self) {
        self.run = false;
        self.network = false;
        self.identify = false;
    }
}

impl IndicatorPort for StatusLeds {
    fn set(&mut self, led: Led, on: bool) {
        match led {
            Led::Run => self.run = on,
            Led::Network => self.network = on,
            Led::Identify => self.identify = on,
        }
    }

    fn toggle(&mut self, led: Led) {
        let next = !self.get(led);
        self.set(led, next);
    }
}
