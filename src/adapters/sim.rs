//! Simulated collaborators for host runs.
//!
//! Scriptable stand-ins for the mesh stack, the settings subsystem, and
//! the factory-reset detector, plus `embedded-hal` fakes for the stepper
//! pins. The simulator binary composes the real control core with these;
//! the integration tests reuse them to drive startup-order and
//! identify-flow assertions.
//!
//! `SimStack` never touches the global event queue: stack-originated
//! callbacks (identify triggers) are collected in a pending list the
//! caller drains, which keeps parallel tests hermetic.

use std::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, OutputPin};
use log::debug;

use crate::app::ports::{FactoryResetPort, SettingsPort, StackPort};
use crate::error::{SettingsError, StackError};
use crate::events::{Event, NetworkSignal};

// ───────────────────────────────────────────────────────────────
// SimStack
// ───────────────────────────────────────────────────────────────

/// Scriptable mesh-stack collaborator.
pub struct SimStack {
    joined: bool,
    enabled: bool,
    identify_active: bool,
    /// Registration/lifecycle calls in arrival order, for startup-order
    /// assertions.
    pub calls: Vec<&'static str>,
    pending: Vec<Event>,
    identify_response: Result<(), StackError>,
    signal_response: Result<(), StackError>,
}

impl Default for SimStack {
    fn default() -> Self {
        Self::new()
    }
}

impl SimStack {
    pub fn new() -> Self {
        Self {
            joined: false,
            enabled: false,
            identify_active: false,
            calls: Vec::new(),
            pending: Vec::new(),
            identify_response: Ok(()),
            signal_response: Ok(()),
        }
    }

    /// Script the joined state (normally driven by commissioning).
    pub fn set_joined(&mut self, joined: bool) {
        self.joined = joined;
    }

    /// Make the next `request_identify` fail with `err`.
    pub fn fail_next_identify(&mut self, err: StackError) {
        self.identify_response = Err(err);
    }

    /// Make every `default_signal_handler` call fail with `err`.
    pub fn fail_signal_handling(&mut self, err: StackError) {
        self.signal_response = Err(err);
    }

    /// Drain the stack-originated callbacks queued since the last drain.
    pub fn take_pending(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.pending)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn identify_active(&self) -> bool {
        self.identify_active
    }
}

impl StackPort for SimStack {
    fn register_command_handler(&mut self) {
        self.calls.push("register_command_handler");
    }

    fn register_endpoint(&mut self, endpoint: u8) {
        debug!("sim stack: endpoint {endpoint} registered");
        self.calls.push("register_endpoint");
    }

    fn register_identify_handler(&mut self, _endpoint: u8) {
        self.calls.push("register_identify_handler");
    }

    fn init_scenes(&mut self) {
        self.calls.push("init_scenes");
    }

    fn enable(&mut self) {
        self.calls.push("enable");
        self.enabled = true;
    }

    fn is_joined(&self) -> bool {
        self.joined
    }

    fn request_identify(&mut self, _endpoint: u8) -> Result<(), StackError> {
        if let Err(e) = self.identify_response {
            self.identify_response = Ok(());
            return Err(e);
        }
        self.identify_active = true;
        // The stack acknowledges by invoking the identify notification.
        self.pending.push(Event::IdentifyTrigger { active: true });
        Ok(())
    }

    fn cancel_identify(&mut self) {
        self.identify_active = false;
        self.pending.push(Event::IdentifyTrigger { active: false });
    }

    fn default_signal_handler(&mut self, signal: &NetworkSignal) -> Result<(), StackError> {
        debug!("sim stack: default handling of {signal:?}");
        self.signal_response
    }
}

// ───────────────────────────────────────────────────────────────
// SimSettings
// ───────────────────────────────────────────────────────────────

/// Settings subsystem stand-in with scriptable failures.
pub struct SimSettings {
    pub init_calls: u32,
    pub load_calls: u32,
    init_response: Result<(), SettingsError>,
    load_response: Result<(), SettingsError>,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self::new()
    }
}

impl SimSettings {
    pub fn new() -> Self {
        Self {
            init_calls: 0,
            load_calls: 0,
            init_response: Ok(()),
            load_response: Ok(()),
        }
    }

    pub fn failing() -> Self {
        Self {
            init_calls: 0,
            load_calls: 0,
            init_response: Err(SettingsError::InitFailed),
            load_response: Err(SettingsError::LoadFailed),
        }
    }
}

impl SettingsPort for SimSettings {
    fn init(&mut self) -> Result<(), SettingsError> {
        self.init_calls += 1;
        self.init_response
    }

    fn load(&mut self) -> Result<(), SettingsError> {
        self.load_calls += 1;
        self.load_response
    }
}

// ───────────────────────────────────────────────────────────────
// SimFactoryReset
// ───────────────────────────────────────────────────────────────

/// Factory-reset detector stand-in.
///
/// The real collaborator owns the hold-duration threshold and its timer;
/// here a test or scenario script calls [`complete_reset`] to mark that
/// a qualifying long hold finished. `was_reset_done` then reports `true`
/// exactly once, as the real detector does for the completing release.
///
/// [`complete_reset`]: SimFactoryReset::complete_reset
pub struct SimFactoryReset {
    pub registered_mask: Option<u32>,
    pub checks: Vec<(u32, u32)>,
    reset_done: bool,
}

impl Default for SimFactoryReset {
    fn default() -> Self {
        Self::new()
    }
}

impl SimFactoryReset {
    pub fn new() -> Self {
        Self {
            registered_mask: None,
            checks: Vec::new(),
            reset_done: false,
        }
    }

    /// Mark that the long hold currently in progress completed a reset.
    pub fn complete_reset(&mut self) {
        self.reset_done = true;
    }
}

impl FactoryResetPort for SimFactoryReset {
    fn register(&mut self, button_mask: u32) {
        self.registered_mask = Some(button_mask);
    }

    fn check(&mut self, state: u32, changed: u32) {
        self.checks.push((state, changed));
    }

    fn was_reset_done(&mut self) -> bool {
        let done = self.reset_done;
        self.reset_done = false;
        done
    }
}

// ───────────────────────────────────────────────────────────────
// embedded-hal fakes for the stepper
// ───────────────────────────────────────────────────────────────

/// GPIO fake tracking the last written level.
pub struct SimPin {
    label: &'static str,
    level: bool,
}

impl SimPin {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            level: false,
        }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.level = false;
        debug!("pin {}: low", self.label);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.level = true;
        debug!("pin {}: high", self.label);
        Ok(())
    }
}

/// Delay fake that actually sleeps, so simulated traversals take
/// realistic wall time.
pub struct SimDelay;

impl DelayNs for SimDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}
