//! Port traits — the boundary between the control core and its collaborators.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlCore (domain)
//! ```
//!
//! The mesh stack, persistent settings, factory-reset detector, actuator,
//! and status indicators all sit behind these traits. The
//! [`ControlCore`](super::service::ControlCore) consumes them via
//! generics, so the core never touches hardware or stack internals
//! directly and runs unchanged on the host.

use crate::error::{SettingsError, StackError};
use crate::events::NetworkSignal;
use crate::scheduler::AlarmId;

// ───────────────────────────────────────────────────────────────
// Door actuator port (domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Direction of a door traversal. The remote on/off boolean maps
/// directly onto this: on = open (forward), off = close (reverse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Open,
    Close,
}

/// Write-side port: the core commands the door actuator through this.
pub trait DoorPort {
    /// Configure outputs to the known disabled/parked state.
    fn park(&mut self);

    /// Run a full traversal in `direction`.
    ///
    /// Blocking for the whole travel duration and non-reentrant for the
    /// duration of one call. On return the driver is always disabled,
    /// whatever direction ran.
    fn run(&mut self, direction: Direction);
}

// ───────────────────────────────────────────────────────────────
// Mesh stack port (domain ↔ protocol stack)
// ───────────────────────────────────────────────────────────────

/// The protocol-stack collaborator.
///
/// The stack owns all wire-level encoding, attribute storage on the
/// network side, commissioning, and the finding-and-binding procedure.
/// The core only registers itself, gates identify requests, and forwards
/// lifecycle signals back for default handling.
pub trait StackPort {
    /// Register the core as the device-command callback.
    fn register_command_handler(&mut self);

    /// Register the device endpoint and its cluster description.
    fn register_endpoint(&mut self, endpoint: u8);

    /// Register the identify-notification callback for `endpoint`.
    fn register_identify_handler(&mut self, endpoint: u8);

    /// Initialise the scene table. Must run before settings are loaded.
    fn init_scenes(&mut self);

    /// Enable network participation (starts the stack's own thread/loop).
    fn enable(&mut self);

    /// Whether the device is currently joined to a network.
    fn is_joined(&self) -> bool;

    /// Ask the stack to put `endpoint` into identify mode (begins
    /// finding-and-binding; the stack later delivers an identify trigger).
    fn request_identify(&mut self, endpoint: u8) -> Result<(), StackError>;

    /// Cancel a live identify mode.
    fn cancel_identify(&mut self);

    /// Default network-maintenance handling every signal must receive
    /// (rejoin, channel management, ...). An `Err` here is unrecoverable.
    fn default_signal_handler(&mut self, signal: &NetworkSignal) -> Result<(), StackError>;
}

// ───────────────────────────────────────────────────────────────
// Persistent settings port
// ───────────────────────────────────────────────────────────────

/// The persistent-settings subsystem. Failures are logged, never fatal.
pub trait SettingsPort {
    fn init(&mut self) -> Result<(), SettingsError>;

    /// Load persisted settings. Must be called only after the scene
    /// table has been initialised.
    fn load(&mut self) -> Result<(), SettingsError>;
}

// ───────────────────────────────────────────────────────────────
// Factory reset collaborator
// ───────────────────────────────────────────────────────────────

/// Long-hold factory-reset detection, owned by an external collaborator
/// which also owns the hold-duration threshold.
pub trait FactoryResetPort {
    /// Register which button mask arms the detector.
    fn register(&mut self, button_mask: u32);

    /// Feed a raw button event into long-hold detection. Called for
    /// every event, independent of short-press classification.
    fn check(&mut self, state: u32, changed: u32);

    /// `true` once, on the release that completed a qualifying long hold.
    fn was_reset_done(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Status indicator port
// ───────────────────────────────────────────────────────────────

/// Named status indicators. Write-only from the core's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Led {
    /// Liveness heartbeat.
    Run,
    /// Joined-to-network state.
    Network,
    /// Identify-mode blink target.
    Identify,
}

pub trait IndicatorPort {
    fn set(&mut self, led: Led, on: bool);
    fn toggle(&mut self, led: Led);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go (serial log, a
/// telemetry uplink, a test recorder, ...).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Alarm delegate (decouples scheduler from the event system)
// ───────────────────────────────────────────────────────────────

/// Callback the scheduler invokes when an alarm fires.
///
/// The main loop implements this by pushing an
/// [`Event::Alarm`](crate::events::Event::Alarm) into the dispatch
/// queue; the scheduler itself knows nothing about events or queues.
pub trait AlarmDelegate {
    fn on_alarm_fired(&mut self, id: AlarmId);
}
