//! Outbound application events.
//!
//! The [`ControlCore`](super::service::ControlCore) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the
//! other side decide what to do with them — log to serial, feed a
//! telemetry uplink, or record them for test assertions.

/// Structured events emitted by the control core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Startup sequence completed.
    Started,

    /// A validated remote write commanded the door.
    DoorCommanded { open: bool },

    /// A remote write addressed a cluster the device does not implement.
    AttributeRejected { cluster: u16 },

    /// Identify mode was requested (entering) or canceled.
    IdentifyRequested { entering: bool },

    /// A long hold completed a factory reset; the release was consumed.
    FactoryResetConfirmed,

    /// The network joined-state changed.
    NetworkStatus { joined: bool },
}
