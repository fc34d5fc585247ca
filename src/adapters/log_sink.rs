//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (serial console in production, stderr in the simulator).
//! A future telemetry adapter would implement the same trait.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`].
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => info!("START | controller up"),
            AppEvent::DoorCommanded { open } => {
                info!("DOOR  | {}", if *open { "open" } else { "close" });
            }
            AppEvent::AttributeRejected { cluster } => {
                info!("CMD   | rejected, cluster=0x{cluster:04x}");
            }
            AppEvent::IdentifyRequested { entering } => {
                info!(
                    "IDENT | {}",
                    if *entering { "entering" } else { "canceled" }
                );
            }
            AppEvent::FactoryResetConfirmed => info!("RESET | factory reset confirmed"),
            AppEvent::NetworkStatus { joined } => {
                info!("NET   | {}", if *joined { "joined" } else { "not joined" });
            }
        }
    }
}
