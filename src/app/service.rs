//! Control core — the composition root and event dispatcher.
//!
//! [`ControlCore`] owns the device attribute set, the button classifier,
//! and the identify blink session. It exposes one ordered startup routine
//! and one dispatch entry point; every collaborator is reached through a
//! port trait, making the whole core testable with mock adapters.
//!
//! ```text
//!  Event Queue ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                  │        ControlCore        │
//!     StackPort ◀──│ attrs · button · identify │──▶ DoorPort
//!                  └──────────────────────────┘ ──▶ IndicatorPort
//! ```
//!
//! Handlers run to completion one at a time on the dispatch queue, so at
//! most one door traversal is ever in progress and the attribute set
//! needs no lock. A door command blocks the queue for the full traversal;
//! events arriving meanwhile are processed afterwards in arrival order.

use log::{debug, error, info, warn};

use crate::config::DoorConfig;
use crate::drivers::button::{ButtonClassifier, ButtonEvent};
use crate::error::{Error, Result, StackError};
use crate::events::{Event, NetworkSignal};
use crate::identify::IdentifyBlinker;
use crate::scheduler::{AlarmId, AlarmScheduler};
use crate::zcl::attrs::DeviceAttributes;
use crate::zcl::{CommandStatus, ATTR_ON_OFF_ON_OFF, CLUSTER_ON_OFF, IDENTIFY_TIME_DEFAULT};

use super::events::AppEvent;
use super::ports::{
    Direction, DoorPort, EventSink, FactoryResetPort, IndicatorPort, Led, SettingsPort, StackPort,
};

/// Bitmask of the button that toggles identify mode (and, held long
/// enough, factory-resets the device).
pub const IDENTIFY_BUTTON_MASK: u32 = 1 << 3;

// ───────────────────────────────────────────────────────────────
// Collaborator bundle
// ───────────────────────────────────────────────────────────────

/// Everything the dispatcher talks to, borrowed for one call.
pub struct Peripherals<'a, D, St, R, L, Si> {
    pub door: &'a mut D,
    pub stack: &'a mut St,
    pub reset: &'a mut R,
    pub leds: &'a mut L,
    pub sched: &'a mut AlarmScheduler,
    pub sink: &'a mut Si,
}

// ───────────────────────────────────────────────────────────────
// ControlCore
// ───────────────────────────────────────────────────────────────

/// The control core fuses the three event sources onto the actuator and
/// the identify session.
pub struct ControlCore {
    config: DoorConfig,
    attrs: DeviceAttributes,
    button: ButtonClassifier,
    blinker: IdentifyBlinker,
}

impl ControlCore {
    pub fn new(config: DoorConfig) -> Self {
        let attrs = DeviceAttributes::new(&config);
        let blinker = IdentifyBlinker::new(config.identify_blink_interval_ms);
        Self {
            config,
            attrs,
            button: ButtonClassifier::new(IDENTIFY_BUTTON_MASK),
            blinker,
        }
    }

    // ── Startup ───────────────────────────────────────────────

    /// Run the ordered startup sequence.
    ///
    /// Each step's failure is logged but non-fatal; the order is part of
    /// the contract (settings load must follow scene-table init so scene
    /// entries deserialize into an initialised table).
    pub fn initialize(
        &mut self,
        door: &mut impl DoorPort,
        stack: &mut impl StackPort,
        settings: &mut impl SettingsPort,
        reset: &mut impl FactoryResetPort,
        leds: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        info!("starting coop door controller");

        // 1. Input/status peripherals to a known state.
        leds.set(Led::Run, false);
        leds.set(Led::Network, false);
        leds.set(Led::Identify, false);

        // 2. Persistent settings backend.
        if let Err(e) = settings.init() {
            error!("settings initialization failed: {e}");
        }

        // 3. Long-hold factory reset detection.
        reset.register(IDENTIFY_BUTTON_MASK);

        // 4-5. Register with the stack: command callback, then the
        // endpoint/cluster description.
        stack.register_command_handler();
        stack.register_endpoint(self.config.endpoint);

        // 6. Attribute defaults.
        self.attrs = DeviceAttributes::new(&self.config);

        // 7. Identify notifications for our endpoint.
        stack.register_identify_handler(self.config.endpoint);

        // 8. Scene table, then 9. persisted settings — strictly in this
        // order.
        stack.init_scenes();
        if let Err(e) = settings.load() {
            error!("settings loading failed: {e}");
        }

        // 10. Join the network.
        stack.enable();

        // 11. Actuator to the parked/disabled state.
        door.park();

        sink.emit(&AppEvent::Started);
        info!("coop door controller started");
    }

    // ── Dispatch ──────────────────────────────────────────────

    /// Route one queued event to its handler.
    ///
    /// Only a stack-internal error escapes as `Err`; it is unrecoverable
    /// and must terminate the process. Everything else is consumed here.
    pub fn dispatch<D, St, R, L, Si>(
        &mut self,
        event: Event,
        now_ms: u64,
        p: &mut Peripherals<'_, D, St, R, L, Si>,
    ) -> Result<()>
    where
        D: DoorPort,
        St: StackPort,
        R: FactoryResetPort,
        L: IndicatorPort,
        Si: EventSink,
    {
        match event {
            Event::AttributeWrite {
                cluster,
                attr,
                value,
            } => {
                let status = self.handle_attribute_set(cluster, attr, value, p.door, p.sink);
                debug!("attribute write status: {status:?}");
                Ok(())
            }
            Event::ButtonChanged { state, changed } => {
                self.on_button_changed(state, changed, p.stack, p.reset, p.sink)
            }
            Event::NetworkSignal(signal) => {
                self.on_network_signal(signal, p.stack, p.leds, p.sink)
            }
            Event::IdentifyTrigger { active } => {
                self.on_identify_trigger(active, now_ms, p.sched, p.leds);
                Ok(())
            }
            Event::Alarm(AlarmId::IdentifyBlink) => {
                self.blinker.on_tick(p.leds);
                Ok(())
            }
            Event::Alarm(AlarmId::Heartbeat) => {
                p.leds.toggle(Led::Run);
                Ok(())
            }
        }
    }

    // ── Attribute command handler ─────────────────────────────

    /// Handle a remote "set attribute" request.
    ///
    /// The on/off cluster is the only one the door implements: the value
    /// is committed write-through to the attribute mirror and handed to
    /// the actuator as a direction selector. Every other cluster is an
    /// explicit `NotImplemented` back to the remote caller, with the
    /// attribute set untouched.
    pub fn handle_attribute_set(
        &mut self,
        cluster: u16,
        attr: u16,
        value: u8,
        door: &mut impl DoorPort,
        sink: &mut impl EventSink,
    ) -> CommandStatus {
        if cluster == CLUSTER_ON_OFF {
            info!("on/off attribute setting to {value}");
            if attr == ATTR_ON_OFF_ON_OFF {
                let on = value != 0;
                self.attrs.on_off = on;
                sink.emit(&AppEvent::DoorCommanded { open: on });
                // Blocking for the full traversal; the queue serializes
                // any command arriving meanwhile behind this one.
                door.run(if on { Direction::Open } else { Direction::Close });
            }
            CommandStatus::Ok
        } else {
            info!("unhandled cluster attribute id: {cluster}");
            sink.emit(&AppEvent::AttributeRejected { cluster });
            CommandStatus::NotImplemented
        }
    }

    // ── Button classifier ─────────────────────────────────────

    /// Handle a raw button event: classify the episode and act on the
    /// resulting intent.
    pub fn on_button_changed(
        &mut self,
        state: u32,
        changed: u32,
        stack: &mut impl StackPort,
        reset: &mut impl FactoryResetPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        match self.button.on_changed(state, changed, reset) {
            Some(ButtonEvent::ShortPress) => self.request_identify_toggle(stack, sink),
            Some(ButtonEvent::FactoryResetCompleted) => {
                debug!("after factory reset - ignore button release");
                sink.emit(&AppEvent::FactoryResetConfirmed);
                Ok(())
            }
            None => Ok(()),
        }
    }

    // ── Network signal handler ────────────────────────────────

    /// Handle a stack lifecycle signal: mirror the joined state onto the
    /// network LED, then hand the signal to the stack's default handler.
    /// A default-handler failure is a protocol-layer error and fatal.
    pub fn on_network_signal(
        &mut self,
        signal: NetworkSignal,
        stack: &mut impl StackPort,
        leds: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if let Some(joined) = signal.joined() {
            leds.set(Led::Network, joined);
            sink.emit(&AppEvent::NetworkStatus { joined });
        }

        stack.default_signal_handler(&signal).map_err(|e| {
            error!("default signal handler failed: {e}");
            Error::Stack(e)
        })?;

        // The transient signal buffer is owned by the event and released
        // here, unconditionally, when `signal` drops.
        Ok(())
    }

    // ── Identify mode ─────────────────────────────────────────

    /// Request identify mode start or cancel, gated on the mirrored
    /// identify-time attribute.
    ///
    /// Entering delegates to the stack's finding-and-binding procedure;
    /// the stack later delivers the identify trigger that actually
    /// starts the blink session.
    pub fn request_identify_toggle(
        &mut self,
        stack: &mut impl StackPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        if !stack.is_joined() {
            warn!("device not in a network - cannot enter identify mode");
            return Ok(());
        }

        if self.attrs.identify_time == IDENTIFY_TIME_DEFAULT {
            match stack.request_identify(self.config.endpoint) {
                Ok(()) => {
                    info!("enter identify mode");
                    sink.emit(&AppEvent::IdentifyRequested { entering: true });
                }
                Err(StackError::InvalidState) => {
                    warn!("invalid state - cannot enter identify mode");
                }
                Err(e @ StackError::Internal(_)) => {
                    error!("identify request failed: {e}");
                    return Err(e.into());
                }
            }
        } else {
            info!("cancel identify mode");
            stack.cancel_identify();
            sink.emit(&AppEvent::IdentifyRequested { entering: false });
        }
        Ok(())
    }

    /// Handle the stack's identify notification: start or stop the blink
    /// session and keep the identify-time mirror consistent with it.
    pub fn on_identify_trigger(
        &mut self,
        active: bool,
        now_ms: u64,
        sched: &mut AlarmScheduler,
        leds: &mut impl IndicatorPort,
    ) {
        if active {
            if self.blinker.start(sched, now_ms) {
                self.attrs.identify_time = self.config.identify_time_secs;
            }
        } else {
            self.blinker.stop(sched, leds);
            self.attrs.identify_time = IDENTIFY_TIME_DEFAULT;
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The remote-visible attribute mirror.
    pub fn attributes(&self) -> &DeviceAttributes {
        &self.attrs
    }

    /// Whether an identify blink session is live.
    pub fn is_identifying(&self) -> bool {
        self.blinker.is_blinking()
    }

    /// The live configuration.
    pub fn config(&self) -> &DoorConfig {
        &self.config
    }
}
