//! Shared test rig for the control-core integration tests.
//!
//! Records every actuator call so tests can assert on the full command
//! history without real GPIO, and bundles the sim collaborators with the
//! core so each test drives the same composition the simulator binary
//! uses.

use coopdoor::adapters::sim::{SimFactoryReset, SimSettings, SimStack};
use coopdoor::app::events::AppEvent;
use coopdoor::app::ports::{Direction, DoorPort, EventSink};
use coopdoor::app::service::{ControlCore, Peripherals};
use coopdoor::config::DoorConfig;
use coopdoor::drivers::status_led::StatusLeds;
use coopdoor::events::Event;
use coopdoor::scheduler::AlarmScheduler;

// ── Door call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorCall {
    Park,
    RunStart(Direction),
    RunEnd(Direction),
}

/// DoorPort mock that records traversal begin/end markers, so tests can
/// verify that no second run ever starts before the previous returned.
pub struct RecordingDoor {
    pub calls: Vec<DoorCall>,
    in_run: bool,
    pub overlap_violations: u32,
}

#[allow(dead_code)]
impl RecordingDoor {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            in_run: false,
            overlap_violations: 0,
        }
    }

    /// Completed traversals, in order.
    pub fn runs(&self) -> Vec<Direction> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DoorCall::RunEnd(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    pub fn last_run(&self) -> Option<Direction> {
        self.runs().last().copied()
    }
}

impl DoorPort for RecordingDoor {
    fn park(&mut self) {
        self.calls.push(DoorCall::Park);
    }

    fn run(&mut self, direction: Direction) {
        if self.in_run {
            self.overlap_violations += 1;
        }
        self.in_run = true;
        self.calls.push(DoorCall::RunStart(direction));
        // The real driver blocks here for the whole traversal.
        self.calls.push(DoorCall::RunEnd(direction));
        self.in_run = false;
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Test rig ──────────────────────────────────────────────────

/// The full composition: real core + scheduler, recording door/sink,
/// scriptable stack/settings/reset.
pub struct Rig {
    pub core: ControlCore,
    pub door: RecordingDoor,
    pub stack: SimStack,
    pub settings: SimSettings,
    pub reset: SimFactoryReset,
    pub leds: StatusLeds,
    pub sched: AlarmScheduler,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self {
            core: ControlCore::new(DoorConfig::default()),
            door: RecordingDoor::new(),
            stack: SimStack::new(),
            settings: SimSettings::new(),
            reset: SimFactoryReset::new(),
            leds: StatusLeds::new(),
            sched: AlarmScheduler::new(),
            sink: RecordingSink::new(),
        }
    }

    /// Run the full startup sequence.
    pub fn initialize(&mut self) {
        self.core.initialize(
            &mut self.door,
            &mut self.stack,
            &mut self.settings,
            &mut self.reset,
            &mut self.leds,
            &mut self.sink,
        );
    }

    /// Dispatch one event through the core.
    pub fn dispatch(&mut self, event: Event, now_ms: u64) -> coopdoor::error::Result<()> {
        self.core.dispatch(
            event,
            now_ms,
            &mut Peripherals {
                door: &mut self.door,
                stack: &mut self.stack,
                reset: &mut self.reset,
                leds: &mut self.leds,
                sched: &mut self.sched,
                sink: &mut self.sink,
            },
        )
    }

    /// Dispatch one event, then keep dispatching whatever callbacks the
    /// stack raised until the system is quiescent — the same feedback
    /// loop the dispatch queue provides in production.
    pub fn dispatch_settled(&mut self, event: Event, now_ms: u64) -> coopdoor::error::Result<()> {
        self.dispatch(event, now_ms)?;
        loop {
            let pending = self.stack.take_pending();
            if pending.is_empty() {
                return Ok(());
            }
            for raised in pending {
                self.dispatch(raised, now_ms)?;
            }
        }
    }
}
