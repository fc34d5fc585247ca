//! Coop door controller — host simulator.
//!
//! Composes the real control core, scheduler, and stepper driver with
//! the scripted sim collaborators, then plays a short commissioning
//! scenario through the genuine dispatch loop:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Sim adapters (outer ring)               │
//! │   SimStack   SimSettings   SimFactoryReset   SimPins     │
//! │                                                          │
//! │  ──────────────── Port Trait Boundary ─────────────────  │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────────┐  │
//! │  │   ControlCore · AlarmScheduler · StepperDriver     │  │
//! │  └────────────────────────────────────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! On real hardware the same core runs against stack bindings and GPIO
//! pins; only the outer ring changes.

use anyhow::Result;
use log::info;

use coopdoor::adapters::log_sink::LogEventSink;
use coopdoor::adapters::sim::{SimDelay, SimFactoryReset, SimPin, SimSettings, SimStack};
use coopdoor::adapters::time::MonotonicClock;
use coopdoor::app::ports::AlarmDelegate;
use coopdoor::app::service::{ControlCore, Peripherals, IDENTIFY_BUTTON_MASK};
use coopdoor::config::DoorConfig;
use coopdoor::drivers::status_led::StatusLeds;
use coopdoor::drivers::stepper::StepperDriver;
use coopdoor::events::{pop_event, push_event, Event, NetworkSignal};
use coopdoor::scheduler::{AlarmId, AlarmScheduler};

/// Bridges the scheduler to the dispatch queue: a fired alarm becomes a
/// queued event, processed in arrival order with everything else.
struct QueueDelegate;

impl AlarmDelegate for QueueDelegate {
    fn on_alarm_fired(&mut self, id: AlarmId) {
        push_event(Event::Alarm(id));
    }
}

/// How long the scripted scenario runs.
const SCENARIO_MS: u64 = 2500;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("coopdoor simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = DoorConfig::default();

    // ── Collaborators ─────────────────────────────────────────
    let mut stack = SimStack::new();
    let mut settings = SimSettings::new();
    let mut reset = SimFactoryReset::new();
    let mut leds = StatusLeds::new();
    let mut sink = LogEventSink::new();
    let mut door = StepperDriver::new(
        SimPin::new("step"),
        SimPin::new("dir"),
        SimPin::new("enable"),
        SimDelay,
        &config,
    );

    // ── Startup sequence ──────────────────────────────────────
    let mut core = ControlCore::new(config.clone());
    core.initialize(
        &mut door,
        &mut stack,
        &mut settings,
        &mut reset,
        &mut leds,
        &mut sink,
    );

    let clock = MonotonicClock::new();
    let mut sched = AlarmScheduler::new();
    let _heartbeat =
        sched.schedule_repeating(AlarmId::Heartbeat, config.heartbeat_interval_ms, clock.now_ms());

    // Commissioning is out of scope: assume steering already succeeded.
    stack.set_joined(true);

    // ── Scenario script (time_ms, stimulus) ───────────────────
    let mut script = vec![
        (
            0,
            Event::NetworkSignal(NetworkSignal::SteeringDone { joined: true }),
        ),
        // Remote write: open the door.
        (
            100,
            Event::AttributeWrite {
                cluster: coopdoor::zcl::CLUSTER_ON_OFF,
                attr: coopdoor::zcl::ATTR_ON_OFF_ON_OFF,
                value: 1,
            },
        ),
        // Short button press: enter identify mode.
        (
            600,
            Event::ButtonChanged {
                state: IDENTIFY_BUTTON_MASK,
                changed: IDENTIFY_BUTTON_MASK,
            },
        ),
        (
            700,
            Event::ButtonChanged {
                state: 0,
                changed: IDENTIFY_BUTTON_MASK,
            },
        ),
        // Second short press: cancel identify mode.
        (
            1600,
            Event::ButtonChanged {
                state: IDENTIFY_BUTTON_MASK,
                changed: IDENTIFY_BUTTON_MASK,
            },
        ),
        (
            1700,
            Event::ButtonChanged {
                state: 0,
                changed: IDENTIFY_BUTTON_MASK,
            },
        ),
        // Remote write: close the door.
        (
            2000,
            Event::AttributeWrite {
                cluster: coopdoor::zcl::CLUSTER_ON_OFF,
                attr: coopdoor::zcl::ATTR_ON_OFF_ON_OFF,
                value: 0,
            },
        ),
    ];
    script.reverse(); // pop from the back in time order

    // ── Dispatch loop ─────────────────────────────────────────
    let mut delegate = QueueDelegate;
    loop {
        let now_ms = clock.now_ms();
        if now_ms > SCENARIO_MS {
            break;
        }

        while script.last().is_some_and(|(at, _)| *at <= now_ms) {
            if let Some((_, event)) = script.pop() {
                push_event(event);
            }
        }

        sched.tick(now_ms, &mut delegate);

        while let Some(event) = pop_event() {
            core.dispatch(
                event,
                now_ms,
                &mut Peripherals {
                    door: &mut door,
                    stack: &mut stack,
                    reset: &mut reset,
                    leds: &mut leds,
                    sched: &mut sched,
                    sink: &mut sink,
                },
            )?;
            // Stack callbacks raised by this handler join the queue.
            for raised in stack.take_pending() {
                push_event(raised);
            }
        }

        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    info!(
        "scenario done: on_off={}, identifying={}, identify_time={}",
        core.attributes().on_off,
        core.is_identifying(),
        core.attributes().identify_time,
    );

    Ok(())
}
