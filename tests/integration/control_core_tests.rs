//! Dispatch-path tests: remote attribute writes, network signals, and
//! the heartbeat alarm.

use coopdoor::app::events::AppEvent;
use coopdoor::app::ports::{Direction, Led};
use coopdoor::error::{Error, StackError};
use coopdoor::events::{Event, NetworkSignal};
use coopdoor::scheduler::AlarmId;
use coopdoor::zcl::{ATTR_ON_OFF_ON_OFF, CLUSTER_BASIC, CLUSTER_ON_OFF, CommandStatus};

use crate::mock_hw::{DoorCall, Rig};

fn on_off_write(value: u8) -> Event {
    Event::AttributeWrite {
        cluster: CLUSTER_ON_OFF,
        attr: ATTR_ON_OFF_ON_OFF,
        value,
    }
}

#[test]
fn remote_on_opens_the_door_and_commits_the_mirror() {
    let mut rig = Rig::new();
    rig.initialize();

    rig.dispatch(on_off_write(1), 0).unwrap();

    assert_eq!(rig.door.runs(), vec![Direction::Open]);
    assert!(rig.core.attributes().on_off);
    assert!(rig.sink.contains(&AppEvent::DoorCommanded { open: true }));
}

#[test]
fn remote_off_closes_the_door() {
    let mut rig = Rig::new();
    rig.initialize();

    rig.dispatch(on_off_write(0), 0).unwrap();

    assert_eq!(rig.door.runs(), vec![Direction::Close]);
    assert!(!rig.core.attributes().on_off);
    assert!(rig.sink.contains(&AppEvent::DoorCommanded { open: false }));
}

#[test]
fn nonzero_write_values_all_mean_open() {
    let mut rig = Rig::new();
    rig.initialize();

    rig.dispatch(on_off_write(0xff), 0).unwrap();

    assert_eq!(rig.door.runs(), vec![Direction::Open]);
    assert!(rig.core.attributes().on_off);
}

#[test]
fn unknown_cluster_is_rejected_without_touching_the_door() {
    let mut rig = Rig::new();
    rig.initialize();
    let before = rig.core.attributes().clone();

    let status = rig.core.handle_attribute_set(
        CLUSTER_BASIC,
        ATTR_ON_OFF_ON_OFF,
        1,
        &mut rig.door,
        &mut rig.sink,
    );

    assert_eq!(status, CommandStatus::NotImplemented);
    assert!(rig.door.runs().is_empty());
    assert_eq!(*rig.core.attributes(), before);
    assert!(rig.sink.contains(&AppEvent::AttributeRejected {
        cluster: CLUSTER_BASIC
    }));
}

#[test]
fn on_off_cluster_with_unknown_attribute_acks_but_stays_inert() {
    let mut rig = Rig::new();
    rig.initialize();
    let before = rig.core.attributes().clone();

    let status =
        rig.core
            .handle_attribute_set(CLUSTER_ON_OFF, 0x4001, 0, &mut rig.door, &mut rig.sink);

    assert_eq!(status, CommandStatus::Ok);
    assert!(rig.door.runs().is_empty());
    assert_eq!(*rig.core.attributes(), before);
}

#[test]
fn door_commands_serialize_one_traversal_at_a_time() {
    let mut rig = Rig::new();
    rig.initialize();

    // Both writes are queued; each traversal must complete before the
    // next begins.
    rig.dispatch(on_off_write(1), 0).unwrap();
    rig.dispatch(on_off_write(0), 10).unwrap();

    assert_eq!(rig.door.runs(), vec![Direction::Open, Direction::Close]);
    assert_eq!(rig.door.overlap_violations, 0);
    assert_eq!(
        rig.door.calls,
        vec![
            DoorCall::Park,
            DoorCall::RunStart(Direction::Open),
            DoorCall::RunEnd(Direction::Open),
            DoorCall::RunStart(Direction::Close),
            DoorCall::RunEnd(Direction::Close),
        ]
    );
}

#[test]
fn join_signal_drives_the_network_led() {
    let mut rig = Rig::new();
    rig.initialize();

    rig.dispatch(
        Event::NetworkSignal(NetworkSignal::SteeringDone { joined: true }),
        0,
    )
    .unwrap();
    assert!(rig.leds.get(Led::Network));
    assert!(rig.sink.contains(&AppEvent::NetworkStatus { joined: true }));

    rig.dispatch(Event::NetworkSignal(NetworkSignal::Left), 10)
        .unwrap();
    assert!(!rig.leds.get(Led::Network));
    assert!(rig.sink.contains(&AppEvent::NetworkStatus { joined: false }));
}

#[test]
fn reboot_signal_reports_persisted_join_state() {
    let mut rig = Rig::new();
    rig.initialize();

    rig.dispatch(
        Event::NetworkSignal(NetworkSignal::DeviceReboot { joined: false }),
        0,
    )
    .unwrap();

    assert!(!rig.leds.get(Led::Network));
    assert!(rig.sink.contains(&AppEvent::NetworkStatus { joined: false }));
}

#[test]
fn fatal_stack_error_escapes_dispatch() {
    let mut rig = Rig::new();
    rig.initialize();
    rig.stack.fail_signal_handling(StackError::Internal(-7));

    let err = rig
        .dispatch(
            Event::NetworkSignal(NetworkSignal::SteeringDone { joined: true }),
            0,
        )
        .unwrap_err();

    assert!(matches!(err, Error::Stack(StackError::Internal(-7))));
    // The LED mirror still updated before the default handler ran.
    assert!(rig.leds.get(Led::Network));
}

#[test]
fn heartbeat_alarm_toggles_the_run_led() {
    let mut rig = Rig::new();
    rig.initialize();
    assert!(!rig.leds.get(Led::Run));

    rig.dispatch(Event::Alarm(AlarmId::Heartbeat), 1000).unwrap();
    assert!(rig.leds.get(Led::Run));

    rig.dispatch(Event::Alarm(AlarmId::Heartbeat), 2000).unwrap();
    assert!(!rig.leds.get(Led::Run));
}
