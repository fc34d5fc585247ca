//! Identify-mode flow tests: button press through stack round-trip to
//! blink session and back.

use coopdoor::app::events::AppEvent;
use coopdoor::app::ports::Led;
use coopdoor::app::service::IDENTIFY_BUTTON_MASK;
use coopdoor::error::{Error, StackError};
use coopdoor::events::Event;
use coopdoor::scheduler::AlarmId;
use coopdoor::zcl::IDENTIFY_TIME_DEFAULT;

use crate::mock_hw::Rig;

fn press() -> Event {
    Event::ButtonChanged {
        state: IDENTIFY_BUTTON_MASK,
        changed: IDENTIFY_BUTTON_MASK,
    }
}

fn release() -> Event {
    Event::ButtonChanged {
        state: 0,
        changed: IDENTIFY_BUTTON_MASK,
    }
}

fn joined_rig() -> Rig {
    let mut rig = Rig::new();
    rig.initialize();
    rig.stack.set_joined(true);
    rig
}

#[test]
fn short_press_enters_identify_mode() {
    let mut rig = joined_rig();

    rig.dispatch_settled(press(), 0).unwrap();
    assert!(!rig.core.is_identifying(), "press alone must not trigger");

    rig.dispatch_settled(release(), 100).unwrap();

    assert!(rig.core.is_identifying());
    assert!(rig.stack.identify_active());
    assert_eq!(
        rig.core.attributes().identify_time,
        rig.core.config().identify_time_secs
    );
    assert_eq!(rig.sched.live_count(), 1, "one blink alarm armed");
    assert!(rig.sink.contains(&AppEvent::IdentifyRequested { entering: true }));
}

#[test]
fn second_press_cancels_the_session() {
    let mut rig = joined_rig();
    rig.dispatch_settled(press(), 0).unwrap();
    rig.dispatch_settled(release(), 100).unwrap();
    assert!(rig.core.is_identifying());

    rig.dispatch_settled(press(), 1000).unwrap();
    rig.dispatch_settled(release(), 1100).unwrap();

    assert!(!rig.core.is_identifying());
    assert!(!rig.stack.identify_active());
    assert_eq!(rig.core.attributes().identify_time, IDENTIFY_TIME_DEFAULT);
    assert_eq!(rig.sched.live_count(), 0);
    assert!(!rig.leds.get(Led::Identify), "cancel forces the LED off");
    assert!(rig.sink.contains(&AppEvent::IdentifyRequested { entering: false }));
}

#[test]
fn blink_alarm_toggles_the_identify_led() {
    let mut rig = joined_rig();
    rig.dispatch_settled(press(), 0).unwrap();
    rig.dispatch_settled(release(), 100).unwrap();

    rig.dispatch(Event::Alarm(AlarmId::IdentifyBlink), 200).unwrap();
    assert!(rig.leds.get(Led::Identify));
    rig.dispatch(Event::Alarm(AlarmId::IdentifyBlink), 300).unwrap();
    assert!(!rig.leds.get(Led::Identify));
}

#[test]
fn press_when_not_joined_is_ignored() {
    let mut rig = Rig::new();
    rig.initialize();
    // Not joined.

    rig.dispatch_settled(press(), 0).unwrap();
    rig.dispatch_settled(release(), 100).unwrap();

    assert!(!rig.core.is_identifying());
    assert!(!rig.stack.identify_active());
    assert!(!rig.sink.contains(&AppEvent::IdentifyRequested { entering: true }));
}

#[test]
fn invalid_state_from_stack_is_not_fatal() {
    let mut rig = joined_rig();
    rig.stack.fail_next_identify(StackError::InvalidState);

    rig.dispatch_settled(press(), 0).unwrap();
    rig.dispatch_settled(release(), 100).unwrap();

    assert!(!rig.core.is_identifying());
    assert_eq!(rig.core.attributes().identify_time, IDENTIFY_TIME_DEFAULT);
}

#[test]
fn internal_stack_error_escapes_as_fatal() {
    let mut rig = joined_rig();
    rig.stack.fail_next_identify(StackError::Internal(-3));

    rig.dispatch_settled(press(), 0).unwrap();
    let err = rig.dispatch_settled(release(), 100).unwrap_err();

    assert!(matches!(err, Error::Stack(StackError::Internal(-3))));
}

#[test]
fn factory_reset_release_suppresses_the_identify_toggle() {
    let mut rig = joined_rig();

    rig.dispatch_settled(press(), 0).unwrap();
    // The long hold completed a reset before the release arrived.
    rig.reset.complete_reset();
    rig.dispatch_settled(release(), 6000).unwrap();

    assert!(!rig.core.is_identifying());
    assert!(!rig.stack.identify_active());
    assert!(rig.sink.contains(&AppEvent::FactoryResetConfirmed));
    assert!(!rig.sink.contains(&AppEvent::IdentifyRequested { entering: true }));
}

#[test]
fn raw_button_events_always_feed_reset_detection() {
    let mut rig = joined_rig();

    rig.dispatch_settled(press(), 0).unwrap();
    rig.dispatch_settled(release(), 100).unwrap();

    assert_eq!(
        rig.reset.checks,
        vec![
            (IDENTIFY_BUTTON_MASK, IDENTIFY_BUTTON_MASK),
            (0, IDENTIFY_BUTTON_MASK),
        ]
    );
}

#[test]
fn identify_time_mirror_tracks_the_session_everywhere() {
    let mut rig = joined_rig();
    let steps = [
        (press(), 0),
        (release(), 100),
        (Event::Alarm(AlarmId::IdentifyBlink), 200),
        (press(), 1000),
        (release(), 1100),
    ];

    for (event, at) in steps {
        rig.dispatch_settled(event, at).unwrap();
        assert_eq!(
            rig.core.attributes().identify_time == IDENTIFY_TIME_DEFAULT,
            !rig.core.is_identifying(),
            "identify-time mirror must match the live session"
        );
    }
}
