//! Startup-sequence contract tests.

use coopdoor::adapters::sim::SimSettings;
use coopdoor::app::events::AppEvent;
use coopdoor::app::ports::Led;
use coopdoor::app::service::IDENTIFY_BUTTON_MASK;
use coopdoor::zcl::IDENTIFY_TIME_DEFAULT;

use crate::mock_hw::{DoorCall, Rig};

#[test]
fn startup_registers_with_stack_in_contract_order() {
    let mut rig = Rig::new();
    rig.initialize();

    assert_eq!(
        rig.stack.calls,
        vec![
            "register_command_handler",
            "register_endpoint",
            "register_identify_handler",
            "init_scenes",
            "enable",
        ],
        "stack registration order is part of the startup contract"
    );
    assert!(rig.stack.is_enabled());
}

#[test]
fn startup_initializes_settings_before_loading_them() {
    let mut rig = Rig::new();
    rig.initialize();

    assert_eq!(rig.settings.init_calls, 1);
    assert_eq!(rig.settings.load_calls, 1);
}

#[test]
fn settings_load_follows_scene_table_init() {
    let mut rig = Rig::new();
    rig.initialize();

    // init_scenes is the last registration call before enable; load was
    // counted, so it ran between the two.
    let scenes_pos = rig
        .stack
        .calls
        .iter()
        .position(|c| *c == "init_scenes")
        .unwrap();
    let enable_pos = rig.stack.calls.iter().position(|c| *c == "enable").unwrap();
    assert!(scenes_pos < enable_pos);
    assert_eq!(rig.settings.load_calls, 1);
}

#[test]
fn startup_parks_the_door_and_clears_indicators() {
    let mut rig = Rig::new();
    rig.initialize();

    assert_eq!(rig.door.calls, vec![DoorCall::Park]);
    assert!(!rig.leds.get(Led::Run));
    assert!(!rig.leds.get(Led::Network));
    assert!(!rig.leds.get(Led::Identify));
}

#[test]
fn startup_arms_factory_reset_on_the_identify_button() {
    let mut rig = Rig::new();
    rig.initialize();

    assert_eq!(rig.reset.registered_mask, Some(IDENTIFY_BUTTON_MASK));
}

#[test]
fn startup_emits_started_and_resets_attribute_mirror() {
    let mut rig = Rig::new();
    rig.initialize();

    assert!(rig.sink.contains(&AppEvent::Started));
    assert!(rig.core.attributes().on_off);
    assert_eq!(rig.core.attributes().identify_time, IDENTIFY_TIME_DEFAULT);
}

#[test]
fn settings_failures_do_not_abort_startup() {
    let mut rig = Rig::new();
    rig.settings = SimSettings::failing();
    rig.initialize();

    // Both failures were swallowed and every later step still ran.
    assert_eq!(rig.settings.init_calls, 1);
    assert_eq!(rig.settings.load_calls, 1);
    assert!(rig.stack.is_enabled());
    assert_eq!(rig.door.calls, vec![DoorCall::Park]);
    assert!(rig.sink.contains(&AppEvent::Started));
}
