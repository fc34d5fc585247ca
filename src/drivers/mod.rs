//! Actuator drivers and peripheral helpers.

pub mod button;
pub mod status_led;
pub mod stepper;
