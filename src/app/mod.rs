//! Application core — pure domain logic, zero I/O.
//!
//! The control core dispatches the three event sources (remote attribute
//! writes, local button, stack signals) onto the actuator and the
//! identify session. All interaction with hardware and the mesh stack
//! happens through **port traits** defined in [`ports`], keeping this
//! layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
