//! Integration test harness.
//!
//! Drives the real control core, scheduler, and blink state machine
//! through the port traits with recording/scriptable collaborators.

mod mock_hw;

mod control_core_tests;
mod identify_flow_tests;
mod startup_tests;
