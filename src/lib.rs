//! Coop door controller library.
//!
//! Event-driven control core for a stepper-driven coop door exposed on a
//! mesh network as a binary on/off device. The pure-logic modules are
//! exposed for integration testing; hardware and stack specifics live
//! behind port traits in [`app::ports`].

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod events;
pub mod identify;
pub mod scheduler;
pub mod zcl;

pub mod error;

pub mod adapters;
pub mod drivers;
