//! System configuration parameters
//!
//! All tunable parameters for the coop door controller. Values can be
//! overridden from persisted settings before the network stack comes up.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoorConfig {
    // --- Network ---
    /// Application endpoint the door device is exposed on
    pub endpoint: u8,

    // --- Stepper ---
    /// Open-loop step count for a full door traversal
    pub steps_to_endstop: u32,
    /// Settle delay after each step-pin edge (microseconds)
    pub step_interval_us: u32,

    // --- Identify ---
    /// Identify LED toggle period (milliseconds)
    pub identify_blink_interval_ms: u32,
    /// Value mirrored into the identify-time attribute while a session is live
    pub identify_time_secs: u16,

    // --- Timing ---
    /// Run/heartbeat LED toggle period (milliseconds)
    pub heartbeat_interval_ms: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            // Network
            endpoint: 10,

            // Stepper
            steps_to_endstop: 100,
            step_interval_us: 800,

            // Identify
            identify_blink_interval_ms: 100,
            identify_time_secs: 30,

            // Timing
            heartbeat_interval_ms: 1000,
        }
    }
}
