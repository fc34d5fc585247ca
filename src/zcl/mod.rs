//! Cluster library primitives.
//!
//! Typed constants for the clusters and attributes the door exposes, the
//! length-prefixed string type used by the basic cluster, and the status
//! codes handed back to the stack for incoming commands.
//!
//! The attribute schema itself lives in [`attrs`], as a plain struct with
//! named fields and an explicit serialization routine — no declaration
//! macros, no static wiring.

pub mod attrs;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Cluster / attribute identifiers
// ---------------------------------------------------------------------------

/// Basic cluster (device identity).
pub const CLUSTER_BASIC: u16 = 0x0000;
/// Identify cluster.
pub const CLUSTER_IDENTIFY: u16 = 0x0003;
/// Groups cluster.
pub const CLUSTER_GROUPS: u16 = 0x0004;
/// Scenes cluster.
pub const CLUSTER_SCENES: u16 = 0x0005;
/// On/Off cluster — the only cluster the door acts on.
pub const CLUSTER_ON_OFF: u16 = 0x0006;

/// The on/off attribute within [`CLUSTER_ON_OFF`].
pub const ATTR_ON_OFF_ON_OFF: u16 = 0x0000;

/// Identify-time value meaning "no identify session is live".
pub const IDENTIFY_TIME_DEFAULT: u16 = 0;

// ---------------------------------------------------------------------------
// Command status
// ---------------------------------------------------------------------------

/// Outcome of an incoming device command, mirrored back to the stack.
///
/// `NotImplemented` is an explicit "not yet supported" signal to the remote
/// caller, not an error: unknown clusters are rejected, never dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    NotImplemented,
}

// ---------------------------------------------------------------------------
// Length-prefixed character string
// ---------------------------------------------------------------------------

/// Fixed-capacity character string in cluster wire form: the first encoded
/// byte is the length, followed by the raw bytes (no trailing zero).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZclString<const N: usize>(heapless::Vec<u8, N>);

impl<const N: usize> ZclString<N> {
    /// Build from a string slice, silently truncating to capacity.
    pub fn from_str_lossy(s: &str) -> Self {
        let take = s.len().min(N);
        let mut v = heapless::Vec::new();
        // Cannot fail: `take` is bounded by the capacity.
        let _ = v.extend_from_slice(&s.as_bytes()[..take]);
        Self(v)
    }

    /// Current length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw bytes without the length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Write the wire form (`[len, bytes...]`) into `out`.
    /// Returns the number of bytes written, or `None` if `out` is too small.
    pub fn encode_into(&self, out: &mut [u8]) -> Option<usize> {
        let needed = 1 + self.0.len();
        if out.len() < needed {
            return None;
        }
        out[0] = self.0.len() as u8;
        out[1..needed].copy_from_slice(&self.0);
        Some(needed)
    }
}

// ---------------------------------------------------------------------------
// Basic-cluster enumerations
// ---------------------------------------------------------------------------

/// Power sources the device can report (basic cluster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PowerSource {
    Unknown = 0x00,
    MainsSinglePhase = 0x01,
    Battery = 0x03,
    DcSource = 0x04,
}

/// Physical environment the device reports (basic cluster).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum PhysicalEnvironment {
    Unspecified = 0x00,
    Outdoor = 0x0C,
}
