//! Device attribute schema.
//!
//! One plain struct mirroring the remote-visible state of the door device.
//! Owned exclusively by the control core, initialised once at startup, and
//! mutated only by validated remote attribute writes and the identify
//! session lifecycle. Persistence uses `postcard` as an explicit
//! serialization routine.

use serde::{Deserialize, Serialize};

use super::{PhysicalEnvironment, PowerSource, ZclString, IDENTIFY_TIME_DEFAULT};
use crate::config::DoorConfig;

/// Cluster library revision implemented by this device.
pub const ZCL_VERSION: u8 = 3;
/// Application software version (1 byte).
pub const APP_VERSION: u8 = 1;
/// Stack implementation version (1 byte).
pub const STACK_VERSION: u8 = 10;
/// Hardware revision (1 byte).
pub const HW_VERSION: u8 = 11;

/// Manufacturer name (up to 32 bytes).
pub const MANUFACTURER_NAME: &str = "CoopDoor";
/// Model identifier assigned by the manufacturer (up to 32 bytes).
pub const MODEL_ID: &str = "Coop_Door_v0.1";
/// Manufacture date, ISO 8601 `YYYYMMDD` (first 8 bytes).
pub const DATE_CODE: &str = "20231121";
/// Physical location description (up to 16 bytes).
pub const LOCATION: &str = "Outside";

/// The remote-visible device state, one field per exposed attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceAttributes {
    // Basic cluster
    pub zcl_version: u8,
    pub app_version: u8,
    pub stack_version: u8,
    pub hw_version: u8,
    pub manufacturer: ZclString<32>,
    pub model_id: ZclString<32>,
    pub date_code: ZclString<16>,
    pub location: ZclString<16>,
    pub power_source: PowerSource,
    pub environment: PhysicalEnvironment,

    // Identify cluster
    pub identify_time: u16,

    // On/Off cluster
    pub on_off: bool,
}

impl DeviceAttributes {
    /// Initialise every attribute to its startup default.
    pub fn new(_config: &DoorConfig) -> Self {
        Self {
            zcl_version: ZCL_VERSION,
            app_version: APP_VERSION,
            stack_version: STACK_VERSION,
            hw_version: HW_VERSION,
            manufacturer: ZclString::from_str_lossy(MANUFACTURER_NAME),
            model_id: ZclString::from_str_lossy(MODEL_ID),
            date_code: ZclString::from_str_lossy(DATE_CODE),
            location: ZclString::from_str_lossy(LOCATION),
            power_source: PowerSource::DcSource,
            environment: PhysicalEnvironment::Unspecified,
            identify_time: IDENTIFY_TIME_DEFAULT,
            // The door reports "open" until told otherwise.
            on_off: true,
        }
    }

    /// Serialize for persistence.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }

    /// Deserialize a previously persisted attribute set.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        postcard::from_bytes(bytes)
    }

    /// Whether an identify session is currently live.
    pub fn is_identifying(&self) -> bool {
        self.identify_time != IDENTIFY_TIME_DEFAULT
    }
}
