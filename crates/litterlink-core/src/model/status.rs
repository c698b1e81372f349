// ── Device status ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::vendor::Vendor;

/// Current condition of one litter box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct DeviceStatus {
    pub vendor: Vendor,
    /// Vendor identity of the box: PetKit `deviceId` or Whisker serial.
    pub device_id: String,
    pub device_name: String,
    pub device_type: String,
    pub timestamp: DateTime<Utc>,
    /// 0-100.
    pub litter_level_percent: u8,
    /// 0-100. Whisker reports the DFI sensor; PetKit only knows full/not full.
    pub waste_level_percent: u8,
    pub is_drawer_full: bool,
    pub is_error_state: bool,
    pub status_text: String,
}

impl DeviceStatus {
    pub const UNKNOWN_TEXT: &'static str = "Unknown";

    /// Placeholder returned before any status has been fetched.
    pub fn unknown(vendor: Vendor) -> Self {
        Self {
            vendor,
            device_id: String::new(),
            device_name: String::new(),
            device_type: String::new(),
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            litter_level_percent: 0,
            waste_level_percent: 0,
            is_drawer_full: false,
            is_error_state: false,
            status_text: Self::UNKNOWN_TEXT.to_owned(),
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.device_id.is_empty() && self.status_text == Self::UNKNOWN_TEXT
    }
}
