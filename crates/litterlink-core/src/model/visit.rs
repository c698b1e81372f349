// ── Visit records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry in the litter box history.
///
/// Pet visits carry `pet_id`; machine events (clean cycles, drawer alerts)
/// have `pet_id == None` and usually an empty `pet_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub pet_name: String,
    pub pet_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Pounds.
    pub weight_lbs: f64,
    /// 0 when the vendor does not report a duration.
    pub duration_seconds: u64,
    /// Free-form event label (`pet_out`, `Clean Cycle Complete`, ...).
    pub action: String,
    pub source_device: String,
}

impl VisitRecord {
    pub fn is_machine_event(&self) -> bool {
        self.pet_id.is_none()
    }
}
