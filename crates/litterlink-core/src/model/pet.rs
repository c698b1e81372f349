use serde::{Deserialize, Serialize};

/// A pet registered on the vendor account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Vendor id; numeric ids are rendered in decimal.
    pub id: String,
    pub name: String,
    /// Pounds. 0 when the vendor has no reading.
    pub weight_lbs: f64,
}
