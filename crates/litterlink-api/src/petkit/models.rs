// PetKit wire types.
//
// Field names mirror the vendor's camelCase JSON. Optional fields are
// `Option` because the API omits or nulls them freely; the normalizer in
// `litterlink-core` decides which ones are mandatory.

use std::fmt;

use serde::Deserialize;

/// Identifier the API sends either as a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PetKitId {
    Int(i64),
    Text(String),
}

impl fmt::Display for PetKitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

// ── Region discovery ────────────────────────────────────────────────

/// `GET /v1/regionservers` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionServerList {
    #[serde(default)]
    pub list: Vec<RegionServer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegionServer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub gateway: String,
}

// ── Login ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginResult {
    pub session: Option<LoginSession>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct LoginSession {
    pub id: String,
}

/// `{"error": {"code": N, "msg": "..."}}`, returned with HTTP 200.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: Option<String>,
}

// ── Family / devices / pets ─────────────────────────────────────────

/// One entry of `GET /group/family/list`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Family {
    #[serde(rename = "deviceList", default)]
    pub devices: Vec<FamilyDevice>,
    #[serde(rename = "petList", default)]
    pub pets: Vec<FamilyPet>,
}

/// Listing entries keep their id optional so one malformed entity does not
/// fail the whole family decode.
#[derive(Debug, Clone, Deserialize)]
pub struct FamilyDevice {
    #[serde(rename = "deviceId")]
    pub device_id: Option<PetKitId>,
    #[serde(rename = "deviceName", default)]
    pub device_name: String,
    #[serde(rename = "deviceType", default)]
    pub device_type: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FamilyPet {
    #[serde(rename = "petId")]
    pub pet_id: Option<PetKitId>,
    #[serde(rename = "petName", default)]
    pub pet_name: String,
}

// ── Device records ──────────────────────────────────────────────────

/// One event from `POST /{type}/getDeviceRecord`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeviceRecord {
    #[serde(rename = "enumEventType")]
    pub event_type: Option<String>,
    #[serde(rename = "petId")]
    pub pet_id: Option<PetKitId>,
    #[serde(rename = "petName")]
    pub pet_name: Option<String>,
    /// Epoch seconds.
    pub timestamp: Option<i64>,
    pub content: Option<RecordContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordContent {
    /// Grams.
    #[serde(rename = "petWeight")]
    pub pet_weight: Option<i64>,
    /// Epoch seconds the pet entered the box.
    #[serde(rename = "timeIn")]
    pub time_in: Option<i64>,
    #[serde(rename = "timeOut")]
    pub time_out: Option<i64>,
    #[serde(rename = "boxFull")]
    pub box_full: Option<bool>,
    #[serde(rename = "sandLack")]
    pub sand_lack: Option<bool>,
    #[serde(rename = "litterPercent")]
    pub litter_percent: Option<i64>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn id_accepts_number_or_string() {
        let n: PetKitId = serde_json::from_str("12345").unwrap();
        let s: PetKitId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(n.to_string(), "12345");
        assert_eq!(s.to_string(), "abc");
    }

    #[test]
    fn record_tolerates_missing_fields() {
        let rec: DeviceRecord =
            serde_json::from_str(r#"{"enumEventType":"pet_out","petId":null}"#).unwrap();
        assert_eq!(rec.event_type.as_deref(), Some("pet_out"));
        assert!(rec.pet_id.is_none());
        assert!(rec.content.is_none());
    }

    #[test]
    fn family_decodes_entities_without_ids() {
        let family: Family = serde_json::from_str(
            r#"{
                "deviceList": [
                    {"deviceId": 42, "deviceName": "Hallway", "deviceType": "T4"},
                    {"deviceId": null, "deviceName": "Ghost", "deviceType": "T4"}
                ],
                "petList": [{"petName": "Nameless"}]
            }"#,
        )
        .unwrap();
        assert_eq!(family.devices.len(), 2);
        assert_eq!(family.devices[0].device_id, Some(PetKitId::Int(42)));
        assert!(family.devices[1].device_id.is_none());
        assert!(family.pets[0].pet_id.is_none());
    }
}
