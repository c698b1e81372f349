// Whisker wire types.
//
// GraphQL lets us name exactly the fields we ask for, so these mirror the
// selection sets in `pets.rs` and `robots.rs`.

use serde::Deserialize;
use serde_json::Value;

// ── Cognito ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct InitiateAuthResponse {
    #[serde(rename = "AuthenticationResult")]
    pub authentication_result: Option<AuthenticationResult>,
    #[serde(rename = "ChallengeName")]
    pub challenge_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthenticationResult {
    #[serde(rename = "IdToken")]
    pub id_token: String,
    #[serde(rename = "AccessToken")]
    pub access_token: Option<String>,
}

/// Claims we read from the ID token payload.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct IdTokenClaims {
    pub mid: Option<Value>,
}

// ── GraphQL envelope ────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlResponse {
    pub data: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlError {
    #[serde(default)]
    pub message: String,
}

// ── Pet profile ─────────────────────────────────────────────────────

/// Ids on listing entries are optional; the core adapter drops entities
/// that come back without one.
#[derive(Debug, Clone, Deserialize)]
pub struct WhiskerPet {
    #[serde(rename = "petId")]
    pub pet_id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Pounds.
    pub weight: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightEntry {
    /// Pounds.
    pub weight: Option<f64>,
    /// ISO-8601, usually without an offset.
    pub timestamp: Option<String>,
}

// ── Litter-Robot 4 ──────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct WhiskerRobot {
    pub serial: Option<String>,
    pub name: Option<String>,
    /// Time-of-flight distance to the litter bed, millimeters.
    #[serde(rename = "litterLevel")]
    pub litter_level: Option<f64>,
    #[serde(rename = "DFILevelPercent")]
    pub dfi_level_percent: Option<f64>,
    #[serde(rename = "isDFIFull")]
    pub is_dfi_full: Option<bool>,
    #[serde(rename = "robotStatus")]
    pub robot_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RobotActivity {
    /// `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "actionValue")]
    pub action_value: Option<Value>,
}
