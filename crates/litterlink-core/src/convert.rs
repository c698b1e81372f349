// ── Vendor-to-domain conversions ──
//
// Bridges the typed `litterlink_api` wire structs into the unified model.
// Units (grams, millimeters), identifier shapes and status vocabularies
// are reconciled here. Records missing a mandatory field come back as
// `None`; the adapters count them as skipped.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, Utc};

use litterlink_api::petkit::{DeviceRecord, FamilyDevice, FamilyPet};
use litterlink_api::whisker::{RobotActivity, WeightEntry, WhiskerPet, WhiskerRobot};

use crate::model::{DeviceStatus, Pet, Vendor, VisitRecord};

// ── Constants ───────────────────────────────────────────────────────

pub const GRAMS_TO_LBS: f64 = 0.002_204_62;

/// Litter-Robot 4 time-of-flight reading for a full bed.
pub const LITTER_FULL_MM: f64 = 440.0;
/// Millimeters of extra distance per percent of litter lost.
pub const LITTER_MM_PER_PERCENT: f64 = 0.6;

/// PetKit event type marking a finished clean cycle.
pub const PETKIT_CYCLE_EVENT: &str = "clean_over";

pub const WHISKER_DEVICE_MODEL: &str = "Litter-Robot 4";
pub const WEIGHT_RECORDED: &str = "Pet Weight Recorded";
const CAT_WEIGHT_ACTIVITY: &str = "catWeight";

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

// ── Helpers ────────────────────────────────────────────────────────

#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn grams_to_lbs(grams: i64) -> f64 {
    grams as f64 * GRAMS_TO_LBS
}

/// Map a raw Litter-Robot 4 distance reading to a fill percentage.
///
/// Non-positive readings mean the sensor had nothing to report and map
/// to 0 rather than an out-of-range value.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
pub fn litter_level_percent(raw_mm: f64) -> u8 {
    if raw_mm.is_nan() || raw_mm <= 0.0 {
        return 0;
    }
    let percent = 100.0 - (raw_mm - LITTER_FULL_MM) / LITTER_MM_PER_PERCENT;
    percent.clamp(0.0, 100.0).round() as u8
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::as_conversions
)]
fn percent_from_f64(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.clamp(0.0, 100.0).round() as u8
}

fn percent_from_i64(value: i64) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(0)
}

fn epoch_to_datetime(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Parse an RFC 3339 or offset-less vendor timestamp.
///
/// Offset-less values are read as UTC.
pub fn parse_vendor_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

fn duration_seconds(time_in: Option<i64>, time_out: Option<i64>) -> u64 {
    match (time_in, time_out) {
        (Some(start), Some(end)) if end > start => u64::try_from(end - start).unwrap_or(0),
        _ => 0,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ── PetKit ─────────────────────────────────────────────────────────

/// One PetKit device record sorted into the two-bucket model.
#[derive(Debug, Clone, PartialEq)]
pub enum PetKitEvent {
    /// A pet used the box.
    Visit(VisitRecord),
    /// A clean cycle finished. Carries the box condition it reported and
    /// a machine entry for the history.
    Cycle {
        record: VisitRecord,
        status: DeviceStatus,
    },
}

/// Classify and normalize one record from `getDeviceRecord`.
///
/// `pet_names` maps pet id to name for records that omit `petName`.
pub fn petkit_event(
    record: &DeviceRecord,
    device: &FamilyDevice,
    pet_names: &HashMap<String, String>,
) -> Option<PetKitEvent> {
    let event_type = non_empty(record.event_type.as_deref())?;
    let content = record.content.as_ref()?;
    let timestamp = record
        .timestamp
        .or(content.time_in)
        .and_then(epoch_to_datetime)?;

    if event_type == PETKIT_CYCLE_EVENT {
        let box_full = content.box_full.unwrap_or(false);
        let sand_lack = content.sand_lack.unwrap_or(false);
        let status_text = if box_full {
            "Drawer Full"
        } else if sand_lack {
            "Low Litter"
        } else {
            "Ready"
        };
        let device_id = device.device_id.as_ref()?.to_string();
        let status = DeviceStatus {
            vendor: Vendor::PetKit,
            device_id,
            device_name: device.device_name.clone(),
            device_type: device.device_type.clone(),
            timestamp,
            litter_level_percent: content.litter_percent.map_or(0, percent_from_i64),
            waste_level_percent: if box_full { 100 } else { 0 },
            is_drawer_full: box_full,
            is_error_state: false,
            status_text: status_text.to_owned(),
        };
        let record = VisitRecord {
            pet_name: String::new(),
            pet_id: None,
            timestamp,
            weight_lbs: 0.0,
            duration_seconds: 0,
            action: event_type.to_owned(),
            source_device: device.device_name.clone(),
        };
        return Some(PetKitEvent::Cycle { record, status });
    }

    let pet_id = record.pet_id.as_ref()?.to_string();
    let pet_name = non_empty(record.pet_name.as_deref())
        .map(ToOwned::to_owned)
        .or_else(|| pet_names.get(&pet_id).cloned())
        .unwrap_or_default();

    Some(PetKitEvent::Visit(VisitRecord {
        pet_name,
        pet_id: Some(pet_id),
        timestamp,
        weight_lbs: content.pet_weight.map_or(0.0, grams_to_lbs),
        duration_seconds: duration_seconds(content.time_in, content.time_out),
        action: event_type.to_owned(),
        source_device: device.device_name.clone(),
    }))
}

/// Build a unified pet, taking its weight from the newest weighed visit.
/// `None` when the listing entry has no id.
pub fn petkit_pet(pet: &FamilyPet, visits: &[VisitRecord]) -> Option<Pet> {
    let id = pet.pet_id.as_ref()?.to_string();
    let weight_lbs = visits
        .iter()
        .filter(|v| v.pet_id.as_deref() == Some(id.as_str()) && v.weight_lbs > 0.0)
        .max_by_key(|v| v.timestamp)
        .map_or(0.0, |v| v.weight_lbs);

    Some(Pet {
        id,
        name: pet.pet_name.clone(),
        weight_lbs,
    })
}

// ── Whisker ────────────────────────────────────────────────────────

pub fn whisker_pet(pet: &WhiskerPet) -> Option<Pet> {
    Some(Pet {
        id: pet.pet_id.clone()?,
        name: pet.name.clone(),
        weight_lbs: pet.weight.unwrap_or(0.0),
    })
}

/// One weight-history entry as a visit. Needs both a weight and a
/// readable timestamp.
pub fn whisker_weight_visit(pet: &WhiskerPet, entry: &WeightEntry) -> Option<VisitRecord> {
    let pet_id = pet.pet_id.clone()?;
    let weight_lbs = entry.weight?;
    let timestamp = entry.timestamp.as_deref().and_then(parse_vendor_timestamp)?;
    Some(VisitRecord {
        pet_name: pet.name.clone(),
        pet_id: Some(pet_id),
        timestamp,
        weight_lbs,
        duration_seconds: 0,
        action: WEIGHT_RECORDED.to_owned(),
        source_device: WHISKER_DEVICE_MODEL.to_owned(),
    })
}

fn robot_display_name(robot: &WhiskerRobot) -> String {
    non_empty(robot.name.as_deref())
        .or(robot.serial.as_deref())
        .unwrap_or_default()
        .to_owned()
}

/// Human label for a Litter-Robot 4 `robotStatus` value.
pub fn robot_status_text(raw: &str) -> String {
    match raw {
        "ROBOT_IDLE" => "Ready".to_owned(),
        "ROBOT_CLEAN" => "Cleaning".to_owned(),
        "ROBOT_CAT_DETECT" => "Cat Detected".to_owned(),
        other => other.to_owned(),
    }
}

/// Current status of one robot, stamped with `observed_at` since the
/// vendor reports no time for it. `None` for a robot without a serial.
pub fn whisker_status(robot: &WhiskerRobot, observed_at: DateTime<Utc>) -> Option<DeviceStatus> {
    let device_id = non_empty(robot.serial.as_deref())?.to_owned();
    let raw_status = non_empty(robot.robot_status.as_deref());
    Some(DeviceStatus {
        vendor: Vendor::Whisker,
        device_id,
        device_name: robot_display_name(robot),
        device_type: WHISKER_DEVICE_MODEL.to_owned(),
        timestamp: observed_at,
        litter_level_percent: robot.litter_level.map_or(0, litter_level_percent),
        waste_level_percent: robot.dfi_level_percent.map_or(0, percent_from_f64),
        is_drawer_full: robot.is_dfi_full.unwrap_or(false),
        is_error_state: raw_status.is_some_and(|s| s.contains("FAULT")),
        status_text: raw_status.map_or_else(
            || DeviceStatus::UNKNOWN_TEXT.to_owned(),
            robot_status_text,
        ),
    })
}

/// `catWeight` activity duplicates the pet weight history.
pub fn is_weight_echo(activity: &RobotActivity) -> bool {
    activity.value.as_deref() == Some(CAT_WEIGHT_ACTIVITY)
}

/// Human label for a Litter-Robot 4 activity value.
pub fn activity_label(raw: &str) -> String {
    match raw {
        "robotCycleStatusIdle" => "Clean Cycle Complete".to_owned(),
        "DFIFullFlagOn" => "Drawer Full".to_owned(),
        other => other.to_owned(),
    }
}

/// One robot activity entry as a machine event.
pub fn whisker_activity_visit(robot: &WhiskerRobot, activity: &RobotActivity) -> Option<VisitRecord> {
    if is_weight_echo(activity) {
        return None;
    }
    let value = non_empty(activity.value.as_deref())?;
    let timestamp = activity
        .timestamp
        .as_deref()
        .and_then(parse_vendor_timestamp)?;
    Some(VisitRecord {
        pet_name: String::new(),
        pet_id: None,
        timestamp,
        weight_lbs: 0.0,
        duration_seconds: 0,
        action: activity_label(value),
        source_device: robot_display_name(robot),
    })
}
