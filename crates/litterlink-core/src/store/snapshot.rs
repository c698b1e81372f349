// ── Fetch snapshots ──
//
// A `Snapshot` is the immutable result of one fetch. `SnapshotStore`
// swaps whole snapshots atomically: readers holding the previous
// `Arc<Snapshot>` keep a consistent view while a new one is published.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{DeviceStatus, Pet, Vendor, VisitRecord};

/// Pets, visit history and per-device status from one fetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub pets: Vec<Pet>,
    /// Newest first.
    pub visits: Vec<VisitRecord>,
    /// One entry per device id, newest first.
    pub statuses: Vec<DeviceStatus>,
    /// `None` until the first successful fetch.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Order visits, collapse statuses to one per device and stamp the
    /// result.
    ///
    /// The visit sort is stable, so records with equal timestamps keep
    /// the order they were fetched in. For statuses the newest per device
    /// wins; on a tie the one fetched later wins.
    pub fn build(
        pets: Vec<Pet>,
        mut visits: Vec<VisitRecord>,
        statuses: Vec<DeviceStatus>,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        visits.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut latest: HashMap<(Vendor, String), DeviceStatus> = HashMap::new();
        for status in statuses {
            let key = (status.vendor, status.device_id.clone());
            let newer = latest
                .get(&key)
                .is_none_or(|current| status.timestamp >= current.timestamp);
            if newer {
                latest.insert(key, status);
            }
        }
        let mut statuses: Vec<DeviceStatus> = latest.into_values().collect();
        statuses.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.device_name.cmp(&b.device_name))
                .then_with(|| a.device_id.cmp(&b.device_id))
        });

        Self {
            pets,
            visits,
            statuses,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn pet(&self, id: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn pet_by_name(&self, name: &str) -> Option<&Pet> {
        self.pets.iter().find(|p| p.name == name)
    }

    /// Visits whose `pet_id` equals `id`, in snapshot order.
    pub fn visits_for_pet(&self, id: &str) -> Vec<VisitRecord> {
        self.visits
            .iter()
            .filter(|v| v.pet_id.as_deref() == Some(id))
            .cloned()
            .collect()
    }

    /// Visits recorded under `name`, in snapshot order.
    pub fn visits_for_pet_name(&self, name: &str) -> Vec<VisitRecord> {
        self.visits
            .iter()
            .filter(|v| !v.pet_name.is_empty() && v.pet_name == name)
            .cloned()
            .collect()
    }

    /// Most recent status across all devices.
    pub fn latest_status(&self) -> Option<&DeviceStatus> {
        self.statuses.first()
    }
}

/// Atomically replaceable holder of the current [`Snapshot`].
#[derive(Debug, Default)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current snapshot. Later replacements do not affect it.
    pub fn load(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Publish `snapshot`, dropping the previous one once no reader holds it.
    pub fn replace(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn visit(pet: Option<&str>, secs: i64, action: &str) -> VisitRecord {
        VisitRecord {
            pet_name: pet.map(|p| format!("name-{p}")).unwrap_or_default(),
            pet_id: pet.map(Into::into),
            timestamp: at(secs),
            weight_lbs: 0.0,
            duration_seconds: 0,
            action: action.into(),
            source_device: "box".into(),
        }
    }

    fn status(device: &str, secs: i64, text: &str) -> DeviceStatus {
        DeviceStatus {
            vendor: Vendor::PetKit,
            device_id: format!("id-{device}"),
            device_name: device.into(),
            device_type: "T4".into(),
            timestamp: at(secs),
            litter_level_percent: 50,
            waste_level_percent: 0,
            is_drawer_full: false,
            is_error_state: false,
            status_text: text.into(),
        }
    }

    #[test]
    fn visits_sorted_newest_first_and_stable() {
        let visits = vec![
            visit(Some("1"), 100, "a"),
            visit(Some("2"), 300, "b"),
            visit(None, 200, "c"),
            visit(Some("1"), 300, "d"),
        ];
        let snap = Snapshot::build(vec![], visits, vec![], at(400));

        let actions: Vec<_> = snap.visits.iter().map(|v| v.action.as_str()).collect();
        assert_eq!(actions, vec!["b", "d", "c", "a"]);
        assert!(
            snap.visits
                .windows(2)
                .all(|w| w[0].timestamp >= w[1].timestamp)
        );
    }

    #[test]
    fn pet_filter_preserves_relative_order() {
        let visits = vec![
            visit(Some("1"), 500, "x"),
            visit(Some("2"), 400, "y"),
            visit(Some("1"), 300, "z"),
            visit(None, 200, "clean_over"),
        ];
        let snap = Snapshot::build(vec![], visits, vec![], at(600));

        let for_one: Vec<_> = snap
            .visits_for_pet("1")
            .into_iter()
            .map(|v| v.action)
            .collect();
        assert_eq!(for_one, vec!["x", "z"]);
        assert!(snap.visits_for_pet("nope").is_empty());
        assert_eq!(snap.visits_for_pet_name("name-2").len(), 1);
        assert!(snap.visits_for_pet_name("").is_empty());
    }

    #[test]
    fn one_status_per_device_newest_wins() {
        let statuses = vec![
            status("hall", 100, "Ready"),
            status("hall", 300, "Drawer Full"),
            status("attic", 200, "Low Litter"),
            status("hall", 250, "Ready"),
        ];
        let snap = Snapshot::build(vec![], vec![], statuses, at(400));

        assert_eq!(snap.statuses.len(), 2);
        let latest = snap.latest_status().unwrap();
        assert_eq!(latest.device_name, "hall");
        assert_eq!(latest.status_text, "Drawer Full");
    }

    #[test]
    fn same_named_devices_keep_separate_statuses() {
        let first = DeviceStatus {
            device_id: "LR4A".into(),
            ..status("Litter-Robot", 100, "Ready")
        };
        let second = DeviceStatus {
            device_id: "LR4B".into(),
            ..status("Litter-Robot", 100, "ROBOT_DHF_FAULT")
        };
        let snap = Snapshot::build(vec![], vec![], vec![first, second], at(200));

        assert_eq!(snap.statuses.len(), 2);
        let ids: Vec<_> = snap.statuses.iter().map(|s| s.device_id.as_str()).collect();
        assert_eq!(ids, vec!["LR4A", "LR4B"]);
    }

    #[test]
    fn store_replaces_whole_snapshot() {
        let store = SnapshotStore::new();
        assert!(store.load().fetched_at.is_none());

        let before = store.load();
        store.replace(Snapshot::build(
            vec![Pet {
                id: "1".into(),
                name: "Miso".into(),
                weight_lbs: 9.0,
            }],
            vec![],
            vec![],
            at(10),
        ));

        assert!(before.pets.is_empty());
        let after = store.load();
        assert_eq!(after.pet("1").unwrap().name, "Miso");
        assert_eq!(after.pet_by_name("Miso").unwrap().id, "1");
        assert_eq!(after.fetched_at, Some(at(10)));
    }
}
