// ── Snapshot storage ──
//
// The facade's in-memory view of the last successful fetch.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotStore};
