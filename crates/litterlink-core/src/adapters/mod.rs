// ── Vendor adapters ──
//
// Each adapter owns one vendor client and wires its session, the
// backfill policy and the normalizer together behind `Backend`.

pub mod petkit;
pub mod whisker;

pub use petkit::PetKitBackend;
pub use whisker::WhiskerBackend;
