// ── Unified domain model ──
//
// Vendor-neutral representation of pets, litter box visits and device
// status. Both adapters produce these types; consumers never see the
// vendor wire structs.

pub mod pet;
pub mod status;
pub mod vendor;
pub mod visit;

// ── Re-exports ──────────────────────────────────────────────────────

pub use pet::Pet;
pub use status::DeviceStatus;
pub use vendor::Vendor;
pub use visit::VisitRecord;
