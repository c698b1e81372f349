//! Vendor-neutral litter box data layer on top of `litterlink-api`.
//!
//! This crate owns the unified domain model, the historical backfill
//! policy, and the facade consumers (the CLI, or any embedding program)
//! talk to:
//!
//! - **[`Litterbox`]**: Facade over exactly one backend.
//!   [`login()`](Litterbox::login) establishes a session,
//!   [`fetch_all_data()`](Litterbox::fetch_all_data) backfills history and
//!   swaps in a new [`Snapshot`], and the accessors read that snapshot.
//!
//! - **[`Backend`]**: The capability trait both vendor adapters
//!   implement ([`PetKitBackend`], [`WhiskerBackend`]). [`AnyBackend`]
//!   selects one at runtime from a [`LitterboxConfig`].
//!
//! - **Backfill** ([`backfill`]): [`DayWalk`] date cursor, the supported
//!   and bulk PetKit device sets, and the per-fetch [`FetchSummary`].
//!
//! - **Normalizer** ([`convert`]): grams to pounds, Litter-Robot sensor
//!   millimeters to percent, vendor timestamps to UTC, and the PetKit
//!   visit / clean-cycle split.
//!
//! - **Domain model** ([`model`]): [`Pet`], [`VisitRecord`],
//!   [`DeviceStatus`], [`Vendor`].

pub mod adapters;
pub mod backend;
pub mod backfill;
pub mod clock;
pub mod config;
pub mod convert;
pub mod error;
pub mod litterbox;
pub mod model;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use adapters::{PetKitBackend, WhiskerBackend};
pub use backend::{AnyBackend, Backend, FetchRequest, FetchedData};
pub use backfill::{DayWalk, FetchSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{LitterboxConfig, VendorConfig};
pub use error::CoreError;
pub use litterbox::Litterbox;
pub use store::{Snapshot, SnapshotStore};

pub use model::{DeviceStatus, Pet, Vendor, VisitRecord};

// Session state is part of the facade's surface.
pub use litterlink_api::SessionState;
