// ── Backend abstraction ──
//
// One trait over both vendor adapters. The facade holds a `B: Backend`
// and never asks which vendor it is talking to; `AnyBackend` is the
// runtime-selected implementation built from a `LitterboxConfig`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use litterlink_api::SessionState;

use crate::adapters::{PetKitBackend, WhiskerBackend};
use crate::backfill::FetchSummary;
use crate::config::{LitterboxConfig, VendorConfig};
use crate::error::CoreError;
use crate::model::{DeviceStatus, Pet, Vendor, VisitRecord};

/// Parameters for one history fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Days of history (PetKit) or record limit per entity (Whisker).
    pub depth: u32,
    /// Local calendar date the day walk starts from.
    pub today: NaiveDate,
    /// Instant used for statuses the vendor does not timestamp.
    pub now: DateTime<Utc>,
    pub diagnostics: bool,
}

/// Unsorted output of one fetch, before it becomes a snapshot.
#[derive(Debug, Clone, Default)]
pub struct FetchedData {
    pub pets: Vec<Pet>,
    pub visits: Vec<VisitRecord>,
    pub statuses: Vec<DeviceStatus>,
    pub summary: FetchSummary,
}

/// A vendor cloud the facade can log into and backfill from.
#[async_trait]
pub trait Backend: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Establish a session, replacing any existing one.
    async fn login(&self) -> Result<(), CoreError>;

    /// Retrieve pets, visit history and device status.
    ///
    /// Page-level failures are skipped and counted; only authentication
    /// and top-level listing failures are returned as errors.
    async fn fetch_history(&self, request: FetchRequest) -> Result<FetchedData, CoreError>;

    fn session_state(&self) -> SessionState;
}

// ── AnyBackend ──────────────────────────────────────────────────────

/// Backend chosen at runtime from configuration.
pub enum AnyBackend {
    PetKit(PetKitBackend),
    Whisker(WhiskerBackend),
}

impl AnyBackend {
    /// Build the backend `config.vendor` selects.
    ///
    /// `now` fixes the UTC offset PetKit is told at login.
    pub fn from_config(config: &LitterboxConfig, now: DateTime<Utc>) -> Result<Self, CoreError> {
        Ok(match &config.vendor {
            VendorConfig::PetKit { .. } => Self::PetKit(PetKitBackend::new(config, now)?),
            VendorConfig::Whisker { .. } => Self::Whisker(WhiskerBackend::new(config)?),
        })
    }
}

#[async_trait]
impl Backend for AnyBackend {
    fn vendor(&self) -> Vendor {
        match self {
            Self::PetKit(b) => b.vendor(),
            Self::Whisker(b) => b.vendor(),
        }
    }

    async fn login(&self) -> Result<(), CoreError> {
        match self {
            Self::PetKit(b) => b.login().await,
            Self::Whisker(b) => b.login().await,
        }
    }

    async fn fetch_history(&self, request: FetchRequest) -> Result<FetchedData, CoreError> {
        match self {
            Self::PetKit(b) => b.fetch_history(request).await,
            Self::Whisker(b) => b.fetch_history(request).await,
        }
    }

    fn session_state(&self) -> SessionState {
        match self {
            Self::PetKit(b) => b.session_state(),
            Self::Whisker(b) => b.session_state(),
        }
    }
}
