// ── Litterbox facade ──
//
// The one entry point consumers use. Holds a single backend, the clock,
// and the snapshot of the last successful fetch. Nothing here branches on
// which vendor the backend talks to.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use litterlink_api::SessionState;
use tracing::{debug, info, warn};

use crate::backend::{AnyBackend, Backend, FetchRequest};
use crate::backfill::{FetchSummary, diag};
use crate::clock::{Clock, SystemClock};
use crate::config::LitterboxConfig;
use crate::error::CoreError;
use crate::model::{DeviceStatus, Pet, Vendor, VisitRecord};
use crate::store::{Snapshot, SnapshotStore};

/// Vendor-neutral litter box client.
///
/// ```no_run
/// # async fn demo() -> Result<(), litterlink_core::CoreError> {
/// use litterlink_core::{Litterbox, LitterboxConfig};
///
/// let config = LitterboxConfig::whisker("me@example.com", "hunter2".into());
/// let mut litterbox = Litterbox::new(config)?;
/// litterbox.login().await?;
/// litterbox.fetch_all_data(50).await?;
/// for visit in litterbox.visit_records() {
///     println!("{} {} {:.1} lb", visit.timestamp, visit.action, visit.weight_lbs);
/// }
/// # Ok(())
/// # }
/// ```
pub struct Litterbox<B: Backend = AnyBackend> {
    backend: B,
    clock: Arc<dyn Clock>,
    timezone: Tz,
    /// Local date fixed by `sync_clock`.
    pinned_today: Option<NaiveDate>,
    diagnostics: bool,
    store: SnapshotStore,
}

impl Litterbox<AnyBackend> {
    /// Build the backend `config` selects, using the system clock.
    pub fn new(config: LitterboxConfig) -> Result<Self, CoreError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: LitterboxConfig, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        let backend = AnyBackend::from_config(&config, clock.now())?;
        let mut litterbox = Self::from_backend(backend, config.timezone, clock);
        litterbox.set_diagnostics(config.diagnostics);
        Ok(litterbox)
    }
}

impl<B: Backend> Litterbox<B> {
    pub fn from_backend(backend: B, timezone: Tz, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            timezone,
            pinned_today: None,
            diagnostics: false,
            store: SnapshotStore::new(),
        }
    }

    pub fn vendor(&self) -> Vendor {
        self.backend.vendor()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    pub fn session_state(&self) -> SessionState {
        self.backend.session_state()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session_state().is_authenticated()
    }

    /// Raise skip and failure logging from `debug` to `warn`.
    pub fn set_diagnostics(&mut self, enabled: bool) {
        self.diagnostics = enabled;
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Authenticate with the vendor. A failure leaves no session behind.
    ///
    /// Rejected credentials, an unknown region and an unreachable vendor
    /// all satisfy [`CoreError::is_login_failure`]; the variant still tells
    /// them apart.
    pub async fn login(&mut self) -> Result<(), CoreError> {
        info!(vendor = %self.vendor(), "logging in");
        match self.backend.login().await {
            Ok(()) => Ok(()),
            Err(e) if e.is_login_failure() => {
                diag!(self.diagnostics, vendor = %self.vendor(), error = %e, "login failed");
                Err(e)
            }
            Err(e) => {
                warn!(vendor = %self.vendor(), error = %e, "unexpected login response");
                Err(e)
            }
        }
    }

    /// Read the clock and pin its local date as "today" for later fetches.
    pub fn sync_clock(&mut self) -> DateTime<Tz> {
        let local = self.clock.now().with_timezone(&self.timezone);
        self.pinned_today = Some(local.date_naive());
        debug!(%local, "clock synced");
        local
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Retrieve pets, visit history and device status, replacing the
    /// previous snapshot in one step.
    ///
    /// `depth` is days of history for PetKit and a per-entity record limit
    /// for Whisker. Without a session this fails with
    /// [`CoreError::NotAuthenticated`] and the previous snapshot stays.
    pub async fn fetch_all_data(&mut self, depth: u32) -> Result<FetchSummary, CoreError> {
        if !self.is_logged_in() {
            return Err(CoreError::NotAuthenticated);
        }

        let now = self.clock.now();
        let today = self
            .pinned_today
            .unwrap_or_else(|| now.with_timezone(&self.timezone).date_naive());
        let request = FetchRequest {
            depth,
            today,
            now,
            diagnostics: self.diagnostics,
        };
        debug!(vendor = %self.vendor(), depth, %today, "fetching history");

        let fetched = self.backend.fetch_history(request).await?;
        let snapshot = Snapshot::build(fetched.pets, fetched.visits, fetched.statuses, now);

        let summary = FetchSummary {
            pets: snapshot.pets.len(),
            visits: snapshot.visits.len(),
            statuses: snapshot.statuses.len(),
            ..fetched.summary
        };
        if summary.all_pages_failed() {
            warn!(
                pages = summary.pages_attempted,
                "every history page failed; snapshot has no history"
            );
        }
        info!(
            vendor = %self.vendor(),
            pets = summary.pets,
            visits = summary.visits,
            statuses = summary.statuses,
            pages_failed = summary.pages_failed,
            records_skipped = summary.records_skipped,
            "fetch complete"
        );

        self.store.replace(snapshot);
        Ok(summary)
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// Everything from the last successful fetch.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.load()
    }

    pub fn pets(&self) -> Vec<Pet> {
        self.store.load().pets.clone()
    }

    /// Newest first.
    pub fn visit_records(&self) -> Vec<VisitRecord> {
        self.store.load().visits.clone()
    }

    /// Current status of every device, newest first.
    pub fn statuses(&self) -> Vec<DeviceStatus> {
        self.store.load().statuses.clone()
    }

    /// Most recent device status, or [`DeviceStatus::unknown`] before the
    /// first fetch that reported one.
    pub fn latest_status(&self) -> DeviceStatus {
        self.store
            .load()
            .latest_status()
            .cloned()
            .unwrap_or_else(|| DeviceStatus::unknown(self.vendor()))
    }

    pub fn pet(&self, id: &str) -> Option<Pet> {
        self.store.load().pet(id).cloned()
    }

    pub fn pet_by_name(&self, name: &str) -> Option<Pet> {
        self.store.load().pet_by_name(name).cloned()
    }

    /// Visits for pet `id`, newest first. Empty for unknown ids.
    pub fn visit_records_for_pet(&self, id: &str) -> Vec<VisitRecord> {
        self.store.load().visits_for_pet(id)
    }

    pub fn visit_records_for_pet_name(&self, name: &str) -> Vec<VisitRecord> {
        self.store.load().visits_for_pet_name(name)
    }
}
