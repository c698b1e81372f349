// ── Runtime backend configuration ──
//
// These types describe which vendor to talk to and with what identity.
// They carry credential data and tuning, but never touch disk. The CLI
// (via litterlink-config) builds a `LitterboxConfig` and hands it in.

use std::time::Duration;

use chrono_tz::Tz;
use litterlink_api::{PetKitEndpoints, WhiskerEndpoints};
use secrecy::SecretString;

use crate::model::Vendor;

/// Vendor selection plus the vendor-specific settings it needs.
#[derive(Debug, Clone)]
pub enum VendorConfig {
    PetKit {
        /// Region name or id as listed by the passport server (`"US1"`).
        region: String,
        endpoints: PetKitEndpoints,
    },
    Whisker {
        endpoints: WhiskerEndpoints,
    },
}

impl VendorConfig {
    pub fn vendor(&self) -> Vendor {
        match self {
            Self::PetKit { .. } => Vendor::PetKit,
            Self::Whisker { .. } => Vendor::Whisker,
        }
    }
}

/// Everything needed to construct a [`Litterbox`](crate::Litterbox).
#[derive(Debug, Clone)]
pub struct LitterboxConfig {
    pub vendor: VendorConfig,
    pub username: String,
    pub password: SecretString,
    /// Zone that defines "today" for day-by-day backfill.
    pub timezone: Tz,
    /// Raise skipped-page and skipped-record logging from debug to warn.
    pub diagnostics: bool,
    /// Per-request budget.
    pub timeout: Duration,
}

impl LitterboxConfig {
    /// PetKit account in `region`, production endpoints, UTC.
    pub fn petkit(
        username: impl Into<String>,
        password: SecretString,
        region: impl Into<String>,
    ) -> Self {
        Self::with_vendor(
            VendorConfig::PetKit {
                region: region.into(),
                endpoints: PetKitEndpoints::default(),
            },
            username,
            password,
        )
    }

    /// Whisker account, production endpoints, UTC.
    pub fn whisker(username: impl Into<String>, password: SecretString) -> Self {
        Self::with_vendor(
            VendorConfig::Whisker {
                endpoints: WhiskerEndpoints::default(),
            },
            username,
            password,
        )
    }

    fn with_vendor(vendor: VendorConfig, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            vendor,
            username: username.into(),
            password,
            timezone: Tz::UTC,
            diagnostics: false,
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
