// ── Core error types ──
//
// Caller-facing errors from litterlink-core. Vendor wire details (HTTP
// bodies, envelope codes, GraphQL messages) are folded into a small set
// of kinds; the `From<litterlink_api::Error>` impl does the translation.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Region '{region}' is not served by the vendor")]
    RegionNotFound { region: String },

    #[error("Not logged in -- call login() before fetching data")]
    NotAuthenticated,

    // ── Transport ────────────────────────────────────────────────────
    #[error("Cannot reach {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Vendor API ───────────────────────────────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// Vendor error code, when the payload carried one.
        code: Option<String>,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Credentials, region, or token were rejected. Retrying with the same
    /// configuration will not help.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            Self::Authentication { .. } | Self::RegionNotFound { .. }
        )
    }

    /// What `login()` reports as "could not log in": an auth failure, or
    /// the vendor being unreachable.
    pub fn is_login_failure(&self) -> bool {
        self.is_auth_failure()
            || matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<litterlink_api::Error> for CoreError {
    fn from(err: litterlink_api::Error) -> Self {
        use litterlink_api::Error as ApiError;

        match err {
            ApiError::Authentication { message } => CoreError::Authentication { message },
            ApiError::SessionExpired => CoreError::Authentication {
                message: "Session rejected again after re-login".into(),
            },
            ApiError::RegionNotFound { region } => CoreError::RegionNotFound { region },
            ApiError::TokenDecode { message } => CoreError::Authentication {
                message: format!("Identity token unreadable: {message}"),
            },
            ApiError::NotAuthenticated => CoreError::NotAuthenticated,
            ApiError::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            ApiError::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            ApiError::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            ApiError::Http { status, body } => CoreError::Api {
                message: body,
                code: None,
                status: Some(status),
            },
            ApiError::Vendor { code, message } => CoreError::Api {
                message,
                code: Some(code.to_string()),
                status: None,
            },
            ApiError::GraphQl { message } => CoreError::Api {
                message,
                code: Some("graphql".into()),
                status: None,
            },
            ApiError::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("Unexpected response shape: {message}"),
                code: None,
                status: None,
            },
        }
    }
}
