//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use litterlink_config::ConfigError;
use litterlink_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach {url}")]
    #[diagnostic(
        code(litterlink::connection_failed),
        help("Check your network connection. Reason: {reason}")
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(litterlink::timeout),
        help("Increase timeout with --timeout or in the profile.")
    )]
    Timeout { seconds: u64 },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(litterlink::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Store a new password with: litterlink config set-password -p {profile}"
        )
    )]
    AuthFailed { message: String, profile: String },

    #[error("PetKit region '{region}' is not served")]
    #[diagnostic(
        code(litterlink::region_not_found),
        help("Use the region name or id shown in the PetKit app, e.g. \"US1\".")
    )]
    RegionNotFound { region: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(litterlink::no_credentials),
        help(
            "Set `username` and `password_env` in the profile, export LITTERLINK_PASSWORD,\n\
             or run: litterlink config set-password -p {profile}"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(litterlink::not_found),
        help("Run: litterlink {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(litterlink::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(litterlink::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(litterlink::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Add one under [profiles.{name}] in: {path}"
        )
    )]
    ProfileNotFound {
        name: String,
        available: String,
        path: String,
    },

    #[error(transparent)]
    #[diagnostic(code(litterlink::config))]
    Config(Box<figment::Error>),

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render JSON: {0}")]
    #[diagnostic(code(litterlink::json))]
    Json(#[from] serde_json::Error),

    #[error("Could not render YAML: {0}")]
    #[diagnostic(code(litterlink::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::RegionNotFound { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to errors that mention it.
    pub fn with_profile(self, name: &str) -> Self {
        match self {
            Self::AuthFailed { message, .. } => Self::AuthFailed {
                message,
                profile: name.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Authentication { message } => CliError::AuthFailed {
                message,
                profile: "default".into(),
            },

            CoreError::NotAuthenticated => CliError::AuthFailed {
                message: "no active session".into(),
                profile: "default".into(),
            },

            CoreError::RegionNotFound { region } => CliError::RegionNotFound { region },

            CoreError::ConnectionFailed { url, reason } => {
                CliError::ConnectionFailed { url, reason }
            }

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::Api {
                message,
                code,
                status,
            } => CliError::ApiError {
                code: code
                    .or_else(|| status.map(|s| s.to_string()))
                    .unwrap_or_else(|| "unknown".into()),
                message,
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
                path: litterlink_config::config_path().display().to_string(),
            },
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn auth_and_connection_exit_codes() {
        let auth: CliError = CoreError::Authentication {
            message: "bad password".into(),
        }
        .into();
        assert_eq!(auth.exit_code(), exit_code::AUTH);

        let region: CliError = CoreError::RegionNotFound {
            region: "US9".into(),
        }
        .into();
        assert_eq!(region.exit_code(), exit_code::AUTH);

        let conn: CliError = CoreError::ConnectionFailed {
            url: "https://passport.petkt.com".into(),
            reason: "dns".into(),
        }
        .into();
        assert_eq!(conn.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn api_code_falls_back_to_status() {
        let err: CliError = CoreError::Api {
            message: "boom".into(),
            code: None,
            status: Some(502),
        }
        .into();
        match err {
            CliError::ApiError { code, .. } => assert_eq!(code, "502"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn profile_is_attached_to_auth_errors() {
        let err = CliError::from(CoreError::Authentication {
            message: "nope".into(),
        })
        .with_profile("upstairs");
        assert!(err.to_string().contains("nope"));
        assert!(matches!(err, CliError::AuthFailed { ref profile, .. } if profile == "upstairs"));
    }
}
