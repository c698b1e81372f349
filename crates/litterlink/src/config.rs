//! CLI configuration: thin wrapper around `litterlink_config`.
//!
//! Adds resolution that respects `GlobalOpts` overrides (--timezone,
//! --timeout, --diagnostics) on top of the shared profile translation.

use std::time::Duration;

use chrono_tz::Tz;

use litterlink_config::ConfigError;
use litterlink_core::LitterboxConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use litterlink_config::{Config, config_path, load_config, load_config_or_default};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.profile_name(global.profile.as_deref())
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
    available.sort_unstable();
    CliError::ProfileNotFound {
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
        path: config_path().display().to_string(),
        name,
    }
}

/// Load the config file and translate the active profile, applying flag
/// overrides last.
pub fn resolve(global: &GlobalOpts) -> Result<(String, Config, LitterboxConfig), CliError> {
    let cfg = load_config()?;
    let (name, profile) = match cfg.profile(global.profile.as_deref()) {
        Ok(found) => found,
        Err(ConfigError::UnknownProfile { name }) => return Err(profile_not_found(&cfg, name)),
        Err(e) => return Err(e.into()),
    };

    let mut litterbox = litterlink_config::profile_to_litterbox_config(profile, &name, &cfg.defaults)?;

    if let Some(ref raw) = global.timezone {
        litterbox.timezone = raw.parse::<Tz>().map_err(|_| CliError::Validation {
            field: "timezone".into(),
            reason: format!("unknown IANA zone '{raw}'"),
        })?;
    }
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least one second".into(),
            });
        }
        litterbox.timeout = Duration::from_secs(secs);
    }
    if global.diagnostics {
        litterbox.diagnostics = true;
    }

    Ok((name, cfg, litterbox))
}
