//! Shared configuration for the litterlink CLI and embedding programs.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `litterlink_core::LitterboxConfig`. The CLI layers
//! its global flags on top of what this crate resolves.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use litterlink_api::{PetKitEndpoints, WhiskerEndpoints};
use litterlink_core::{LitterboxConfig, Vendor, VendorConfig};

const KEYRING_SERVICE: &str = "litterlink";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found in config")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when `--profile` is not given.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named account profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// The profile name in effect: `requested`, then `default_profile`,
    /// then `"default"`.
    pub fn profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(ToOwned::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Look up the profile [`Config::profile_name`] picks.
    pub fn profile(&self, requested: Option<&str>) -> Result<(String, &Profile), ConfigError> {
        let name = self.profile_name(requested);
        let profile = self
            .profiles
            .get(&name)
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.clone() })?;
        Ok((name, profile))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// IANA zone used when a profile sets none.
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Request timeout, seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// History depth for `visits` when `--depth` is not given.
    #[serde(default = "default_depth")]
    pub depth: u32,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timezone: default_timezone(),
            timeout: default_timeout(),
            depth: default_depth(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timezone() -> String {
    "UTC".into()
}
fn default_timeout() -> u64 {
    15
}
fn default_depth() -> u32 {
    7
}

/// A named vendor account.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Profile {
    /// `"petkit"` or `"whisker"` (`"litter-robot"` is accepted too).
    pub vendor: String,

    pub username: Option<String>,

    /// Plaintext password. Prefer the keyring or `password_env`.
    pub password: Option<String>,

    /// Environment variable holding the password.
    pub password_env: Option<String>,

    /// PetKit region name or id, e.g. "US1".
    pub region: Option<String>,

    /// IANA zone that defines "today" for backfill.
    pub timezone: Option<String>,

    pub timeout: Option<u64>,

    pub diagnostics: Option<bool>,

    // Endpoint overrides, mostly for staging and tests.
    pub passport_url: Option<String>,
    pub cognito_url: Option<String>,
    pub cognito_client_id: Option<String>,
    pub pet_graphql_url: Option<String>,
    pub robot_graphql_url: Option<String>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "litterlink", "litterlink").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("litterlink");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` merged with `LITTERLINK_*` variables.
///
/// Nested keys use a double underscore:
/// `LITTERLINK_PROFILES__HOME__REGION=EU1`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LITTERLINK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Account name from the profile, else `LITTERLINK_USERNAME`.
pub fn resolve_username(profile: &Profile, profile_name: &str) -> Result<String, ConfigError> {
    profile
        .username
        .clone()
        .or_else(|| std::env::var("LITTERLINK_USERNAME").ok())
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve the account password from the credential chain.
pub fn resolve_password(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    resolve_password_with(profile, profile_name, |name| std::env::var(name).ok())
}

fn resolve_password_with(
    profile: &Profile,
    profile_name: &str,
    env: impl Fn(&str) -> Option<String>,
) -> Result<SecretString, ConfigError> {
    // 1. Profile's password_env → env var lookup
    if let Some(pw) = profile.password_env.as_deref().and_then(&env) {
        return Ok(SecretString::from(pw));
    }

    // 2. Global env var
    if let Some(pw) = env("LITTERLINK_PASSWORD") {
        return Ok(SecretString::from(pw));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")) {
        if let Ok(pw) = entry.get_password() {
            return Ok(SecretString::from(pw));
        }
    }

    // 4. Plaintext in config
    if let Some(ref pw) = profile.password {
        return Ok(SecretString::from(pw.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store `password` in the system keyring for `profile_name`.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .and_then(|entry| entry.set_password(password))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Profile → LitterboxConfig ───────────────────────────────────────

fn parse_vendor(raw: &str) -> Result<Vendor, ConfigError> {
    Vendor::from_str(raw).map_err(|_| ConfigError::Validation {
        field: "vendor".into(),
        reason: format!("expected 'petkit' or 'whisker', got '{raw}'"),
    })
}

fn parse_timezone(raw: &str) -> Result<Tz, ConfigError> {
    raw.parse::<Tz>().map_err(|_| ConfigError::Validation {
        field: "timezone".into(),
        reason: format!("unknown IANA zone '{raw}'"),
    })
}

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

fn vendor_config(vendor: Vendor, profile: &Profile) -> Result<VendorConfig, ConfigError> {
    match vendor {
        Vendor::PetKit => {
            let region = profile
                .region
                .clone()
                .filter(|r| !r.trim().is_empty())
                .ok_or_else(|| ConfigError::Validation {
                    field: "region".into(),
                    reason: "PetKit profiles need a region, e.g. \"US1\"".into(),
                })?;
            let mut endpoints = PetKitEndpoints::default();
            if let Some(ref raw) = profile.passport_url {
                endpoints.passport = parse_url("passport_url", raw)?;
            }
            Ok(VendorConfig::PetKit { region, endpoints })
        }
        Vendor::Whisker => {
            let mut endpoints = WhiskerEndpoints::default();
            if let Some(ref raw) = profile.cognito_url {
                endpoints.cognito = parse_url("cognito_url", raw)?;
            }
            if let Some(ref id) = profile.cognito_client_id {
                endpoints.client_id.clone_from(id);
            }
            if let Some(ref raw) = profile.pet_graphql_url {
                endpoints.pet_graphql = parse_url("pet_graphql_url", raw)?;
            }
            if let Some(ref raw) = profile.robot_graphql_url {
                endpoints.robot_graphql = parse_url("robot_graphql_url", raw)?;
            }
            Ok(VendorConfig::Whisker { endpoints })
        }
    }
}

/// Build a `LitterboxConfig` from a profile, with `defaults` filling in
/// whatever the profile leaves unset.
///
/// Settings are validated before any credential lookup, so a broken
/// profile fails the same way with or without a keyring.
pub fn profile_to_litterbox_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
) -> Result<LitterboxConfig, ConfigError> {
    let vendor = vendor_config(parse_vendor(&profile.vendor)?, profile)?;
    let timezone = parse_timezone(profile.timezone.as_deref().unwrap_or(&defaults.timezone))?;
    let timeout = profile.timeout.unwrap_or(defaults.timeout);
    if timeout == 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "must be at least one second".into(),
        });
    }

    let username = resolve_username(profile, profile_name)?;
    let password = resolve_password(profile, profile_name)?;

    Ok(LitterboxConfig {
        vendor,
        username,
        password,
        timezone,
        diagnostics: profile.diagnostics.unwrap_or(false),
        timeout: Duration::from_secs(timeout),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use secrecy::ExposeSecret;

    use super::*;

    fn petkit_profile() -> Profile {
        Profile {
            vendor: "petkit".into(),
            username: Some("me@example.com".into()),
            password: Some("plain".into()),
            region: Some("US1".into()),
            ..Profile::default()
        }
    }

    fn validation_field(err: ConfigError) -> String {
        match err {
            ConfigError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn loads_profiles_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
default_profile = "cats"

[defaults]
timezone = "Europe/Berlin"

[profiles.cats]
vendor = "whisker"
username = "me@example.com"
diagnostics = true

[profiles.upstairs]
vendor = "petkit"
region = "EU1"
timeout = 30
"#,
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timezone, "Europe/Berlin");
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.defaults.depth, 7);

        let (name, profile) = cfg.profile(None).unwrap();
        assert_eq!(name, "cats");
        assert_eq!(cfg.profile_name(Some("attic")), "attic");
        assert_eq!(profile.vendor, "whisker");
        assert_eq!(profile.diagnostics, Some(true));

        let (_, upstairs) = cfg.profile(Some("upstairs")).unwrap();
        assert_eq!(upstairs.region.as_deref(), Some("EU1"));
        assert!(matches!(
            cfg.profile(Some("attic")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert("default".into(), petkit_profile());
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        let (_, profile) = loaded.profile(None).unwrap();
        assert_eq!(profile.region.as_deref(), Some("US1"));
        assert_eq!(profile.username.as_deref(), Some("me@example.com"));
    }

    #[test]
    fn petkit_profile_translates() {
        let mut profile = petkit_profile();
        profile.timezone = Some("America/Chicago".into());
        profile.passport_url = Some("http://127.0.0.1:9000".into());

        let cfg = profile_to_litterbox_config(&profile, "default", &Defaults::default()).unwrap();
        assert_eq!(cfg.timezone, chrono_tz::America::Chicago);
        assert_eq!(cfg.timeout, Duration::from_secs(15));
        assert!(!cfg.diagnostics);
        match cfg.vendor {
            VendorConfig::PetKit { region, endpoints } => {
                assert_eq!(region, "US1");
                assert_eq!(endpoints.passport.as_str(), "http://127.0.0.1:9000/");
            }
            VendorConfig::Whisker { .. } => panic!("expected PetKit"),
        }
    }

    #[test]
    fn whisker_alias_and_default_timezone() {
        let profile = Profile {
            vendor: "Litter-Robot".into(),
            username: Some("me@example.com".into()),
            password: Some("plain".into()),
            cognito_client_id: Some("override".into()),
            ..Profile::default()
        };
        let defaults = Defaults {
            timezone: "Asia/Tokyo".into(),
            ..Defaults::default()
        };

        let cfg = profile_to_litterbox_config(&profile, "default", &defaults).unwrap();
        assert_eq!(cfg.vendor.vendor(), Vendor::Whisker);
        assert_eq!(cfg.timezone, chrono_tz::Asia::Tokyo);
        match cfg.vendor {
            VendorConfig::Whisker { endpoints } => assert_eq!(endpoints.client_id, "override"),
            VendorConfig::PetKit { .. } => panic!("expected Whisker"),
        }
    }

    #[test]
    fn unknown_vendor_rejected() {
        let profile = Profile {
            vendor: "catgenie".into(),
            ..petkit_profile()
        };
        let err = profile_to_litterbox_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert_eq!(validation_field(err), "vendor");
    }

    #[test]
    fn bad_timezone_rejected() {
        let profile = Profile {
            timezone: Some("Mars/Olympus".into()),
            ..petkit_profile()
        };
        let err = profile_to_litterbox_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert_eq!(validation_field(err), "timezone");
    }

    #[test]
    fn petkit_without_region_rejected() {
        let profile = Profile {
            region: Some("  ".into()),
            ..petkit_profile()
        };
        let err = profile_to_litterbox_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert_eq!(validation_field(err), "region");
    }

    #[test]
    fn bad_endpoint_override_rejected() {
        let profile = Profile {
            vendor: "whisker".into(),
            robot_graphql_url: Some("not a url".into()),
            ..petkit_profile()
        };
        let err = profile_to_litterbox_config(&profile, "p", &Defaults::default()).unwrap_err();
        assert_eq!(validation_field(err), "robot_graphql_url");
    }

    #[test]
    fn password_env_wins_over_plaintext() {
        let profile = Profile {
            password_env: Some("CAT_PW".into()),
            ..petkit_profile()
        };
        let env = |name: &str| (name == "CAT_PW").then(|| "from-env".to_owned());

        let pw = resolve_password_with(&profile, "p", env).unwrap();
        assert_eq!(pw.expose_secret(), "from-env");
    }

    #[test]
    fn global_env_password_used_when_profile_env_unset() {
        let profile = Profile {
            password_env: Some("UNSET_VAR".into()),
            ..petkit_profile()
        };
        let env = |name: &str| (name == "LITTERLINK_PASSWORD").then(|| "global".to_owned());

        let pw = resolve_password_with(&profile, "p", env).unwrap();
        assert_eq!(pw.expose_secret(), "global");
    }
}
