//! Configuration for the fortiform CLI.
//!
//! TOML profiles, credential resolution (env + keyring + plaintext),
//! and translation to `fortiform_core::ProviderConfig`. The CLI resolves
//! its flag overrides for URL and credentials before translating, and
//! applies the rest on top.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fortiform_core::{AuthCredentials, ProviderConfig, TlsVerification};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "fortiform";

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "FORTIFORM_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{name}' not found")]
    UnknownProfile { name: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

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
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named FortiManager profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Look up a profile, falling back to `default_profile`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, p)| (k.as_str(), p))
            .ok_or_else(|| ConfigError::UnknownProfile { name: name.into() })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// State file used when `--state` is not given.
    #[serde(default)]
    pub state: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            state: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named FortiManager profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// FortiManager base URL (e.g., "https://fmg.example.net").
    pub url: String,

    /// Auth mode: "session" or "token".
    #[serde(default = "default_auth_mode")]
    pub auth_mode: String,

    /// Admin username for session auth.
    pub username: Option<String>,

    /// Password (plaintext; prefer keyring or env var).
    pub password: Option<String>,

    /// API token (plaintext; prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the API token.
    pub token_env: Option<String>,

    /// ADOM used for workspace locking.
    #[serde(default = "default_adom")]
    pub adom: String,

    /// Lock/commit/unlock the ADOM workspace around writes.
    #[serde(default)]
    pub workspace_mode: bool,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS verification. Unset means accept FortiManager's
    /// self-signed certificate unless `ca_cert` is given.
    pub insecure: Option<bool>,

    /// Request timeout in seconds.
    pub timeout: Option<u64>,

    /// Extra attempts for transient failures.
    pub retries: Option<u32>,
}

fn default_auth_mode() -> String {
    "session".into()
}
fn default_adom() -> String {
    "root".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `FORTIFORM_CONFIG`, else platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "fortiform", "fortiform").map_or_else(
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
    p.push("fortiform");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical path + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file. Environment variables such as
/// `FORTIFORM_DEFAULT_PROFILE` or `FORTIFORM_DEFAULTS__TIMEOUT` override it.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("FORTIFORM_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if it cannot be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Keyring ─────────────────────────────────────────────────────────

fn keyring_entry(profile_name: &str, kind: &str) -> Result<keyring::Entry, ConfigError> {
    Ok(keyring::Entry::new(
        KEYRING_SERVICE,
        &format!("{profile_name}/{kind}"),
    )?)
}

fn keyring_secret(profile_name: &str, kind: &str) -> Option<SecretString> {
    keyring_entry(profile_name, kind)
        .ok()?
        .get_password()
        .ok()
        .map(SecretString::from)
}

/// Store a profile's password in the system keyring.
pub fn store_password(profile_name: &str, password: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "password")?.set_password(password)?;
    Ok(())
}

/// Store a profile's API token in the system keyring.
pub fn store_token(profile_name: &str, token: &str) -> Result<(), ConfigError> {
    keyring_entry(profile_name, "token")?.set_password(token)?;
    Ok(())
}

// ── Credential resolution (without CLI flags) ───────────────────────

/// Resolve an API token: `token_env` → `FORTIFORM_TOKEN` → keyring → plaintext.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    if let Some(val) = profile
        .token_env
        .as_deref()
        .and_then(|name| std::env::var(name).ok())
    {
        return Ok(SecretString::from(val));
    }

    if let Ok(val) = std::env::var("FORTIFORM_TOKEN") {
        return Ok(SecretString::from(val));
    }

    if let Some(secret) = keyring_secret(profile_name, "token") {
        return Ok(secret);
    }

    profile
        .token
        .clone()
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })
}

/// Resolve session credentials: `FORTIFORM_PASSWORD` → keyring → plaintext.
pub fn resolve_session_credentials(
    profile: &Profile,
    profile_name: &str,
) -> Result<(String, SecretString), ConfigError> {
    let username = profile
        .username
        .clone()
        .or_else(|| std::env::var("FORTIFORM_USERNAME").ok())
        .ok_or_else(|| ConfigError::NoCredentials {
            profile: profile_name.into(),
        })?;

    if let Ok(pw) = std::env::var("FORTIFORM_PASSWORD") {
        return Ok((username, SecretString::from(pw)));
    }

    if let Some(pw) = keyring_secret(profile_name, "password") {
        return Ok((username, pw));
    }

    match &profile.password {
        Some(pw) => Ok((username, SecretString::from(pw.clone()))),
        None => Err(ConfigError::NoCredentials {
            profile: profile_name.into(),
        }),
    }
}

/// Resolve `AuthCredentials` from a profile's `auth_mode` field.
pub fn resolve_auth(profile: &Profile, profile_name: &str) -> Result<AuthCredentials, ConfigError> {
    match profile.auth_mode.as_str() {
        "session" => {
            let (username, password) = resolve_session_credentials(profile, profile_name)?;
            Ok(AuthCredentials::Session { username, password })
        }
        "token" => Ok(AuthCredentials::Token(resolve_token(profile, profile_name)?)),
        other => Err(ConfigError::Validation {
            field: "auth_mode".into(),
            reason: format!("expected 'session' or 'token', got '{other}'"),
        }),
    }
}

/// TLS mode implied by a profile.
pub fn profile_tls(profile: &Profile) -> TlsVerification {
    match (profile.insecure, &profile.ca_cert) {
        (Some(true), _) => TlsVerification::DangerAcceptInvalid,
        (_, Some(ca)) => TlsVerification::CustomCa(ca.clone()),
        (Some(false), None) => TlsVerification::SystemDefaults,
        (None, None) => TlsVerification::DangerAcceptInvalid,
    }
}

pub fn parse_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: "url".into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Build a `ProviderConfig` from a profile. URL and credentials are passed
/// in already resolved so the caller can apply its own overrides first.
pub fn provider_config(
    profile: &Profile,
    defaults: &Defaults,
    url: url::Url,
    auth: AuthCredentials,
) -> ProviderConfig {
    let mut config = ProviderConfig::new(url, auth);
    config.adom.clone_from(&profile.adom);
    config.workspace_mode = profile.workspace_mode;
    config.tls = profile_tls(profile);
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    if let Some(retries) = profile.retries {
        config.retries = retries;
    }
    config
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "lab"

[defaults]
output = "json"

[profiles.lab]
url = "https://fmg.lab.example"
username = "admin"
password = "plain"
adom = "branch"
workspace_mode = true
timeout = 45
retries = 3

[profiles.prod]
url = "https://fmg.example.net"
auth_mode = "token"
token = "t0k3n"
insecure = false
"#;

    fn sample() -> (tempfile::TempDir, Config) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let cfg = load_config_from(&path).unwrap();
        (dir, cfg)
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let (_dir, cfg) = sample();
        assert_eq!(cfg.defaults.output, "json");
        assert_eq!(cfg.defaults.timeout, 30);

        let (name, lab) = cfg.profile(None).unwrap();
        assert_eq!(name, "lab");
        assert_eq!(lab.auth_mode, "session");
        assert_eq!(lab.adom, "branch");

        let (_, prod) = cfg.profile(Some("prod")).unwrap();
        assert_eq!(prod.adom, "root");
        assert!(matches!(
            cfg.profile(Some("nope")),
            Err(ConfigError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn profile_translates_to_provider_config() {
        let (_dir, cfg) = sample();
        let (_, lab) = cfg.profile(Some("lab")).unwrap();
        let auth = resolve_auth(lab, "fortiform-test-lab").unwrap();
        let pc = provider_config(lab, &cfg.defaults, parse_url(&lab.url).unwrap(), auth);

        assert_eq!(pc.url.as_str(), "https://fmg.lab.example/");
        assert_eq!(pc.adom, "branch");
        assert!(pc.workspace_mode);
        assert_eq!(pc.timeout, Duration::from_secs(45));
        assert_eq!(pc.retries, 3);
        assert_eq!(pc.tls, TlsVerification::DangerAcceptInvalid);
        assert!(matches!(pc.auth, AuthCredentials::Session { ref username, .. } if username == "admin"));

        let (_, prod) = cfg.profile(Some("prod")).unwrap();
        let pc = provider_config(
            prod,
            &cfg.defaults,
            parse_url(&prod.url).unwrap(),
            AuthCredentials::Token(SecretString::from("t".to_owned())),
        );
        assert_eq!(pc.timeout, Duration::from_secs(cfg.defaults.timeout));
        assert_eq!(pc.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn tls_follows_insecure_and_ca() {
        let mut p = Profile::default();
        assert_eq!(profile_tls(&p), TlsVerification::DangerAcceptInvalid);
        p.insecure = Some(false);
        assert_eq!(profile_tls(&p), TlsVerification::SystemDefaults);
        p.ca_cert = Some("/etc/fmg-ca.pem".into());
        assert_eq!(
            profile_tls(&p),
            TlsVerification::CustomCa("/etc/fmg-ca.pem".into())
        );
        p.insecure = Some(true);
        assert_eq!(profile_tls(&p), TlsVerification::DangerAcceptInvalid);
    }

    #[test]
    fn bad_auth_mode_and_url_are_rejected() {
        let p = Profile {
            url: "not a url".into(),
            auth_mode: "kerberos".into(),
            ..Profile::default()
        };
        assert!(matches!(parse_url(&p.url), Err(ConfigError::Validation { .. })));
        assert!(matches!(
            resolve_auth(&p, "fortiform-test-bad"),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn save_round_trips() {
        let (dir, cfg) = sample();
        let out = dir.path().join("out").join("config.toml");
        save_config_to(&cfg, &out).unwrap();
        let again = load_config_from(&out).unwrap();
        assert_eq!(again.profiles, cfg.profiles);
        assert_eq!(again.default_profile.as_deref(), Some("lab"));
    }
}
