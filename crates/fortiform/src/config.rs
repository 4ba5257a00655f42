//! CLI configuration: thin wrapper around `fortiform_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--url, --token, --insecure, --timeout, --state, --output, --color).

use std::path::PathBuf;
use std::time::Duration;

use clap::parser::ValueSource;
use clap::{ArgMatches, ValueEnum};
use secrecy::SecretString;
use tracing::warn;

use fortiform_core::{AuthCredentials, DEFAULT_STATE_FILE, ProviderConfig, TlsVerification};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use fortiform_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the connection settings for this invocation.
///
/// With no matching profile, `--url` plus `--token` is enough to connect.
pub fn resolve_provider_config(global: &GlobalOpts) -> Result<ProviderConfig, CliError> {
    let config = load_config_or_default();

    match config.profile(global.profile.as_deref()) {
        Ok((name, profile)) => resolve_profile(profile, name, global, &config),
        Err(fortiform_config::ConfigError::UnknownProfile { name }) if global.profile.is_some() => {
            Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(&config),
            })
        }
        Err(_) => resolve_ad_hoc(global, &config),
    }
}

/// Translate a `Profile` + global flags into a `ProviderConfig`.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    global: &GlobalOpts,
    config: &Config,
) -> Result<ProviderConfig, CliError> {
    let url_str = global.url.as_deref().unwrap_or(&profile.url);
    let url = fortiform_config::parse_url(url_str)?;

    let auth = match &global.token {
        Some(token) => AuthCredentials::Token(SecretString::from(token.clone())),
        None => fortiform_config::resolve_auth(profile, profile_name).map_err(|e| match e {
            fortiform_config::ConfigError::NoCredentials { profile } => {
                CliError::NoCredentials { profile }
            }
            other => other.into(),
        })?,
    };

    let mut provider = fortiform_config::provider_config(profile, &config.defaults, url, auth);
    if global.insecure {
        provider.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(timeout) = global.timeout {
        provider.timeout = Duration::from_secs(timeout);
    }
    Ok(provider)
}

fn resolve_ad_hoc(global: &GlobalOpts, config: &Config) -> Result<ProviderConfig, CliError> {
    let Some(url_str) = global.url.as_deref() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };
    let Some(token) = global.token.clone() else {
        return Err(CliError::NoCredentials {
            profile: "(none)".into(),
        });
    };

    let url = fortiform_config::parse_url(url_str)?;
    let mut provider = ProviderConfig::new(url, AuthCredentials::Token(SecretString::from(token)));
    provider.timeout = Duration::from_secs(global.timeout.unwrap_or(config.defaults.timeout));
    Ok(provider)
}

/// Apply `[defaults] output` and `color` where neither a flag nor the
/// environment picked a value.
pub fn apply_output_defaults(global: &mut GlobalOpts, matches: &ArgMatches) {
    let defaulted = |id: &str| matches.value_source(id) == Some(ValueSource::DefaultValue);
    if !defaulted("output") && !defaulted("color") {
        return;
    }

    let defaults = load_config_or_default().defaults;
    if defaulted("output") {
        match OutputFormat::from_str(&defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => warn!(value = %defaults.output, "ignoring unknown defaults.output"),
        }
    }
    if defaulted("color") {
        match ColorMode::from_str(&defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => warn!(value = %defaults.color, "ignoring unknown defaults.color"),
        }
    }
}

/// State file for this invocation: `--state`, then `defaults.state`.
pub fn state_path(global: &GlobalOpts) -> PathBuf {
    global
        .state
        .clone()
        .or_else(|| load_config_or_default().defaults.state)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE))
}

pub fn available_profiles(config: &Config) -> String {
    if config.profiles.is_empty() {
        "(none)".into()
    } else {
        config
            .profiles
            .keys()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
