// ── Runtime connection configuration ──
//
// These types describe how to reach a FortiManager. They carry credential
// data and connection tuning but never touch disk; the CLI builds a
// `ProviderConfig` from a profile and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use fortiform_api::transport::{TlsMode, TransportConfig};
use fortiform_api::DEFAULT_RETRIES;
use secrecy::SecretString;
use url::Url;

/// How to authenticate with FortiManager.
///
/// Carries the credential data; `fortiform_api::AuthStrategy` is the
/// data-less marker.
#[derive(Debug, Clone)]
pub enum AuthCredentials {
    /// `exec /sys/login/user` with an admin account.
    Session {
        username: String,
        password: SecretString,
    },
    /// REST API administrator token.
    Token(SecretString),
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification. FortiManager ships with a self-signed certificate.
    #[default]
    DangerAcceptInvalid,
}

/// Configuration for one FortiManager connection.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// FortiManager URL (e.g. `https://fmg.example.net`).
    pub url: Url,
    pub auth: AuthCredentials,
    /// ADOM whose workspace is locked around writes.
    pub adom: String,
    /// Wrap writes in lock/commit/unlock.
    pub workspace_mode: bool,
    pub tls: TlsVerification,
    pub timeout: Duration,
    /// Extra attempts for transient transport failures.
    pub retries: u32,
}

impl ProviderConfig {
    pub fn new(url: Url, auth: AuthCredentials) -> Self {
        Self {
            url,
            auth,
            adom: "root".into(),
            workspace_mode: false,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            retries: DEFAULT_RETRIES,
        }
    }

    pub(crate) fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
