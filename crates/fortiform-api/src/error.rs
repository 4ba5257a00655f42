use thiserror::Error;

/// Top-level error type for the `fortiform-api` crate.
///
/// Covers authentication, transport, and the status codes FortiManager
/// reports inside the JSON-RPC `result[].status` block.
/// `fortiform-core` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login failed (wrong credentials, account locked, etc.)
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Session token was rejected or has expired.
    #[error("Session expired -- re-authentication required")]
    SessionExpired,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Request timed out.
    #[error("Request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Non-success HTTP status before any JSON-RPC envelope was read.
    #[error("HTTP {status} from {url}: {message}")]
    Http {
        status: u16,
        message: String,
        url: String,
    },

    // ── JSON-RPC status codes ───────────────────────────────────────
    /// Generic non-zero status from FortiManager.
    #[error("FortiManager error {code} at {url}: {message}")]
    Api {
        code: i64,
        message: String,
        url: String,
    },

    /// Status -3: the addressed object does not exist.
    #[error("Object does not exist: {url}")]
    NotFound { url: String },

    /// Status -2: an object with the same key already exists.
    #[error("Object already exists: {url}")]
    AlreadyExists { url: String },

    /// Status -11: no permission for the resource (or invalid session).
    #[error("No permission for the resource: {url}")]
    Permission { url: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The response carried no `result` entry.
    #[error("Empty JSON-RPC result for {url}")]
    EmptyResult { url: String },
}

impl Error {
    /// Returns `true` if this error indicates auth has expired
    /// and re-authentication might resolve it.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, Self::Authentication { .. } | Self::SessionExpired)
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::NotFound { .. } => true,
            _ => false,
        }
    }

    /// Extract the FortiManager status code, if available. HTTP statuses
    /// are not status codes.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::Api { code, .. } => Some(*code),
            Self::NotFound { .. } => Some(-3),
            Self::AlreadyExists { .. } => Some(-2),
            Self::Permission { .. } => Some(-11),
            _ => None,
        }
    }
}
