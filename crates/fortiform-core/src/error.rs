// ── Core error types ──
//
// User-facing errors from fortiform-core. Transport-level failures from
// fortiform-api are either translated into domain variants or carried
// inside `Operation`, which adds the verb and resource title.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// The lifecycle step that failed, as it reads in messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Creating,
    Reading,
    Updating,
    Deleting,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to FortiManager at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("FortiManager request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    // ── Lookup errors ────────────────────────────────────────────────
    #[error("Unknown resource type: {type_name}")]
    UnknownResourceType { type_name: String },

    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("{resource} requires path parameter '{param}'")]
    MissingParam { resource: String, param: String },

    #[error("{resource} has no path parameter '{param}'")]
    UnknownParam { resource: String, param: String },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Cannot determine the key of {resource}: '{mkey}' is not set")]
    MissingKey { resource: String, mkey: String },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Error {verb} {resource} resource: {source}")]
    Operation {
        verb: Verb,
        resource: String,
        #[source]
        source: fortiform_api::Error,
    },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// FortiManager status code (if applicable).
        code: Option<i64>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("State error: {message}")]
    State { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Wrap an API failure with the step and resource it happened in.
    pub fn operation(verb: Verb, resource: &str, source: fortiform_api::Error) -> Self {
        Self::Operation {
            verb,
            resource: resource.to_owned(),
            source,
        }
    }

    /// The underlying API error, looking through `Operation`.
    pub fn api_error(&self) -> Option<&fortiform_api::Error> {
        match self {
            Self::Operation { source, .. } => Some(source),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<fortiform_api::Error> for CoreError {
    fn from(err: fortiform_api::Error) -> Self {
        use fortiform_api::Error as E;

        match err {
            E::Authentication { message } => CoreError::AuthenticationFailed { message },
            E::SessionExpired => CoreError::AuthenticationFailed {
                message: "Session expired -- re-authentication required".into(),
            },
            E::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout { timeout_secs: 0 }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(ToString::to_string)
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        code: None,
                    }
                }
            }
            E::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            E::Timeout { timeout_secs } => CoreError::Timeout { timeout_secs },
            E::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            E::NotFound { url } => CoreError::NotFound {
                entity_type: "object".into(),
                identifier: url,
            },
            err @ E::Http { .. } => CoreError::Api {
                message: err.to_string(),
                code: None,
            },
            E::Api { code, message, url } => CoreError::Api {
                message: format!("{message} ({url})"),
                code: Some(code),
            },
            err @ (E::AlreadyExists { .. } | E::Permission { .. }) => CoreError::Api {
                code: err.api_code(),
                message: err.to_string(),
            },
            E::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
            E::EmptyResult { url } => {
                CoreError::Internal(format!("Empty JSON-RPC result for {url}"))
            }
        }
    }
}
