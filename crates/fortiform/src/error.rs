//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with help
//! text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use fortiform_config::ConfigError;
use fortiform_core::CoreError;
use fortiform_api::Error as ApiError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to FortiManager at {url}")]
    #[diagnostic(
        code(fortiform::connection_failed),
        help(
            "Check that FortiManager is reachable and JSON-RPC is enabled.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(fortiform::auth_failed),
        help(
            "Verify the username/password or API token.\n\
             Run: fortiform config set-password --profile {profile}"
        )
    )]
    AuthFailed { profile: String, message: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(fortiform::no_credentials),
        help(
            "Configure credentials with: fortiform config init\n\
             Or set FORTIFORM_PASSWORD / FORTIFORM_TOKEN."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(fortiform::not_found),
        help("Run: fortiform {list_command}")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("{resource_type} '{identifier}' already exists")]
    #[diagnostic(
        code(fortiform::conflict),
        help("Use `fortiform import` to track an existing object, or pick another address.")
    )]
    Conflict {
        resource_type: String,
        identifier: String,
    },

    /// A lifecycle call failed; the message carries the verb and resource.
    #[error("{message}")]
    #[diagnostic(code(fortiform::operation_failed))]
    OperationFailed { message: String, exit: i32 },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(fortiform::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(fortiform::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(fortiform::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: fortiform config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No FortiManager configured")]
    #[diagnostic(
        code(fortiform::no_config),
        help(
            "Create a profile with: fortiform config init\n\
             Expected at: {path}\n\
             Or pass --url and --token."
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(fortiform::config))]
    Config { message: String },

    #[error("State file error: {message}")]
    #[diagnostic(
        code(fortiform::state),
        help("Inspect it with: fortiform state list")
    )]
    State { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(fortiform::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(fortiform::timeout),
        help("Increase timeout with --timeout or check FortiManager responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::OperationFailed { exit, .. } => *exit,
            _ => exit_code::GENERAL,
        }
    }
}

/// Exit code for an API failure inside a lifecycle call.
fn api_exit_code(err: &ApiError) -> i32 {
    match err {
        ApiError::Authentication { .. } | ApiError::SessionExpired => exit_code::AUTH,
        ApiError::Timeout { .. } => exit_code::TIMEOUT,
        ApiError::Transport(e) if e.is_timeout() => exit_code::TIMEOUT,
        ApiError::Transport(e) if e.is_connect() => exit_code::CONNECTION,
        ApiError::Tls(_) => exit_code::CONNECTION,
        _ => match err.api_code() {
            Some(-2) => exit_code::CONFLICT,
            Some(-3) => exit_code::NOT_FOUND,
            Some(-11) => exit_code::PERMISSION,
            _ => exit_code::GENERAL,
        },
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::AuthenticationFailed { message } => CliError::AuthFailed {
                profile: "<profile>".into(),
                message,
            },

            CoreError::Timeout { timeout_secs } => CliError::Timeout {
                seconds: timeout_secs,
            },

            CoreError::UnknownResourceType { type_name } => CliError::NotFound {
                resource_type: "Resource type".into(),
                identifier: type_name,
                list_command: "resources list".into(),
            },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                resource_type: entity_type,
                identifier,
                list_command: "state list".into(),
            },

            CoreError::MissingParam { resource, param } => CliError::Validation {
                field: param.clone(),
                reason: format!(
                    "{resource} requires it; pass --param {param}=VALUE \
                     (see: fortiform resources show {resource})"
                ),
            },

            CoreError::UnknownParam { resource, param } => CliError::Validation {
                field: param,
                reason: format!("not a path parameter of {resource}"),
            },

            CoreError::MissingKey { resource, mkey } => CliError::Validation {
                field: mkey,
                reason: format!("{resource} is keyed by this attribute; set it"),
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            err @ CoreError::Operation { .. } => {
                let exit = err.api_error().map_or(exit_code::GENERAL, api_exit_code);
                CliError::OperationFailed {
                    message: err.to_string(),
                    exit,
                }
            }

            CoreError::Api { message, code } => CliError::ApiError {
                code: code.map_or_else(|| "unknown".into(), |c| c.to_string()),
                message,
            },

            CoreError::State { message } => CliError::State { message },

            CoreError::Config { message } => CliError::Config { message },

            CoreError::Internal(message) => CliError::ApiError {
                code: "internal".into(),
                message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(see: fortiform config profiles)".into(),
            },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}
