//! CLI error types with miette diagnostics.
//!
//! Maps `qradar_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use qradar_config::ConfigError;

/// Process exit codes.
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
    #[error("Could not connect to QRadar console")]
    #[diagnostic(
        code(qradar::connection_failed),
        help(
            "Check that the console is reachable and the URL is correct.\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed {
        #[source]
        source: qradar_api::Error,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(qradar::timeout),
        help("Increase the timeout with --timeout or narrow the query with --range.")
    )]
    Timeout {
        #[source]
        source: qradar_api::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(qradar::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) for self-signed consoles.")
    )]
    Tls { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(qradar::auth_failed),
        help(
            "Verify the authorized service token and its security profile.\n\
             Tokens are managed under Admin > Authorized Services on the console."
        )
    )]
    AuthFailed { message: String },

    #[error("No API token configured for profile '{profile}'")]
    #[diagnostic(
        code(qradar::no_credentials),
        help("Set QRADAR_TOKEN, pass --token, or add `token_env` to the profile.")
    )]
    NoCredentials { profile: String },

    #[error("No console configured")]
    #[diagnostic(
        code(qradar::no_config),
        help("Pass --console / QRADAR_CONSOLE, or create a profile in {path}")
    )]
    NoConfig { path: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(qradar::not_found),
        help("Run: qradar {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("API error (HTTP {status}): {message}")]
    #[diagnostic(code(qradar::api_error))]
    ApiError { status: u16, message: String },

    #[error(transparent)]
    #[diagnostic(code(qradar::client_error))]
    Client(qradar_api::Error),

    // ── Input ────────────────────────────────────────────────────────
    #[error("invalid {field}: {reason}")]
    #[diagnostic(code(qradar::validation))]
    Validation { field: String, reason: String },

    // ── Config / IO ──────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(qradar::config))]
    Config(ConfigError),

    #[error(transparent)]
    #[diagnostic(code(qradar::io))]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Tls { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoConfig { .. } => exit_code::USAGE,
            Self::ApiError { .. } | Self::Client(_) | Self::Config(_) | Self::Io(_) => {
                exit_code::GENERAL
            }
        }
    }

    /// Map a library error, naming the resource for 404s.
    pub fn from_api(err: qradar_api::Error, resource_type: &str, identifier: &str) -> Self {
        if err.is_not_found() {
            return Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                list_command: format!("{resource_type}s list"),
            };
        }
        err.into()
    }
}

impl From<qradar_api::Error> for CliError {
    fn from(err: qradar_api::Error) -> Self {
        use qradar_api::Error as E;

        if err.is_auth_failure() {
            return Self::AuthFailed {
                message: err.to_string(),
            };
        }
        match err {
            E::Transport(ref e) if e.is_timeout() => Self::Timeout { source: err },
            E::Transport(ref e) if e.is_connect() => Self::ConnectionFailed { source: err },
            E::Tls(message) => Self::Tls { message },
            E::Api {
                status, message, ..
            } => Self::ApiError { status, message },
            other => Self::Client(other),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
