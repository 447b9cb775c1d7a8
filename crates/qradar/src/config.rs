//! CLI configuration: a thin wrapper around `qradar_config` shared types.
//!
//! Adds CLI-specific resolution that respects `GlobalOpts` flag overrides
//! (--console, --token, --insecure, ...).

use std::time::Duration;

use clap::ValueEnum;
use qradar_api::{ClientConfig, TlsMode};
use secrecy::SecretString;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use qradar_config::{Config, Profile, config_path, load_config_or_default};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build a `ClientConfig` from config file, profile, and CLI overrides.
///
/// Flag > env > profile > defaults.
pub fn resolve_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        // Flag-supplied token skips the keyring lookup entirely.
        let token = match global.token {
            Some(ref t) => SecretString::from(t.clone()),
            None => qradar_config::resolve_token(profile, &profile_name)?,
        };
        return with_flag_overrides(profile, global, cfg, token);
    }

    // No profile -- build from flags / env alone.
    let console = global.console.as_deref().ok_or_else(|| CliError::NoConfig {
        path: config_path().display().to_string(),
    })?;
    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .ok_or(CliError::NoCredentials {
            profile: profile_name,
        })?;
    let adhoc = Profile {
        console: console.to_owned(),
        ..Profile::default()
    };
    with_flag_overrides(&adhoc, global, cfg, token)
}

/// Translate `profile`, then let flags replace what they name.
fn with_flag_overrides(
    profile: &Profile,
    global: &GlobalOpts,
    cfg: &Config,
    token: SecretString,
) -> Result<ClientConfig, CliError> {
    let mut client = match global.console.as_deref() {
        Some(console) if console != profile.console => {
            let mut overridden = profile.clone();
            overridden.console = console.to_owned();
            qradar_config::profile_to_client_config_with_token(&overridden, &cfg.defaults, token)?
        }
        _ => qradar_config::profile_to_client_config_with_token(profile, &cfg.defaults, token)?,
    };

    if global.insecure {
        client.transport.tls = TlsMode::DangerAcceptInvalid;
    }
    if let Some(secs) = global.timeout {
        client.transport.timeout = Duration::from_secs(secs);
    }
    if let Some(ref version) = global.api_version {
        client.api_version = Some(version.clone());
    }
    Ok(client)
}

/// Output format from `[defaults] output`, used when `--output` is absent.
pub fn default_output(cfg: &Config) -> Option<OutputFormat> {
    match OutputFormat::from_str(&cfg.defaults.output, true) {
        Ok(format) => Some(format),
        Err(_) => {
            tracing::warn!(value = %cfg.defaults.output, "ignoring unknown output format in config");
            None
        }
    }
}
