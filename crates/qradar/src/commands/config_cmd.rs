//! Config subcommand handlers.

use qradar_config::{ConfigError, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

const MASK: &str = "****";

/// Replace plaintext tokens so no output format can leak them.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(MASK.into());
        }
    }
}

/// Add or replace the active profile from global flags.
fn init_profile(
    cfg: &mut Config,
    global: &GlobalOpts,
    token_env: Option<String>,
    set_default: bool,
) -> Result<String, CliError> {
    let console = global.console.as_deref().ok_or_else(|| CliError::Validation {
        field: "console".into(),
        reason: "pass --console (or QRADAR_CONSOLE) with the console URL".into(),
    })?;
    // Validate now rather than on first use.
    qradar_config::parse_console(console)?;

    let name = global.profile.clone().unwrap_or_else(|| "default".into());
    let profile = Profile {
        console: console.to_owned(),
        token: None,
        token_env,
        api_version: global.api_version.clone(),
        ca_cert: None,
        insecure: global.insecure.then_some(true),
        timeout: global.timeout,
    };
    cfg.profiles.insert(name.clone(), profile);
    if set_default || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(name.clone());
    }
    Ok(name)
}

fn use_profile(cfg: &mut Config, name: &str) -> Result<(), CliError> {
    if !cfg.profiles.contains_key(name) {
        return Err(CliError::Validation {
            field: "profile".into(),
            reason: format!("no profile named '{name}' in {}", config::config_path().display()),
        });
    }
    cfg.default_profile = Some(name.to_owned());
    Ok(())
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts, mut cfg: Config) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            ref token_env,
            set_default,
        } => {
            if global.token.is_some() {
                tracing::warn!(
                    "tokens are not written to the config file; use --token-env or the system keyring"
                );
            }
            let name = init_profile(&mut cfg, global, token_env.clone(), set_default)?;
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Profile '{name}' written to {}", config::config_path().display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            redact(&mut cfg);
            let text = toml::to_string_pretty(&cfg).map_err(ConfigError::from)?;
            let out = output::render_single(
                global.output_format(),
                &cfg,
                |_| text.trim_end().to_owned(),
                |c| config::active_profile_name(global, c),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { ref name } => {
            use_profile(&mut cfg, name)?;
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }
    }
}
