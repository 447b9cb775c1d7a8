//! Clap derive structures for the `qradar` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use qradar_api::{ItemRange, OffenseStatus};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// qradar -- query and triage QRadar offenses
#[derive(Debug, Parser)]
#[command(
    name = "qradar",
    version,
    about = "Query and triage QRadar offenses from the command line",
    long_about = "A CLI for the QRadar SIEM REST API.\n\n\
        Lists, inspects and updates offenses, and lists the source\n\
        addresses behind them.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Console profile to use
    #[arg(long, short = 'p', env = "QRADAR_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Console URL (overrides profile)
    #[arg(long, short = 'c', env = "QRADAR_CONSOLE", global = true)]
    pub console: Option<String>,

    /// Authorized service token
    #[arg(long, env = "QRADAR_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// API version sent in the Version header (e.g. 20.0)
    #[arg(long, env = "QRADAR_API_VERSION", global = true)]
    pub api_version: Option<String>,

    /// Output format [default: table, or `defaults.output` from the config]
    #[arg(long, short = 'o', env = "QRADAR_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "QRADAR_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "QRADAR_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// Effective output format once flag and config have been applied.
    pub fn output_format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List, inspect and update offenses
    #[command(alias = "off", alias = "o")]
    Offenses(OffensesArgs),

    /// List offense source addresses
    #[command(alias = "src")]
    SourceAddresses(SourceAddressesArgs),

    /// Inspect CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Offenses ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OffensesArgs {
    #[command(subcommand)]
    pub command: OffensesCommand,
}

#[derive(Debug, Subcommand)]
pub enum OffensesCommand {
    /// List offenses
    #[command(alias = "ls")]
    List {
        /// Field selection (e.g. "id,status,severity")
        #[arg(long)]
        fields: Option<String>,

        /// Server-side filter (e.g. "severity > 5 and status = OPEN")
        #[arg(long, short = 'f')]
        filter: Option<String>,

        /// Inclusive item window, FROM-TO (e.g. 0-49)
        #[arg(long, short = 'r', value_parser = parse_range)]
        range: Option<ItemRange>,
    },

    /// Show one offense
    Get {
        /// Offense ID
        id: i64,

        /// Field selection
        #[arg(long)]
        fields: Option<String>,
    },

    /// Update offense workflow attributes
    Update {
        /// Offense ID
        id: i64,

        /// New status (OPEN, HIDDEN, CLOSED)
        #[arg(long)]
        status: Option<OffenseStatus>,

        /// Assign to a user
        #[arg(long, conflicts_with = "unassign")]
        assigned_to: Option<String>,

        /// Clear the assignee
        #[arg(long)]
        unassign: bool,

        /// Closing reason ID (used with --status CLOSED)
        #[arg(long)]
        closing_reason_id: Option<i64>,

        /// Set the follow-up flag
        #[arg(long)]
        follow_up: Option<bool>,

        /// Set the protected flag
        #[arg(long)]
        protected: Option<bool>,

        /// Field selection for the returned offense
        #[arg(long)]
        fields: Option<String>,
    },
}

/// Parse `FROM-TO` into an [`ItemRange`]. No ordering check: the console
/// decides what an inverted window means.
pub fn parse_range(raw: &str) -> Result<ItemRange, String> {
    let (from, to) = raw
        .split_once('-')
        .ok_or_else(|| format!("expected FROM-TO, got '{raw}'"))?;
    let from = from
        .trim()
        .parse()
        .map_err(|e| format!("invalid range start '{from}': {e}"))?;
    let to = to
        .trim()
        .parse()
        .map_err(|e| format!("invalid range end '{to}': {e}"))?;
    Ok(ItemRange::new(from, to))
}

// ── Source addresses ─────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct SourceAddressesArgs {
    #[command(subcommand)]
    pub command: SourceAddressesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SourceAddressesCommand {
    /// List source addresses
    #[command(alias = "ls")]
    List {
        /// Field selection
        #[arg(long)]
        fields: Option<String>,

        /// Server-side filter (e.g. "magnitude > 3")
        #[arg(long, short = 'f')]
        filter: Option<String>,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a console profile from --console, --api-version, -k and --timeout
    Init {
        /// Environment variable the token is read from at run time
        #[arg(long)]
        token_env: Option<String>,

        /// Make the profile the default
        #[arg(long)]
        set_default: bool,
    },

    /// Show the effective configuration (tokens redacted)
    Show,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
