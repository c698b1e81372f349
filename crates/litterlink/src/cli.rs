//! Clap derive structures for the `litterlink` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// litterlink -- litter box history from PetKit and Litter-Robot clouds
#[derive(Debug, Parser)]
#[command(
    name = "litterlink",
    version,
    about = "Read pets, visit history and device status from smart litter boxes",
    long_about = "Reads pets, visit history and device status from PetKit (Pura X, \
        Pura MAX, Purobot) and Whisker Litter-Robot 4 accounts through one \
        vendor-neutral view.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "LITTERLINK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "LITTERLINK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// IANA timezone that defines "today" (overrides profile)
    #[arg(long, global = true)]
    pub timezone: Option<String>,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Log every skipped page and record at warn level
    #[arg(long, global = true)]
    pub diagnostics: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
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

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Verify the profile's credentials against the vendor cloud
    Login,

    /// List pets on the account
    Pets(PetsArgs),

    /// Show litter box visits and machine events, newest first
    #[command(alias = "history")]
    Visits(VisitsArgs),

    /// Show current device status
    Status(StatusArgs),

    /// Inspect the configuration file
    Config(ConfigArgs),
}

#[derive(Debug, Args)]
pub struct PetsArgs {
    /// History depth used to derive current weights (PetKit)
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,
}

#[derive(Debug, Args)]
pub struct VisitsArgs {
    /// Only visits by this pet (id, or name if no id matches)
    #[arg(long)]
    pub pet: Option<String>,

    /// Days of history (PetKit) or records per pet and robot (Whisker)
    #[arg(long, short = 'd')]
    pub depth: Option<u32>,

    /// Hide clean cycles and other machine events
    #[arg(long)]
    pub pets_only: bool,
}

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Show every device instead of only the most recent report
    #[arg(long, short = 'a')]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration with secrets masked
    Show,

    /// Print the config file location
    Path,

    /// Read a password from stdin and store it in the system keyring
    SetPassword,
}
