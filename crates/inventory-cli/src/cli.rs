//! CLI argument definitions for the inventory tool.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use inventory_cli::assignment::Assignment;
use inventory_resolve::roles;

#[derive(Parser)]
#[command(
    name = "inventory",
    version,
    about = "Asset inventory selection chains - inspect catalogs and replay cascading edits",
    long_about = "Inspect asset inventory reference catalogs and the cascading selection chains\n\
                  built on them (type -> make -> model, os -> os_version).\n\n\
                  Catalogs are JSON snapshots or directories of CSV files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the built-in selection chains.
    Chains,

    /// Show the options a role offers for a given selection.
    Options(OptionsArgs),

    /// Replay user edits through a chain and print every change.
    Resolve(ResolveArgs),

    /// Check a catalog for dangling parents and duplicate ids.
    Check(CheckArgs),
}

#[derive(Args)]
pub struct ChainArgs {
    /// Catalog JSON file or CSV directory.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Built-in chain to use.
    #[arg(long = "chain", value_name = "NAME", default_value = roles::ASSET_MODEL_CHAIN)]
    pub chain: String,

    /// Pre-populated value (edit mode), repeatable.
    #[arg(long = "state", value_name = "ROLE=ID")]
    pub state: Vec<Assignment>,

    /// Print JSON instead of tables.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Args)]
pub struct OptionsArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// Role whose options to list.
    #[arg(long = "role", value_name = "ROLE")]
    pub role: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub chain: ChainArgs,

    /// User edit to apply, in order (ROLE=ID, or ROLE=- to clear).
    #[arg(long = "edit", value_name = "ROLE=ID", required = true)]
    pub edits: Vec<Assignment>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Catalog JSON file or CSV directory.
    #[arg(long = "catalog", value_name = "PATH")]
    pub catalog: PathBuf,

    /// Print the report as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
