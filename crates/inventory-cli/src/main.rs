//! Asset inventory selection-chain CLI.

use clap::{ColorChoice, Parser};
use inventory_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_chains, run_check, run_options, run_resolve};
use crate::summary::{print_chains, print_json, print_options, print_replay, print_report};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Chains => {
            print_chains(&run_chains());
            0
        }
        Command::Options(args) => match run_options(&args) {
            Ok(listing) if args.chain.json => report_outcome(print_json(&listing)),
            Ok(listing) => {
                print_options(&listing);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Resolve(args) => match run_resolve(&args) {
            Ok(outcome) if args.chain.json => report_outcome(print_json(&outcome)),
            Ok(outcome) => {
                print_replay(&outcome);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Check(args) => match run_check(&args) {
            Ok(report) => {
                let printed = if args.json {
                    print_json(&report)
                } else {
                    print_report(&report);
                    Ok(())
                };
                match report_outcome(printed) {
                    0 if report.has_issues() => 1,
                    code => code,
                }
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn report_outcome(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => report_error(&error),
    }
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
///
/// `--log-level` beats `-v/-q`, which beat `RUST_LOG`.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
