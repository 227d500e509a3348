//! Restaurant strategy recommender CLI.

use clap::{ColorChoice, Parser};
use resto_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, OutputFormatArg};
use crate::commands::{run_analyze, run_features, run_map, run_strategies};
use crate::summary::{print_analysis, print_exports, print_mapping};

/// Exit code when the dataset cannot be used for a recommendation.
const EXIT_UNUSABLE: i32 = 2;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Analyze(args) => match run_analyze(&args) {
            Ok(run) => match args.format {
                OutputFormatArg::Json => match run.report.to_json() {
                    Ok(json) => {
                        println!("{json}");
                        run.result.exit_code()
                    }
                    Err(error) => {
                        eprintln!("error: {error:#}");
                        1
                    }
                },
                OutputFormatArg::Table => {
                    print_analysis(&run.result, &run.bundle);
                    if let Some(paths) = &run.exports {
                        print_exports(paths);
                    }
                    run.result.exit_code()
                }
            },
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Map(args) => match run_map(&args) {
            Ok(run) => {
                match args.format {
                    OutputFormatArg::Json => match serde_json::to_string_pretty(&run.summary) {
                        Ok(json) => println!("{json}"),
                        Err(error) => {
                            eprintln!("error: {error}");
                            std::process::exit(1);
                        }
                    },
                    OutputFormatArg::Table => {
                        print_mapping(&run.report, &run.bundle);
                        if let Some(paths) = &run.exports {
                            print_exports(paths);
                        }
                    }
                }
                if run.report.is_valid { 0 } else { EXIT_UNUSABLE }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Features(args) => match run_features(&args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Strategies(args) => match run_strategies(&args) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
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
