//! gqlvalidate CLI - generate and enforce `@validate` rules
//!
//! Entry point for the `gqlvalidate` binary: code generation from GraphQL
//! SDL, rule inspection, and validation of inputs against a generated
//! manifest.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    control::set_override(cli.use_color());

    // Logging comes up before the config is known, so a broken config is
    // reported with the default logging settings.
    let config = Config::load_with_file(cli.config.as_deref());
    let logging_config = config
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    if let Err(e) = init_logging(&cli, logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));
            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }
            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip_all, fields(command = ?cli.command))]
async fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");
    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet, cli.verbosity_level());

    tracing::info!(verbosity = cli.verbosity_level(), "Executing command");

    match cli.command {
        Commands::Generate(args) => handlers::handle_generate(args, &config, &mut output).await,
        Commands::Check(args) => handlers::handle_check(args, &config, &mut output).await,
        Commands::Rewrite(args) => handlers::handle_rewrite(args, &config, &mut output).await,
        Commands::Validate(args) => handlers::handle_validate(args, &config, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// Combine the configured logging with `-v`, the environment and `--quiet`
fn init_logging(cli: &Cli, mut logging_config: LoggingConfig) -> Result<()> {
    logging_config.apply_verbosity(cli.verbosity_level());
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }
    logging::init_logging(logging_config)
}
