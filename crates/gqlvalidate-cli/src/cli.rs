//! Command-line interface argument parsing and definitions
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// gqlvalidate - compile and enforce `@validate` rules on GraphQL input types
///
/// Generates validatable models and a rule manifest from SDL, and validates
/// JSON inputs against a generated manifest.
#[derive(Parser, Debug)]
#[command(
    name = "gqlvalidate",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "GQLVALIDATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate models, the rule manifest and validatable markers
    Generate(GenerateArgs),

    /// Collect and compile rules without writing anything
    Check(CheckArgs),

    /// Rewrite one rule as if it were declared on an input type
    Rewrite(RewriteArgs),

    /// Validate a JSON or YAML input against a generated manifest
    Validate(ValidateArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Schema files, replacing the configured list
    #[arg(short, long = "schema", value_name = "FILE", num_args = 1..)]
    pub schema: Vec<PathBuf>,

    /// Output directory, replacing the configured one
    #[arg(long = "out", value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Render artifacts in memory and list them without writing
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Schema files, replacing the configured list
    #[arg(short, long = "schema", value_name = "FILE", num_args = 1..)]
    pub schema: Vec<PathBuf>,

    /// Fail when a rule name is unknown to the runtime evaluator
    #[arg(long)]
    pub deny_unknown: bool,
}

/// Arguments for the rewrite command
#[derive(Parser, Debug)]
pub struct RewriteArgs {
    /// Schema files, replacing the configured list
    #[arg(short, long = "schema", value_name = "FILE", num_args = 1..)]
    pub schema: Vec<PathBuf>,

    /// Input object type the rule is declared on
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub type_name: String,

    /// Rule text as written in the schema
    #[arg(value_name = "RULE")]
    pub rule: String,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Rule manifest produced by `generate`
    #[arg(short, long, value_name = "FILE")]
    pub manifest: PathBuf,

    /// Input object type of the value
    #[arg(short = 't', long = "type", value_name = "NAME")]
    pub type_name: String,

    /// Input value (JSON or YAML, keyed by schema field names)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Request locale used to pick a translation
    #[arg(short, long)]
    pub locale: Option<String>,

    /// Argument name reported for the value
    #[arg(long, default_value = "input")]
    pub argument: String,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Effective verbosity level (quiet wins)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}
