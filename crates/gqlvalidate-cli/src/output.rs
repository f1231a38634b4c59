//! Output formatting and writing utilities
//!
//! Results are rendered either for people (`human`) or as JSON/YAML
//! documents for tooling. Human renderings of the generation report, the
//! compiled rules and protocol errors live here.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use gqlvalidate_codegen::{CompiledRule, GenerationReport, UnknownRule};
use gqlvalidate_core::GraphQLError;
use serde::Serialize;
use std::io::{self, Write};
use tracing::debug;

/// Compiled rules and lint findings of a `check` run
#[derive(Debug, Clone, Serialize)]
pub struct CheckSummary {
    pub rules: Vec<CompiledRule>,
    pub markers: Vec<String>,
    pub unknown_rules: Vec<UnknownRule>,
}

/// Protocol response body carrying validation errors
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    pub errors: &'a [GraphQLError],
}

/// Format values per output format, with human renderings for known types
pub trait OutputFormatter {
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    fn format_report(&self, report: &GenerationReport) -> Result<String>;

    fn format_check(&self, summary: &CheckSummary) -> Result<String>;

    fn format_errors(&self, errors: &[GraphQLError]) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty | OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        }
    }

    fn format_report(&self, report: &GenerationReport) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(report)),
            _ => self.format(report),
        }
    }

    fn format_check(&self, summary: &CheckSummary) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_check_human(summary)),
            _ => self.format(summary),
        }
    }

    fn format_errors(&self, errors: &[GraphQLError]) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_errors_human(errors)),
            _ => self.format(&ErrorResponse { errors }),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Progress note, human format only
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    pub fn error(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&message.red().to_string())
        } else {
            self.writeln(&format!("ERROR: {}", message))
        }
    }

    /// Extra detail shown with `-v`
    pub fn debug(&mut self, message: &str) -> Result<()> {
        if self.verbose == 0 || self.format != OutputFormat::Human {
            return Ok(());
        }
        if self.use_color {
            self.writeln(&format!("{} {}", "DEBUG:".dimmed(), message.dimmed()))
        } else {
            self.writeln(&format!("DEBUG: {}", message))
        }
    }

    /// Write a serializable value in the configured format
    pub fn data<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let formatted = self.format.format(value)?;
        self.emit(&formatted)
    }

    pub fn report(&mut self, report: &GenerationReport) -> Result<()> {
        let formatted = self.format.format_report(report)?;
        self.emit(&formatted)
    }

    pub fn check_summary(&mut self, summary: &CheckSummary) -> Result<()> {
        let formatted = self.format.format_check(summary)?;
        self.emit(&formatted)
    }

    pub fn graphql_errors(&mut self, errors: &[GraphQLError]) -> Result<()> {
        let formatted = self.format.format_errors(errors)?;
        self.emit(&formatted)
    }

    /// Machine formats are always written; human output honours `--quiet`
    fn emit(&mut self, formatted: &str) -> Result<()> {
        if self.quiet && self.format == OutputFormat::Human {
            return Ok(());
        }
        self.writeln(formatted.trim_end())
    }
}

fn format_report_human(report: &GenerationReport) -> String {
    let mut output = String::new();
    output.push_str("═══ Generation Report ═══\n\n");
    output.push_str(&format!("Types:     {}\n", report.types.len()));
    output.push_str(&format!("Validated: {}\n", report.markers.len()));
    output.push_str(&format!("Rules:     {}\n", report.compiled_rules));

    if !report.written.is_empty() {
        output.push_str("\nWritten:\n");
        for path in &report.written {
            output.push_str(&format!("  + {}\n", path.display()));
        }
    }
    if !report.removed.is_empty() {
        output.push_str("\nRemoved:\n");
        for path in &report.removed {
            output.push_str(&format!("  - {}\n", path.display()));
        }
    }
    if !report.unknown_rules.is_empty() {
        output.push_str("\nUnknown rules:\n");
        output.push_str(&format_unknown_rules(&report.unknown_rules));
    }
    if !report.runtime_directives.is_empty() {
        output.push_str(&format!(
            "\nDirectives needing a runtime handler: {}\n",
            report
                .runtime_directives
                .iter()
                .map(|name| format!("@{}", name))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    output
}

fn format_check_human(summary: &CheckSummary) -> String {
    let mut output = String::new();
    output.push_str("═══ Compiled Rules ═══\n\n");

    if summary.rules.is_empty() {
        output.push_str("No @validate annotations found\n");
    }
    for rule in &summary.rules {
        output.push_str(&format!("{}.{} ({})\n", rule.type_name, rule.field_name, rule.ident));
        if rule.raw_rule == rule.rule {
            output.push_str(&format!("  rule:    {}\n", rule.rule));
        } else {
            output.push_str(&format!("  rule:    {} -> {}\n", rule.raw_rule, rule.rule));
        }
        if let Some(message) = &rule.message {
            output.push_str(&format!("  message: {}\n", message));
        }
    }

    if !summary.unknown_rules.is_empty() {
        output.push_str("\nUnknown rules:\n");
        output.push_str(&format_unknown_rules(&summary.unknown_rules));
    }
    output
}

fn format_unknown_rules(unknown: &[UnknownRule]) -> String {
    unknown
        .iter()
        .map(|u| format!("  ⚠ {} on {}\n", u.rule, u.field))
        .collect()
}

fn format_errors_human(errors: &[GraphQLError]) -> String {
    if errors.is_empty() {
        return "No validation errors\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!("═══ Validation Errors ({}) ═══\n\n", errors.len()));
    for (i, error) in errors.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, error.message));
        if !error.path.is_empty() {
            output.push_str(&format!("   path: {}\n", error.path));
        }
        if let Some(rule) = error.extension("rule").and_then(|v| v.as_str()) {
            match error.extension("param").and_then(|v| v.as_str()) {
                Some(param) => output.push_str(&format!("   rule: {}={}\n", rule, param)),
                None => output.push_str(&format!("   rule: {}\n", rule)),
            }
        }
    }
    output
}
