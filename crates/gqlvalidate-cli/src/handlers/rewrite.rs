//! Rewrite command handler

use super::utils::require_file;
use crate::cli::{OutputFormat, RewriteArgs};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use gqlvalidate_codegen::Generator;
use serde_json::json;

/// Handle the rewrite command
pub async fn handle_rewrite(args: RewriteArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    if args.rule.trim().is_empty() {
        return Err(Error::invalid_args("RULE must not be empty"));
    }

    let generator = Generator::new(config.generator_with(&args.schema, None));
    for path in &generator.config().schema {
        require_file(path)?;
    }

    let schema = generator.load_schema()?;
    let rewritten = generator.rewrite(&schema, &args.type_name, &args.rule)?;

    if output.format() == OutputFormat::Human {
        output.writeln(&rewritten)
    } else {
        output.data(&json!({
            "type": args.type_name,
            "rule": args.rule,
            "rewritten": rewritten,
        }))
    }
}
