//! Check command handler

use super::utils::require_file;
use crate::cli::CheckArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{CheckSummary, OutputWriter};
use gqlvalidate_codegen::{Generator, UnknownRule};

/// Handle the check command
pub async fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let generator = Generator::new(config.generator_with(&args.schema, None));
    for path in &generator.config().schema {
        require_file(path)?;
    }

    let schema = generator.load_schema()?;
    let compilation = generator.check(schema)?;

    let summary = CheckSummary {
        unknown_rules: compilation
            .unknown_rules()
            .into_iter()
            .map(|(field, rule)| UnknownRule { field, rule })
            .collect(),
        markers: compilation.markers.to_vec(),
        rules: compilation.rules,
    };
    output.check_summary(&summary)?;

    if summary.unknown_rules.is_empty() {
        output.success(&format!(
            "✓ {} rule(s) on {} type(s) compiled",
            summary.rules.len(),
            summary.markers.len()
        ))
    } else if args.deny_unknown {
        output.error("✗ Unknown rule names found")?;
        Err(Error::UnknownRules {
            count: summary.unknown_rules.len(),
        })
    } else {
        output.warning(&format!(
            "{} unknown rule name(s); the runtime will reject them",
            summary.unknown_rules.len()
        ))
    }
}
