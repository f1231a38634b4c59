//! Generate command handler

use super::utils::require_file;
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use gqlvalidate_codegen::{FsArtifactWriter, Generator, MemoryArtifactWriter};

/// Handle the generate command
pub async fn handle_generate(
    args: GenerateArgs,
    config: &Config,
    output: &mut OutputWriter,
) -> Result<()> {
    let generator = Generator::new(config.generator_with(&args.schema, args.out.as_deref()));
    for path in &generator.config().schema {
        require_file(path)?;
    }

    let timer = Timer::with_details("generate", &generator.config().output_dir.display().to_string());
    output.info(&format!(
        "Generating from {} schema file(s) into {}",
        generator.config().schema.len(),
        generator.config().output_dir.display()
    ))?;

    let report = if args.dry_run {
        let mut writer = MemoryArtifactWriter::new();
        let report = generator.generate(&mut writer)?;
        for (path, contents) in writer.files() {
            output.debug(&format!("{} ({} bytes)", path.display(), contents.len()))?;
        }
        output.info("Dry run: no files were written")?;
        report
    } else {
        generator.generate(&mut FsArtifactWriter)?
    };

    for unknown in &report.unknown_rules {
        output.warning(&format!("Unknown rule '{}' on {}", unknown.rule, unknown.field))?;
    }
    output.report(&report)?;
    output.success(&format!("✓ Generation complete in {}ms", timer.elapsed().as_millis()))
}
