//! Generator configuration
//!
//! Every field has a default, so an empty file is a valid configuration.
//! Files are read as YAML, JSON or TOML depending on their extension.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::naming::NamingConvention;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Per-directive generation settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectiveConfig {
    /// The directive needs no resolver-side handler
    pub skip_runtime: bool,
}

/// Settings for one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// SDL files, merged in order
    pub schema: Vec<PathBuf>,

    /// Directory receiving every artifact
    pub output_dir: PathBuf,

    pub models_file: String,
    pub markers_file: String,
    pub manifest_file: String,

    /// Convention for generated field identifiers
    pub naming: NamingConvention,

    /// Explicit identifiers keyed by `Type.field`, applied after the convention
    pub identifiers: BTreeMap<String, String>,

    /// Path of the runtime crate in emitted `use` statements
    pub core_crate: String,

    pub directives: BTreeMap<String, DirectiveConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema: Vec::new(),
            output_dir: PathBuf::from("src/generated"),
            models_file: "models_gen.rs".to_string(),
            markers_file: "validatable_gen.rs".to_string(),
            manifest_file: "rules_gen.json".to_string(),
            naming: NamingConvention::default(),
            identifiers: BTreeMap::new(),
            core_crate: "gqlvalidate_core".to_string(),
            directives: BTreeMap::new(),
        }
    }
}

impl GeneratorConfig {
    /// Load from a `.yaml`/`.yml`, `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Io {
            message: format!("Failed to read config {}: {}", path.display(), e),
            source: e,
        })?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            other => {
                return Err(Error::config(format!(
                    "unsupported config extension {:?} for {}",
                    other.unwrap_or(""),
                    path.display()
                )))
            }
        };
        Ok(config)
    }

    /// Check settings that defaults cannot repair
    pub fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(Error::config("at least one schema file is required"));
        }
        for (label, name) in [
            ("models_file", &self.models_file),
            ("markers_file", &self.markers_file),
            ("manifest_file", &self.manifest_file),
        ] {
            if name.trim().is_empty() {
                return Err(Error::config(format!("{} must not be empty", label)));
            }
        }
        if self.models_file == self.markers_file {
            return Err(Error::config("models_file and markers_file must differ"));
        }
        if self.core_crate.trim().is_empty() {
            return Err(Error::config("core_crate must not be empty"));
        }
        Ok(())
    }

    /// Explicit identifier configured for a field
    pub fn identifier(&self, type_name: &str, field: &str) -> Option<&str> {
        self.identifiers
            .get(&format!("{}.{}", type_name, field))
            .map(String::as_str)
    }

    pub fn models_path(&self) -> PathBuf {
        self.output_dir.join(&self.models_file)
    }

    pub fn markers_path(&self) -> PathBuf {
        self.output_dir.join(&self.markers_file)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir.join(&self.manifest_file)
    }

    /// Module name of the models file, as referenced by the markers file
    pub fn models_module(&self) -> &str {
        Path::new(&self.models_file)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("models_gen")
    }

    /// Whether a directive is marked as needing no runtime handler
    pub fn skips_runtime(&self, directive: &str) -> bool {
        self.directives
            .get(directive)
            .map(|config| config.skip_runtime)
            .unwrap_or(false)
    }
}
