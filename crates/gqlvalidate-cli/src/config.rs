//! Configuration management for the CLI
//!
//! Configuration is loaded from the first source that exists:
//! - the file given with `--config` or `GQLVALIDATE_CONFIG`
//! - `.gqlvalidate.yaml`, `.gqlvalidate.json` or `gqlvalidate.toml` in the
//!   current directory
//! - `config.yaml`, `config.json` or `config.toml` in the user config
//!   directory under `gqlvalidate/`
//!
//! Defaults apply when none is found.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use gqlvalidate_codegen::GeneratorConfig;
use gqlvalidate_core::{TranslationConfig, TranslationRegistration, Translator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
    pub translations: TranslationsConfig,
}

/// Translation catalogs offered to `validate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationsConfig {
    /// Language used when the request locale has no catalog
    pub default_lang: String,

    /// Catalog files (`rule: template`) keyed by language
    pub catalogs: BTreeMap<String, PathBuf>,
}

impl Default for TranslationsConfig {
    fn default() -> Self {
        Self {
            default_lang: "en".to_string(),
            catalogs: BTreeMap::new(),
        }
    }
}

impl TranslationsConfig {
    /// Build the engine's translation setup
    ///
    /// English is always registered from the built-in catalog; a configured
    /// `en` file adds to it, replacing templates for the rules it names.
    pub fn to_translation_config(&self) -> Result<TranslationConfig> {
        let mut english = Translator::english();
        let mut config = TranslationConfig::new(self.default_lang.clone());

        for (lang, path) in &self.catalogs {
            let translator = Translator::from_file(lang.clone(), path)?;
            debug!(lang = %lang, path = %path.display(), templates = translator.len(), "Loaded translation catalog");

            if lang == "en" {
                for rule in translator.rules() {
                    if let Some(template) = translator.template(rule) {
                        english.add(rule, template, true)?;
                    }
                }
            } else {
                config = config.register(TranslationRegistration::new(lang.clone(), translator));
            }
        }

        Ok(config.register(TranslationRegistration::new("en", english)))
    }
}

impl Config {
    /// Load configuration from a `.yaml`/`.yml`, `.json` or `.toml` file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            Some("toml") => toml::from_str(&content)?,
            _ => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "YAML, JSON or TOML".to_string(),
                })
            }
        };
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        for path in Self::default_config_paths() {
            if path.exists() {
                match Self::from_file(&path) {
                    Ok(config) => {
                        debug!(path = %path.display(), "Loaded configuration");
                        return Ok(config);
                    }
                    Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable configuration"),
                }
            }
        }
        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::load(),
        }
    }

    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".gqlvalidate.yaml"),
            PathBuf::from(".gqlvalidate.json"),
            PathBuf::from("gqlvalidate.toml"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dir = config_dir.join("gqlvalidate");
            paths.push(dir.join("config.yaml"));
            paths.push(dir.join("config.json"));
            paths.push(dir.join("config.toml"));
        }
        paths
    }

    /// Generator settings with command-line overrides applied
    pub fn generator_with(&self, schema: &[PathBuf], out: Option<&Path>) -> GeneratorConfig {
        let mut generator = self.generator.clone();
        if !schema.is_empty() {
            generator.schema = schema.to_vec();
        }
        if let Some(out) = out {
            generator.output_dir = out.to_path_buf();
        }
        generator
    }
}
