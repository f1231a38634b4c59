//! Artifact emission
//!
//! Every artifact is regenerated in full on each run. The markers file is
//! removed instead when no type carries a rule.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use crate::collector::MarkerSet;
use crate::config::GeneratorConfig;
use crate::generator::{catalog, GeneratedModel};
use crate::templates::Template;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destination of generated artifacts
pub trait ArtifactWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()>;

    /// Remove a stale artifact; returns whether anything was removed
    fn remove(&mut self, path: &Path) -> Result<bool>;
}

/// Writes artifacts to disk, creating parent directories
#[derive(Debug, Clone, Copy, Default)]
pub struct FsArtifactWriter;

impl ArtifactWriter for FsArtifactWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::Artifact {
                operation: "create directory for",
                path: path.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, contents).map_err(|source| Error::Artifact {
            operation: "write",
            path: path.to_path_buf(),
            source,
        })
    }

    fn remove(&mut self, path: &Path) -> Result<bool> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(Error::Artifact {
                operation: "remove",
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Keeps artifacts in memory; used for dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactWriter {
    files: BTreeMap<PathBuf, String>,
}

impl MemoryArtifactWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &Path) -> Option<&str> {
        self.files.get(path).map(String::as_str)
    }

    pub fn files(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.files.iter().map(|(path, contents)| (path.as_path(), contents.as_str()))
    }
}

impl ArtifactWriter for MemoryArtifactWriter {
    fn write(&mut self, path: &Path, contents: &str) -> Result<()> {
        self.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, path: &Path) -> Result<bool> {
        Ok(self.files.remove(path).is_some())
    }
}

/// Paths touched by one emission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emitted {
    pub written: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

/// Write the models, manifest and markers artifacts
pub fn emit(
    config: &GeneratorConfig,
    models: &[GeneratedModel],
    markers: &MarkerSet,
    writer: &mut dyn ArtifactWriter,
) -> Result<Emitted> {
    let mut emitted = Emitted::default();

    let models_path = config.models_path();
    writer.write(&models_path, &Template::models(config, models))?;
    emitted.written.push(models_path);

    let manifest_path = config.manifest_path();
    let manifest = catalog(models).to_json_pretty()?;
    writer.write(&manifest_path, &manifest)?;
    emitted.written.push(manifest_path);

    let markers_path = config.markers_path();
    if markers.is_empty() {
        if writer.remove(&markers_path)? {
            info!(path = %markers_path.display(), "Removed stale markers artifact");
            emitted.removed.push(markers_path);
        }
    } else {
        let types: Vec<&str> = markers.iter().collect();
        writer.write(&markers_path, &Template::markers(config, &types))?;
        emitted.written.push(markers_path);
    }

    debug!(
        written = emitted.written.len(),
        removed = emitted.removed.len(),
        "Emitted artifacts"
    );
    Ok(emitted)
}
