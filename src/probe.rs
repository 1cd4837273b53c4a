//! Host module registry queries
//!
//! The registry is owned by the host; a registry that cannot answer is
//! treated as reporting the component absent.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::manifest;

/// Boundary to the host's module registry
pub trait ModuleRegistry {
    fn is_module_loaded(&self, id: &str) -> Result<bool>;
}

/// Ask `registry` whether the foreign component `id` is loaded.
/// Registry failures resolve to `false`.
pub fn is_foreign_component_loaded(registry: &dyn ModuleRegistry, id: &str) -> bool {
    match registry.is_module_loaded(id) {
        Ok(loaded) => {
            debug!(module = id, loaded, "Queried host module registry");
            loaded
        }
        Err(e) => {
            warn!(module = id, error = %format!("{e:#}"), "Module registry unavailable, treating component as absent");
            false
        }
    }
}

/// Fixed set of loaded module ids, for embedding hosts that already know them
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    loaded: HashSet<String>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: Into<String>> FromIterator<S> for StaticRegistry {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            loaded: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl ModuleRegistry for StaticRegistry {
    fn is_module_loaded(&self, id: &str) -> Result<bool> {
        Ok(self.loaded.contains(id))
    }
}

/// On-disk module manifest, one JSON file per loaded module
#[derive(Debug, Deserialize)]
struct ModuleManifest {
    id: String,
    #[serde(default)]
    version: Option<String>,
}

/// Registry backed by a directory of `*.json` module manifests
#[derive(Debug, Clone)]
pub struct ManifestDirRegistry {
    dir: PathBuf,
}

impl ManifestDirRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Ids of every readable manifest; unreadable manifests are skipped
    pub fn loaded_ids(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read module directory {:?}", self.dir))?;

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry
                .with_context(|| format!("Failed to list module directory {:?}", self.dir))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(manifest::EXTENSION) {
                continue;
            }

            match read_manifest(&path) {
                Ok(manifest) => {
                    debug!(id = %manifest.id, version = ?manifest.version, path = %path.display(), "Found module manifest");
                    ids.push(manifest.id);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{e:#}"), "Skipping unreadable module manifest");
                }
            }
        }
        Ok(ids)
    }
}

fn read_manifest(path: &Path) -> Result<ModuleManifest> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {:?}", path))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse manifest {:?}", path))
}

impl ModuleRegistry for ManifestDirRegistry {
    fn is_module_loaded(&self, id: &str) -> Result<bool> {
        Ok(self.loaded_ids()?.iter().any(|loaded| loaded == id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use tempfile::TempDir;

    struct BrokenRegistry;

    impl ModuleRegistry for BrokenRegistry {
        fn is_module_loaded(&self, _id: &str) -> Result<bool> {
            Err(anyhow!("registry not initialized"))
        }
    }

    #[test]
    fn test_static_registry() {
        let registry: StaticRegistry = ["meteor-client", "sodium"].into_iter().collect();
        assert!(is_foreign_component_loaded(&registry, "meteor-client"));
        assert!(!is_foreign_component_loaded(&registry, "iris"));
        assert!(!is_foreign_component_loaded(&StaticRegistry::new(), "meteor-client"));
    }

    #[test]
    fn test_unavailable_registry_means_absent() {
        assert!(!is_foreign_component_loaded(&BrokenRegistry, "meteor-client"));
    }

    #[test]
    fn test_manifest_dir_registry() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("meteor.json"), r#"{"id": "meteor-client", "version": "1.21"}"#).unwrap();
        fs::write(dir.path().join("sodium.json"), r#"{"id": "sodium"}"#).unwrap();
        fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
        fs::write(dir.path().join("notes.txt"), r#"{"id": "iris"}"#).unwrap();

        let registry = ManifestDirRegistry::new(dir.path());
        assert_eq!(registry.dir(), dir.path());
        let mut ids = registry.loaded_ids().unwrap();
        ids.sort();
        assert_eq!(ids, vec!["meteor-client".to_string(), "sodium".to_string()]);

        assert!(is_foreign_component_loaded(&registry, "meteor-client"));
        assert!(!is_foreign_component_loaded(&registry, "iris"));
    }

    #[test]
    fn test_missing_manifest_dir_means_absent() {
        let dir = TempDir::new().unwrap();
        let registry = ManifestDirRegistry::new(dir.path().join("modules"));
        assert!(registry.is_module_loaded("meteor-client").is_err());
        assert!(!is_foreign_component_loaded(&registry, "meteor-client"));
    }
}
