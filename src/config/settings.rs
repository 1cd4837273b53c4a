//! Typed settings document for the settings surface
//!
//! Only the arbitration fields are modelled; every other key in the file is
//! carried through untouched so saving never drops unrelated settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Top-level settings file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigDocument {
    #[serde(default)]
    pub settings: Settings,

    /// Sections this crate does not own (accounts, whitelists, ...)
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// User settings relevant to arbitration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredSettings")]
pub struct Settings {
    #[serde(rename = "translationProtectionEnabled")]
    pub translation_protection: bool,

    #[serde(rename = "foreignOverrideFixEnabled")]
    pub foreign_override_fix: bool,

    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Settings as found on disk, before the legacy master switch is folded in
#[derive(Deserialize)]
struct StoredSettings {
    #[serde(rename = "translationProtectionEnabled", default)]
    translation_protection: Option<bool>,

    #[serde(rename = "foreignOverrideFixEnabled", default = "default_enabled")]
    foreign_override_fix: bool,

    /// Older spelling of the master switch, only used when the current key is absent
    #[serde(rename = "blockTranslationExploit", default)]
    legacy_translation_protection: Option<Value>,

    #[serde(flatten)]
    other: Map<String, Value>,
}

fn default_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            translation_protection: default_enabled(),
            foreign_override_fix: default_enabled(),
            other: Map::new(),
        }
    }
}

impl From<StoredSettings> for Settings {
    fn from(stored: StoredSettings) -> Self {
        let translation_protection = match (stored.translation_protection, stored.legacy_translation_protection) {
            (Some(enabled), _) => enabled,
            (None, Some(Value::Bool(enabled))) => {
                info!(enabled, "Migrating legacy blockTranslationExploit setting");
                enabled
            }
            (None, Some(other)) => {
                warn!(value = %other, "Ignoring non-boolean blockTranslationExploit setting");
                default_enabled()
            }
            (None, None) => default_enabled(),
        };

        Self {
            translation_protection,
            foreign_override_fix: stored.foreign_override_fix,
            other: stored.other,
        }
    }
}

impl Settings {
    /// Fix flag after the master switch is applied
    pub fn effective_fix(&self) -> bool {
        self.translation_protection && self.foreign_override_fix
    }
}

impl ConfigDocument {
    /// Load the document, or defaults when the file does not exist yet
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("Config file not found, using defaults for {:?}", path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        if contents.trim().is_empty() {
            info!("Config file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }

        let document: ConfigDocument = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", path))?;

        info!(
            translation_protection = document.settings.translation_protection,
            foreign_override_fix = document.settings.foreign_override_fix,
            "Loaded settings"
        );
        Ok(document)
    }

    /// Write the document through a temp file so readers never see a partial file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;

        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, json)
            .with_context(|| format!("Failed to write config to {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to move {:?} over {:?}", temp_path, path))?;

        info!("Saved config to {:?}", path);
        Ok(())
    }
}
