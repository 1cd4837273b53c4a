//! Startup read of the foreign override fix setting
//!
//! Runs before the settings store is available, so it walks the raw JSON
//! itself and never fails: every problem resolves to the fix being enabled.

use anyhow::{Context, Result, bail};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::constants::keys;

/// Read the effective fix flag (master switch applied) from `path`.
///
/// Missing, empty or malformed files and wrong-typed fields all yield `true`.
pub fn read_effective_fix_setting(path: &Path) -> bool {
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, defaulting foreign override fix to enabled");
        return true;
    }

    match try_read_effective_fix(path) {
        Ok(enabled) => enabled,
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{e:#}"), "Could not read config for foreign override fix, defaulting to enabled");
            true
        }
    }
}

fn try_read_effective_fix(path: &Path) -> Result<bool> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {:?}", path))?;

    if contents.trim().is_empty() {
        bail!("config file is empty");
    }

    let root: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON from {:?}", path))?;
    let root = root
        .as_object()
        .context("config root is not a JSON object")?;

    let Some(settings) = root.get(keys::SETTINGS) else {
        debug!("No settings section in config, foreign override fix defaults to enabled");
        return Ok(true);
    };
    let settings = settings
        .as_object()
        .with_context(|| format!("`{}` is not a JSON object", keys::SETTINGS))?;

    if !translation_protection_enabled(settings)? {
        info!("Translation protection is disabled, foreign override fix will not apply");
        return Ok(false);
    }

    Ok(optional_bool(settings, keys::FOREIGN_OVERRIDE_FIX)?.unwrap_or(true))
}

/// Master switch; the legacy key is only consulted when the current key is absent
fn translation_protection_enabled(settings: &Map<String, Value>) -> Result<bool> {
    if let Some(enabled) = optional_bool(settings, keys::TRANSLATION_PROTECTION)? {
        return Ok(enabled);
    }
    Ok(optional_bool(settings, keys::LEGACY_TRANSLATION_PROTECTION)?.unwrap_or(true))
}

fn optional_bool(settings: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match settings.get(key) {
        None => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(other) => bail!("`{key}` is not a boolean: {other}"),
    }
}
