//! Configuration management for OpSec Arbiter
//!
//! This module provides two views of the same settings file:
//! - **reader**: the defensive startup read used before anything else is initialized
//! - **settings**: the typed document used by the settings surface to edit and save

pub mod reader;
pub mod settings;

use std::path::PathBuf;

// Re-export commonly used types
pub use reader::read_effective_fix_setting;
pub use settings::{ConfigDocument, Settings};

/// Well-known settings file location
pub fn config_path() -> PathBuf {
    let mut path = app_dir();
    path.push(crate::constants::config::FILENAME);
    path
}

/// Default host module manifest directory
pub fn modules_dir() -> PathBuf {
    let mut path = app_dir();
    path.push(crate::constants::config::MODULES_DIR);
    path
}

fn app_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(crate::constants::config::APP_DIR);
    path
}
