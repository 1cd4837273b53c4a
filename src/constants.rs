//! Application-wide constants
//!
//! Identifiers, file names and JSON keys shared by the startup reader,
//! the settings store and the CLI.

/// Configuration file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "opsec";

    /// Settings document file name
    pub const FILENAME: &str = "opsec.json";

    /// Directory (under APP_DIR) holding host module manifests
    pub const MODULES_DIR: &str = "modules";
}

/// JSON keys inside the settings document
pub mod keys {
    /// Top-level object holding all user settings
    pub const SETTINGS: &str = "settings";

    /// Master switch for translation protection
    pub const TRANSLATION_PROTECTION: &str = "translationProtectionEnabled";

    /// Older name of the master switch, still honoured on read
    pub const LEGACY_TRANSLATION_PROTECTION: &str = "blockTranslationExploit";

    /// Whether the foreign override should be suppressed
    pub const FOREIGN_OVERRIDE_FIX: &str = "foreignOverrideFixEnabled";
}

/// The foreign component whose override is arbitrated
pub mod foreign {
    /// Module id the host registry reports for the foreign component
    pub const COMPONENT_ID: &str = "meteor-client";

    /// Fully-qualified id of the override that gets suppressed
    pub const TARGET_MIXIN_ID: &str = "meteordevelopment.meteorclient.mixin.AbstractSignEditScreenMixin";
}

/// Module manifest files
pub mod manifest {
    /// Extension of manifest files in the modules directory
    pub const EXTENSION: &str = "json";
}

/// User-facing text
pub mod messages {
    /// Shown next to the fix toggle when the live value drifted from startup
    pub const RESTART_REQUIRED: &str = "Requires restart to take effect";
}
