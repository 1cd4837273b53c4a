//! Startup decision, computed once and frozen for the process lifetime
//!
//! The only way to obtain a [`DecisionSnapshot`] reference is through
//! [`SnapshotCell::freeze`] (or [`freeze_at_startup`]), so nothing can query
//! the decision before it exists.

use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, info, warn};

use crate::config::read_effective_fix_setting;
use crate::constants::foreign;
use crate::probe::{ModuleRegistry, is_foreign_component_loaded};

/// Which of the three startup cases applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartupOutcome {
    /// Component present and its override will be suppressed
    Suppressed,
    /// Component present but the user turned the fix off
    Declined,
    /// Component not loaded, nothing to arbitrate
    Absent,
}

/// Immutable startup decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecisionSnapshot {
    foreign_component_present: bool,
    fix_requested_at_startup: bool,
    applied_suppression: bool,
}

impl DecisionSnapshot {
    /// Combine the two startup reads into a decision
    pub fn decide(foreign_component_present: bool, fix_requested_at_startup: bool) -> Self {
        Self {
            foreign_component_present,
            fix_requested_at_startup,
            applied_suppression: foreign_component_present && fix_requested_at_startup,
        }
    }

    /// Probe the registry and read the config, in that order
    fn compute(registry: &dyn ModuleRegistry, config_path: &Path) -> Self {
        let present = is_foreign_component_loaded(registry, foreign::COMPONENT_ID);
        let fix_enabled = read_effective_fix_setting(config_path);
        Self::decide(present, fix_enabled)
    }

    pub fn foreign_component_present(&self) -> bool {
        self.foreign_component_present
    }

    pub fn fix_requested_at_startup(&self) -> bool {
        self.fix_requested_at_startup
    }

    pub fn applied_suppression(&self) -> bool {
        self.applied_suppression
    }

    pub fn outcome(&self) -> StartupOutcome {
        match (self.foreign_component_present, self.applied_suppression) {
            (true, true) => StartupOutcome::Suppressed,
            (true, false) => StartupOutcome::Declined,
            (false, _) => StartupOutcome::Absent,
        }
    }

    fn log_outcome(&self) {
        match self.outcome() {
            StartupOutcome::Suppressed => info!(
                component = foreign::COMPONENT_ID,
                "Foreign component detected - fix enabled, its broken translation override will be suppressed"
            ),
            StartupOutcome::Declined => warn!(
                component = foreign::COMPONENT_ID,
                "Foreign component detected - fix is DISABLED. Its translation override may expose your mods to servers!"
            ),
            StartupOutcome::Absent => debug!(
                component = foreign::COMPONENT_ID,
                "Foreign component not loaded, nothing to arbitrate"
            ),
        }
    }
}

/// Write-once holder for a [`DecisionSnapshot`]
#[derive(Debug, Default)]
pub struct SnapshotCell {
    cell: OnceLock<DecisionSnapshot>,
}

impl SnapshotCell {
    pub const fn new() -> Self {
        Self {
            cell: OnceLock::new(),
        }
    }

    /// Compute the decision on first call and return it on every call.
    ///
    /// Later calls ignore their arguments. Concurrent first calls block until
    /// the single computation finishes, so the outcome is logged once.
    pub fn freeze(&self, registry: &dyn ModuleRegistry, config_path: &Path) -> &DecisionSnapshot {
        self.cell.get_or_init(|| {
            let snapshot = DecisionSnapshot::compute(registry, config_path);
            snapshot.log_outcome();
            snapshot
        })
    }

    pub fn is_frozen(&self) -> bool {
        self.cell.get().is_some()
    }
}

static STARTUP: SnapshotCell = SnapshotCell::new();

/// Process-wide startup decision
pub fn freeze_at_startup(registry: &dyn ModuleRegistry, config_path: &Path) -> &'static DecisionSnapshot {
    STARTUP.freeze(registry, config_path)
}
