//! Drift between the live fix setting and the decision applied at startup

use crate::snapshot::DecisionSnapshot;

/// Read-only view used by settings screens. Performs no I/O; callers pass
/// in a freshly read effective setting.
#[derive(Debug, Clone, Copy)]
pub struct DriftChecker<'a> {
    snapshot: &'a DecisionSnapshot,
}

impl<'a> DriftChecker<'a> {
    pub fn new(snapshot: &'a DecisionSnapshot) -> Self {
        Self { snapshot }
    }

    pub fn was_applied_at_startup(&self) -> bool {
        self.snapshot.applied_suppression()
    }

    /// A component installed after startup never reports drift; only a
    /// restart would pick it up in the first place.
    pub fn needs_restart(&self, current_effective_setting: bool) -> bool {
        if !self.snapshot.foreign_component_present() {
            return false;
        }
        current_effective_setting != self.snapshot.fix_requested_at_startup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_component_never_needs_restart() {
        for fix in [true, false] {
            let snapshot = DecisionSnapshot::decide(false, fix);
            let checker = DriftChecker::new(&snapshot);
            assert!(!checker.needs_restart(true));
            assert!(!checker.needs_restart(false));
            assert!(!checker.was_applied_at_startup());
        }
    }

    #[test]
    fn test_present_component_restart_on_change_only() {
        for startup in [true, false] {
            let snapshot = DecisionSnapshot::decide(true, startup);
            let checker = DriftChecker::new(&snapshot);
            assert_eq!(checker.was_applied_at_startup(), startup);
            assert!(!checker.needs_restart(startup));
            assert!(checker.needs_restart(!startup));
        }
    }
}
