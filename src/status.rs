//! Restart status shown next to the fix toggle

use serde::Serialize;
use std::path::Path;

use crate::config::read_effective_fix_setting;
use crate::constants::messages;
use crate::drift::DriftChecker;
use crate::snapshot::{DecisionSnapshot, StartupOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RestartStatus {
    pub foreign_component_present: bool,
    pub applied_at_startup: bool,
    pub current_effective: bool,
    pub restart_required: bool,
}

impl RestartStatus {
    /// Re-read the config at `config_path` and compare against `snapshot`
    pub fn evaluate(snapshot: &DecisionSnapshot, config_path: &Path) -> Self {
        Self::from_current(snapshot, read_effective_fix_setting(config_path))
    }

    pub fn from_current(snapshot: &DecisionSnapshot, current_effective: bool) -> Self {
        let checker = DriftChecker::new(snapshot);
        Self {
            foreign_component_present: snapshot.foreign_component_present(),
            applied_at_startup: checker.was_applied_at_startup(),
            current_effective,
            restart_required: checker.needs_restart(current_effective),
        }
    }

    pub fn warning(&self) -> Option<&'static str> {
        self.restart_required.then_some(messages::RESTART_REQUIRED)
    }
}

pub fn describe_outcome(outcome: StartupOutcome) -> &'static str {
    match outcome {
        StartupOutcome::Suppressed => "foreign component present, override suppressed",
        StartupOutcome::Declined => "foreign component present, fix disabled",
        StartupOutcome::Absent => "foreign component not loaded",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::foreign;
    use crate::gate::{ArbitrationGate, OverrideCanceller};
    use crate::probe::StaticRegistry;
    use crate::snapshot::SnapshotCell;
    use std::fs;
    use tempfile::TempDir;

    fn meteor_loaded() -> StaticRegistry {
        [foreign::COMPONENT_ID].into_iter().collect()
    }

    #[test]
    fn test_scenario_no_config_no_component() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opsec.json");
        let cell = SnapshotCell::new();
        let snapshot = cell.freeze(&StaticRegistry::new(), &path);

        assert!(!snapshot.applied_suppression());
        for current in [true, false] {
            let status = RestartStatus::from_current(snapshot, current);
            assert!(!status.restart_required);
            assert_eq!(status.warning(), None);
        }
    }

    #[test]
    fn test_scenario_fix_applied_then_disabled() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opsec.json");
        fs::write(
            &path,
            r#"{"settings": {"translationProtectionEnabled": true, "foreignOverrideFixEnabled": true}}"#,
        )
        .unwrap();

        let cell = SnapshotCell::new();
        let snapshot = cell.freeze(&meteor_loaded(), &path);
        assert!(snapshot.applied_suppression());
        assert!(ArbitrationGate::new(snapshot).should_suppress(&[], foreign::TARGET_MIXIN_ID));

        fs::write(
            &path,
            r#"{"settings": {"translationProtectionEnabled": true, "foreignOverrideFixEnabled": false}}"#,
        )
        .unwrap();

        let status = RestartStatus::evaluate(snapshot, &path);
        assert!(!status.current_effective);
        assert!(status.restart_required);
        assert_eq!(status.warning(), Some(messages::RESTART_REQUIRED));
        assert!(ArbitrationGate::new(snapshot).should_suppress(&[], foreign::TARGET_MIXIN_ID));
    }

    #[test]
    fn test_scenario_master_switch_off() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opsec.json");
        fs::write(&path, r#"{"settings": {"translationProtectionEnabled": false}}"#).unwrap();

        let cell = SnapshotCell::new();
        let snapshot = cell.freeze(&meteor_loaded(), &path);
        assert!(!snapshot.fix_requested_at_startup());
        assert!(!snapshot.applied_suppression());
        assert_eq!(snapshot.outcome(), StartupOutcome::Declined);
    }

    #[test]
    fn test_scenario_malformed_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("opsec.json");
        fs::write(&path, "{\"settings\": {\"foreignOverrideFixEnabled\": tru").unwrap();

        let cell = SnapshotCell::new();
        let snapshot = cell.freeze(&meteor_loaded(), &path);
        assert!(snapshot.fix_requested_at_startup());
        assert!(snapshot.applied_suppression());
        assert!(!RestartStatus::evaluate(snapshot, &path).restart_required);
    }

    #[test]
    fn test_status_serializes_for_json_output() {
        let snapshot = DecisionSnapshot::decide(true, false);
        let status = RestartStatus::from_current(&snapshot, true);
        let value = serde_json::to_value(status).unwrap();
        assert_eq!(value["restart_required"], true);
        assert_eq!(value["applied_at_startup"], false);
    }
}
