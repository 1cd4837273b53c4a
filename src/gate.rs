//! Suppression callback consulted by the host before it installs a foreign override

use tracing::debug;

use crate::constants::foreign;
use crate::snapshot::DecisionSnapshot;

/// Host-facing callback; returning `true` keeps the override from being installed.
///
/// `target_ids` mirrors the host calling convention and does not affect the answer.
pub trait OverrideCanceller {
    fn should_suppress(&self, target_ids: &[String], candidate_id: &str) -> bool;
}

/// Answers suppression queries from the frozen startup decision only
#[derive(Debug, Clone, Copy)]
pub struct ArbitrationGate<'a> {
    snapshot: &'a DecisionSnapshot,
    target_id: &'a str,
}

impl<'a> ArbitrationGate<'a> {
    pub fn new(snapshot: &'a DecisionSnapshot) -> Self {
        Self::with_target(snapshot, foreign::TARGET_MIXIN_ID)
    }

    pub fn with_target(snapshot: &'a DecisionSnapshot, target_id: &'a str) -> Self {
        Self { snapshot, target_id }
    }

    pub fn suppresses(&self, candidate_id: &str) -> bool {
        let suppress = self.snapshot.applied_suppression() && candidate_id == self.target_id;
        if suppress {
            debug!(candidate = candidate_id, "Cancelling foreign override");
        }
        suppress
    }
}

impl OverrideCanceller for ArbitrationGate<'_> {
    fn should_suppress(&self, _target_ids: &[String], candidate_id: &str) -> bool {
        self.suppresses(candidate_id)
    }
}
