//! Decision providers that never talk to a user.

use tracing::debug;

use kiln_core::{
    application::ports::DecisionProvider,
    domain::{ConflictResolution, Plan},
    error::KilnResult,
};

/// Decides pending conflicts with a fixed answer, or not at all.
///
/// With no fallback, pending conflicts stay pending and the run halts at the
/// first one. Runs are always confirmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonInteractive {
    fallback: Option<ConflictResolution>,
}

impl NonInteractive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every pending conflict with `resolution`.
    pub fn resolving_with(resolution: ConflictResolution) -> Self {
        Self {
            fallback: Some(resolution).filter(|r| r.is_decision()),
        }
    }
}

impl DecisionProvider for NonInteractive {
    fn resolve_conflict(&self, plan: &Plan) -> KilnResult<Option<ConflictResolution>> {
        debug!(
            path = %plan.artifact.destination_path().display(),
            fallback = ?self.fallback,
            "Non-interactive conflict decision"
        );
        Ok(self.fallback)
    }

    fn confirm_run(&self, _plans: &[Plan]) -> KilnResult<bool> {
        Ok(true)
    }
}
