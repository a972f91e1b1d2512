//! Conflict-aware planning: artifacts + filesystem state → plans.

use similar::TextDiff;
use tracing::{debug, info, instrument};

use crate::application::config::EngineConfig;
use crate::application::ports::{DecisionProvider, Filesystem, read_existing};
use crate::domain::{Artifact, BuiltinAction, ConflictResolution, ConflictSnapshot, Plan};
use crate::error::KilnResult;

/// Builds one plan per artifact, in order.
pub struct PlanBuilder<'a> {
    filesystem: &'a dyn Filesystem,
    strategy: ConflictResolution,
    confirm_before_delete: bool,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, config: &EngineConfig) -> Self {
        Self {
            filesystem,
            strategy: config.strategy.conflict_resolution,
            confirm_before_delete: config.behavior.confirm_before_delete,
        }
    }

    #[instrument(skip_all, fields(artifacts = artifacts.len(), strategy = %self.strategy))]
    pub fn build(&self, artifacts: Vec<Artifact>) -> KilnResult<Vec<Plan>> {
        let plans = artifacts
            .into_iter()
            .map(|artifact| self.plan(artifact))
            .collect::<KilnResult<Vec<_>>>()?;

        let conflicted = plans.iter().filter(|p| p.conflict.is_conflicted).count();
        let pending = plans.iter().filter(|p| p.is_pending()).count();
        info!(plans = plans.len(), conflicted, pending, "Planned");
        Ok(plans)
    }

    pub fn plan(&self, artifact: Artifact) -> KilnResult<Plan> {
        let current = read_existing(self.filesystem, artifact.destination_path())?;

        let conflict = match current {
            None => ConflictSnapshot::clean(),
            Some(current) if current == artifact.final_content() => ConflictSnapshot::clean(),
            Some(current) => {
                let target = artifact.final_content().to_string();
                let mut snapshot = ConflictSnapshot {
                    is_conflicted: true,
                    chosen_resolution: None,
                    diff: Some(unified_diff(&current, &target)),
                    current_content: Some(current),
                    target_content: Some(target),
                };
                snapshot.record_resolution(self.resolution_for(&artifact));
                snapshot
            }
        };

        debug!(
            path = %artifact.destination_path().display(),
            conflicted = conflict.is_conflicted,
            resolution = ?conflict.chosen_resolution,
            "Planned artifact"
        );
        Ok(Plan::new(artifact, conflict))
    }

    fn resolution_for(&self, artifact: &Artifact) -> ConflictResolution {
        // Forced actions win over everything, including delete confirmation.
        if artifact.flags().force_overwrite {
            return ConflictResolution::Overwrite;
        }
        let is_remove = artifact.action_type().builtin() == Some(BuiltinAction::Remove);
        if is_remove && self.confirm_before_delete {
            return ConflictResolution::Ask;
        }
        self.strategy
    }
}

/// Line-level unified diff of `current` → `target`.
pub fn unified_diff(current: &str, target: &str) -> String {
    TextDiff::from_lines(current, target)
        .unified_diff()
        .context_radius(3)
        .header("current", "target")
        .to_string()
}

/// Offer every pending conflict to `decisions`.
///
/// Concrete answers are recorded; `None` (or `ask`) leaves the plan pending.
/// Returns how many plans were resolved.
#[instrument(skip_all)]
pub fn resolve_pending(plans: &mut [Plan], decisions: &dyn DecisionProvider) -> KilnResult<usize> {
    let mut resolved = 0;
    for plan in plans.iter_mut().filter(|p| p.is_pending()) {
        if let Some(resolution) = decisions.resolve_conflict(plan)? {
            if plan.conflict.record_resolution(resolution) {
                debug!(
                    path = %plan.artifact.destination_path().display(),
                    %resolution,
                    "Pending conflict resolved"
                );
                resolved += 1;
            }
        }
    }
    if resolved > 0 {
        info!(resolved, "Resolved pending conflicts");
    }
    Ok(resolved)
}
