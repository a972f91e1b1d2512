//! Apply results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::plan::{ConflictSnapshot, Plan};
use crate::domain::ids::{ArtifactId, PlanId, ResultId};
use crate::domain::value_objects::{ErrorResolution, ResultStatus};

/// What went wrong while applying a plan, if anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorSnapshot {
    pub is_errored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_resolution: Option<ErrorResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorSnapshot {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn errored(resolution: ErrorResolution, error: impl Into<String>) -> Self {
        Self {
            is_errored: true,
            chosen_resolution: Some(resolution),
            error: Some(error.into()),
        }
    }
}

/// Wall-clock timing of one apply step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_ms: i64,
}

impl Execution {
    pub fn between(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
            duration_ms: (end_time - start_time).num_milliseconds().max(0),
        }
    }
}

/// Terminal outcome of applying one plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyResult {
    pub id: ResultId,
    pub plan_id: PlanId,
    pub artifact_id: ArtifactId,
    pub status: ResultStatus,
    pub status_message: String,
    pub conflict: ConflictSnapshot,
    pub error: ErrorSnapshot,
    pub execution: Execution,
}

impl ApplyResult {
    pub fn for_plan(
        plan: &Plan,
        status: ResultStatus,
        status_message: impl Into<String>,
        error: ErrorSnapshot,
        execution: Execution,
    ) -> Self {
        Self {
            id: ResultId::generate(),
            plan_id: plan.id.clone(),
            artifact_id: plan.artifact.id().clone(),
            status,
            status_message: status_message.into(),
            conflict: plan.conflict.clone(),
            error,
            execution,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResultStatus::Succeed
    }
}
