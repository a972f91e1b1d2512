//! Reports: the user-facing projection of an (artifact, plan, result) triple.

use serde::{Deserialize, Serialize};

use super::artifact::{Artifact, Provenance};
use super::outcome::{ApplyResult, ErrorSnapshot};
use super::plan::{ConflictSnapshot, Plan};
use crate::domain::ids::{ArtifactId, PlanId, ReportId, ResultId};
use crate::domain::value_objects::ResultStatus;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub artifact_id: ArtifactId,
    pub plan_id: PlanId,
    pub result_id: ResultId,
    pub conflict: ConflictSnapshot,
    pub error: ErrorSnapshot,
    pub provenance: Provenance,
    pub status: ResultStatus,
    pub status_message: String,
}

impl Report {
    /// Build the report for one triple. Pure; the caller guarantees the
    /// three records belong together.
    pub fn project(artifact: &Artifact, plan: &Plan, result: &ApplyResult) -> Self {
        Self {
            id: ReportId::generate(),
            artifact_id: artifact.id().clone(),
            plan_id: plan.id.clone(),
            result_id: result.id.clone(),
            conflict: result.conflict.clone(),
            error: result.error.clone(),
            provenance: artifact.provenance().clone(),
            status: result.status,
            status_message: result.status_message.clone(),
        }
    }
}
