//! Plans: an artifact plus what applying it would collide with.

use serde::{Deserialize, Serialize};

use super::artifact::Artifact;
use crate::domain::ids::PlanId;
use crate::domain::value_objects::ConflictResolution;

/// Conflict state of one plan.
///
/// `chosen_resolution` is recorded at most once, while planning.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConflictSnapshot {
    pub is_conflicted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chosen_resolution: Option<ConflictResolution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_content: Option<String>,
    /// Unified line diff of current vs target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl ConflictSnapshot {
    pub fn clean() -> Self {
        Self::default()
    }

    /// Conflicted and still waiting for a decision.
    pub fn is_pending(&self) -> bool {
        self.is_conflicted && self.chosen_resolution.is_none()
    }

    /// Record a decision. `ask` and second decisions are ignored.
    ///
    /// Returns whether the resolution was recorded.
    pub fn record_resolution(&mut self, resolution: ConflictResolution) -> bool {
        if !resolution.is_decision() || self.chosen_resolution.is_some() {
            return false;
        }
        self.chosen_resolution = Some(resolution);
        true
    }
}

/// What the executor will do for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub artifact: Artifact,
    pub conflict: ConflictSnapshot,
}

impl Plan {
    pub fn new(artifact: Artifact, conflict: ConflictSnapshot) -> Self {
        Self {
            id: PlanId::generate(),
            artifact,
            conflict,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.conflict.is_pending()
    }
}
