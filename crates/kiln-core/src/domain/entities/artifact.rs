//! Rendered artifacts.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::checksum::Checksum;
use crate::domain::ids::ArtifactId;
use crate::domain::value_objects::ActionKind;

/// Where an artifact came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provenance {
    pub action_type: ActionKind,
    pub generator_name: String,
    /// Source file for `move` and file-based templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
    pub destination_path: PathBuf,
}

/// Per-action switches the planner and executor honour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionFlags {
    pub abort_on_fail: bool,
    pub force_overwrite: bool,
}

/// The in-memory result of rendering one action.
///
/// `checksum` is always the BLAKE3 hash of `final_content`; the fields are
/// private so nothing can change one without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    id: ArtifactId,
    raw_content: String,
    final_content: String,
    checksum: Checksum,
    destination_path: PathBuf,
    provenance: Provenance,
    #[serde(default)]
    flags: ActionFlags,
}

impl Artifact {
    pub fn new(
        raw_content: impl Into<String>,
        final_content: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        let final_content = final_content.into();
        Self {
            id: ArtifactId::generate(),
            raw_content: raw_content.into(),
            checksum: Checksum::of(&final_content),
            final_content,
            destination_path: provenance.destination_path.clone(),
            provenance,
            flags: ActionFlags::default(),
        }
    }

    pub fn with_flags(mut self, flags: ActionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn id(&self) -> &ArtifactId {
        &self.id
    }

    /// The rendered template piece.
    pub fn raw_content(&self) -> &str {
        &self.raw_content
    }

    /// The whole file content that applying the action produces.
    pub fn final_content(&self) -> &str {
        &self.final_content
    }

    pub fn checksum(&self) -> &Checksum {
        &self.checksum
    }

    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn action_type(&self) -> &ActionKind {
        &self.provenance.action_type
    }

    pub fn flags(&self) -> ActionFlags {
        self.flags
    }

    /// Copy with new content. Keeps the id, recomputes the checksum.
    ///
    /// This is how `onRendered` hooks rewrite an artifact.
    pub fn with_content(&self, raw_content: impl Into<String>, final_content: impl Into<String>) -> Self {
        let final_content = final_content.into();
        Self {
            id: self.id.clone(),
            raw_content: raw_content.into(),
            checksum: Checksum::of(&final_content),
            final_content,
            destination_path: self.destination_path.clone(),
            provenance: self.provenance.clone(),
            flags: self.flags,
        }
    }

    /// Copy targeting another path. Keeps the id and content.
    pub fn with_destination(&self, destination: impl Into<PathBuf>) -> Self {
        let destination = destination.into();
        let mut provenance = self.provenance.clone();
        provenance.destination_path = destination.clone();
        Self {
            destination_path: destination,
            provenance,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::BuiltinAction;

    fn provenance(path: &str) -> Provenance {
        Provenance {
            action_type: BuiltinAction::Add.into(),
            generator_name: "g".into(),
            source_path: None,
            destination_path: PathBuf::from(path),
        }
    }

    #[test]
    fn checksum_tracks_final_content_only() {
        let a = Artifact::new("piece", "same", provenance("/a"));
        let b = Artifact::new("other piece", "same", provenance("/b"));
        assert_eq!(a.checksum(), b.checksum());
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn with_content_recomputes_checksum_and_keeps_id() {
        let a = Artifact::new("x", "x", provenance("/a"));
        let b = a.with_content("y", "y");
        assert_eq!(a.id(), b.id());
        assert_eq!(b.checksum(), &Checksum::of("y"));
    }

    #[test]
    fn with_destination_updates_provenance() {
        let a = Artifact::new("x", "x", provenance("/a")).with_destination("/b");
        assert_eq!(a.destination_path(), Path::new("/b"));
        assert_eq!(a.provenance().destination_path, PathBuf::from("/b"));
    }
}
