//! Opaque identifiers for pipeline records.
//!
//! Every id is `<kind>_<uuid v4>` and wrapped in its own newtype so a
//! `PlanId` can never be passed where an `ArtifactId` is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub const PREFIX: &'static str = $prefix;

            /// Mint a fresh, never-reused id.
            pub fn generate() -> Self {
                Self(format!("{}_{}", $prefix, Uuid::new_v4()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identity of a rendered artifact.
    ArtifactId,
    "artifact"
);
define_id!(
    /// Identity of a plan.
    PlanId,
    "plan"
);
define_id!(
    /// Identity of an apply result.
    ResultId,
    "result"
);
define_id!(
    /// Identity of a report.
    ReportId,
    "report"
);
define_id!(
    /// Identity of one pipeline run.
    RuntimeId,
    "runtime"
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_carry_their_kind_prefix() {
        assert!(ArtifactId::generate().as_str().starts_with("artifact_"));
        assert!(PlanId::generate().as_str().starts_with("plan_"));
        assert!(ResultId::generate().as_str().starts_with("result_"));
        assert!(ReportId::generate().as_str().starts_with("report_"));
        assert!(RuntimeId::generate().as_str().starts_with("runtime_"));
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = (0..256).map(|_| PlanId::generate()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = ArtifactId::generate();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
    }
}
