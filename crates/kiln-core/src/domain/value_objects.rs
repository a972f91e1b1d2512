//! Domain value objects: strategies, action types, template kinds, statuses.
//!
//! # Design
//!
//! These are pure value types: equality-by-value, no identity. This file's
//! only job is to define the types, their string representations, and their
//! `FromStr` parsers. Decisions that *use* them live in the services.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ── Strategies ───────────────────────────────────────────────────────────────

/// How a conflicting plan is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictResolution {
    Abort,
    #[default]
    Ask,
    Overwrite,
    Skip,
}

impl ConflictResolution {
    pub const ALL: &'static str = "abort, ask, overwrite, skip";

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Ask => "ask",
            Self::Overwrite => "overwrite",
            Self::Skip => "skip",
        }
    }

    /// `ask` is a deferral, not a decision.
    pub const fn is_decision(self) -> bool {
        !matches!(self, Self::Ask)
    }
}

impl fmt::Display for ConflictResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConflictResolution {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "ask" => Ok(Self::Ask),
            "overwrite" | "force" => Ok(Self::Overwrite),
            "skip" => Ok(Self::Skip),
            other => Err(DomainError::UnknownStrategy {
                kind: "conflict",
                value: other.to_string(),
                expected: Self::ALL,
            }),
        }
    }
}

/// What the executor does when applying a plan fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorResolution {
    #[default]
    Abort,
    Skip,
}

impl ErrorResolution {
    pub const ALL: &'static str = "abort, skip";

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abort => "abort",
            Self::Skip => "skip",
        }
    }
}

impl fmt::Display for ErrorResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorResolution {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "skip" => Ok(Self::Skip),
            other => Err(DomainError::UnknownStrategy {
                kind: "error",
                value: other.to_string(),
                expected: Self::ALL,
            }),
        }
    }
}

/// Where rendered artifacts are cached between (or within) runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheResolution {
    #[default]
    Memory,
    Filesystem,
    None,
}

impl CacheResolution {
    pub const ALL: &'static str = "memory, filesystem, none";

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Filesystem => "filesystem",
            Self::None => "none",
        }
    }
}

impl fmt::Display for CacheResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CacheResolution {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "filesystem" | "fs" => Ok(Self::Filesystem),
            "none" | "off" => Ok(Self::None),
            other => Err(DomainError::UnknownStrategy {
                kind: "cache",
                value: other.to_string(),
                expected: Self::ALL,
            }),
        }
    }
}

// ── Action types ─────────────────────────────────────────────────────────────

/// The six mutations Kiln knows how to perform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinAction {
    Add,
    Append,
    Copy,
    Modify,
    Move,
    Remove,
}

impl BuiltinAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Append => "append",
            Self::Copy => "copy",
            Self::Modify => "modify",
            Self::Move => "move",
            Self::Remove => "remove",
        }
    }

    /// Actions whose final content depends on what is already on disk.
    pub const fn reads_destination(self) -> bool {
        matches!(self, Self::Append | Self::Modify)
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "append" => Some(Self::Append),
            "copy" => Some(Self::Copy),
            "modify" => Some(Self::Modify),
            "move" => Some(Self::Move),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

impl fmt::Display for BuiltinAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action's `type`: one of the built-ins, or the name of a registered
/// custom action delegate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ActionKind {
    Builtin(BuiltinAction),
    Custom(String),
}

impl ActionKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Builtin(b) => b.as_str(),
            Self::Custom(name) => name,
        }
    }

    pub fn builtin(&self) -> Option<BuiltinAction> {
        match self {
            Self::Builtin(b) => Some(*b),
            Self::Custom(_) => None,
        }
    }
}

impl From<BuiltinAction> for ActionKind {
    fn from(b: BuiltinAction) -> Self {
        Self::Builtin(b)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyActionType);
        }
        Ok(BuiltinAction::parse(trimmed)
            .map(Self::Builtin)
            .unwrap_or_else(|| Self::Custom(trimmed.to_string())))
    }
}

impl TryFrom<String> for ActionKind {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ActionKind> for String {
    fn from(kind: ActionKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Whether an action's `source_or_content` is inline text or a template reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    File,
    #[default]
    Raw,
}

impl TemplateKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "raw" => Ok(Self::Raw),
            other => Err(DomainError::UnknownTemplateKind(other.to_string())),
        }
    }
}

// ── Outcomes ─────────────────────────────────────────────────────────────────

/// Terminal status of one applied plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultStatus {
    Succeed,
    Skipped,
    Failed,
}

impl ResultStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Succeed => "succeed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a catalog resource came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    External,
    #[default]
    Internal,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::External => "external",
            Self::Internal => "internal",
        })
    }
}

// ── Cache TTL ────────────────────────────────────────────────────────────────

/// Time-to-live of a cached render, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheTtl(u64);

impl CacheTtl {
    pub const ONE_HOUR: Self = Self(60 * 60 * 1000);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    pub const fn as_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Whether an entry of the given age has outlived this TTL.
    pub fn is_expired(&self, age: Duration) -> bool {
        age > self.as_duration()
    }
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self::ONE_HOUR
    }
}

impl fmt::Display for CacheTtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
