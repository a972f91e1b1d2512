//! Apply: plans → results, strictly in order.
//!
//! The executor is the only stage that mutates the filesystem. It never
//! decides conflicts; it only carries out what planning recorded.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use crate::application::ApplicationError;
use crate::application::config::EngineConfig;
use crate::application::ports::{Filesystem, read_existing};
use crate::domain::{
    ActionKind, ApplyResult, BuiltinAction, ConflictResolution, ErrorResolution, ErrorSnapshot,
    Execution, Plan, ResultStatus,
};
use crate::error::{KilnError, KilnResult};

/// Shared flag checked before each plan is applied.
///
/// Cancelling never interrupts a mutation already in progress.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Results of an apply pass, plus why it stopped early (if it did).
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    pub results: Vec<ApplyResult>,
    pub halt: Option<ApplicationError>,
}

impl ExecutionOutcome {
    pub fn is_complete(&self) -> bool {
        self.halt.is_none()
    }
}

pub struct Executor<'a> {
    filesystem: &'a dyn Filesystem,
    dry: bool,
    error_resolution: ErrorResolution,
    cancellation: CancellationToken,
}

impl<'a> Executor<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, config: &EngineConfig) -> Self {
        Self {
            filesystem,
            dry: config.behavior.dry,
            error_resolution: config.strategy.error_resolution,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    #[instrument(skip_all, fields(plans = plans.len(), dry = self.dry))]
    pub fn apply(&self, plans: &[Plan]) -> ExecutionOutcome {
        let mut results = Vec::with_capacity(plans.len());
        let mut halt = None;

        for plan in plans {
            if self.cancellation.is_cancelled() {
                warn!("Run cancelled before applying remaining plans");
                halt = Some(ApplicationError::Cancelled);
                break;
            }

            let path = plan.artifact.destination_path();
            if plan.is_pending() {
                warn!(path = %path.display(), "Unresolved conflict, halting");
                halt = Some(ApplicationError::ConflictUnresolved {
                    plan_id: plan.id.clone(),
                    path: path.to_path_buf(),
                });
                break;
            }

            let start = Utc::now();
            let finish = |status: ResultStatus, message: String, error: ErrorSnapshot| {
                ApplyResult::for_plan(plan, status, message, error, Execution::between(start, Utc::now()))
            };

            match plan.conflict.chosen_resolution {
                Some(ConflictResolution::Skip) => {
                    debug!(path = %path.display(), "Skipped on conflict");
                    results.push(finish(
                        ResultStatus::Skipped,
                        format!("kept existing {}", path.display()),
                        ErrorSnapshot::none(),
                    ));
                    continue;
                }
                Some(ConflictResolution::Abort) => {
                    let err = ApplicationError::ConflictAborted {
                        path: path.to_path_buf(),
                    };
                    warn!(path = %path.display(), "Aborting on conflict");
                    results.push(finish(
                        ResultStatus::Failed,
                        err.to_string(),
                        ErrorSnapshot::errored(ErrorResolution::Abort, err.to_string()),
                    ));
                    halt = Some(err);
                    break;
                }
                _ => {}
            }

            match self.mutate(plan) {
                Ok(message) => {
                    debug!(path = %path.display(), %message, "Applied");
                    results.push(finish(ResultStatus::Succeed, message, ErrorSnapshot::none()));
                }
                Err(e) => {
                    let resolution = if plan.artifact.flags().abort_on_fail {
                        ErrorResolution::Abort
                    } else {
                        self.error_resolution
                    };
                    let err = into_application(e, path);
                    results.push(finish(
                        ResultStatus::Failed,
                        err.to_string(),
                        ErrorSnapshot::errored(resolution, err.to_string()),
                    ));
                    match resolution {
                        ErrorResolution::Abort => {
                            warn!(path = %path.display(), error = %err, "Apply failed, halting");
                            halt = Some(err);
                            break;
                        }
                        ErrorResolution::Skip => {
                            warn!(path = %path.display(), error = %err, "Apply failed, continuing");
                        }
                    }
                }
            }
        }

        info!(
            results = results.len(),
            halted = halt.is_some(),
            "Apply finished"
        );
        ExecutionOutcome { results, halt }
    }

    /// Perform (or, when dry, describe) the plan's mutation.
    fn mutate(&self, plan: &Plan) -> KilnResult<String> {
        let artifact = &plan.artifact;
        let path = artifact.destination_path();
        let verb = if plan.conflict.is_conflicted {
            "overwrote"
        } else {
            "wrote"
        };

        match artifact.action_type() {
            ActionKind::Builtin(BuiltinAction::Remove) => {
                if !self.filesystem.is_file_exists(path) {
                    return Ok(format!("nothing to remove at {}", path.display()));
                }
                if !self.dry {
                    self.filesystem.remove_file(path)?;
                }
                Ok(format!("removed {}", path.display()))
            }
            ActionKind::Builtin(BuiltinAction::Append) => {
                if !self.dry {
                    let current = read_existing(self.filesystem, path)?.unwrap_or_default();
                    let content = format!("{}{}", current, artifact.raw_content());
                    self.filesystem.write_file(path, &content)?;
                }
                Ok(format!("appended to {}", path.display()))
            }
            ActionKind::Builtin(BuiltinAction::Move) => {
                let source = artifact.provenance().source_path.as_deref();
                if !self.dry {
                    self.filesystem.write_file(path, artifact.final_content())?;
                    if let Some(source) = source.filter(|s| *s != path) {
                        if self.filesystem.is_file_exists(source) {
                            self.filesystem.remove_file(source)?;
                        }
                    }
                }
                Ok(match source {
                    Some(source) => format!("moved {} to {}", source.display(), path.display()),
                    None => format!("{} {}", verb, path.display()),
                })
            }
            _ => {
                if !self.dry {
                    self.filesystem.write_file(path, artifact.final_content())?;
                }
                Ok(format!("{} {}", verb, path.display()))
            }
        }
    }
}

fn into_application(error: KilnError, path: &Path) -> ApplicationError {
    match error {
        KilnError::Application(e) => e,
        other => ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::output::MockFilesystem;
    use crate::domain::{ActionFlags, Artifact, ConflictSnapshot, Provenance};
    use mockall::predicate::*;
    use std::path::PathBuf;

    fn plan(path: &str, kind: BuiltinAction, resolution: Option<ConflictResolution>) -> Plan {
        let artifact = Artifact::new(
            "new",
            "new",
            Provenance {
                action_type: kind.into(),
                generator_name: "g".into(),
                source_path: None,
                destination_path: PathBuf::from(path),
            },
        );
        let conflict = match resolution {
            None => ConflictSnapshot::clean(),
            Some(r) => {
                let mut c = ConflictSnapshot {
                    is_conflicted: true,
                    ..Default::default()
                };
                c.record_resolution(r);
                c
            }
        };
        Plan::new(artifact, conflict)
    }

    fn config() -> EngineConfig {
        EngineConfig::rooted_at("/p").unwrap()
    }

    fn io_error(path: &Path) -> KilnError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "permission denied".into(),
        }
        .into()
    }

    #[test]
    fn writes_in_order_and_succeeds() {
        let mut fs = MockFilesystem::new();
        let mut seq = mockall::Sequence::new();
        for p in ["/p/a", "/p/b"] {
            fs.expect_write_file()
                .with(eq(Path::new(p)), eq("new"))
                .times(1)
                .in_sequence(&mut seq)
                .returning(|_, _| Ok(()));
        }

        let plans = vec![
            plan("/p/a", BuiltinAction::Add, None),
            plan("/p/b", BuiltinAction::Add, None),
        ];
        let outcome = Executor::new(&fs, &config()).apply(&plans);

        assert!(outcome.is_complete());
        assert_eq!(outcome.results.len(), 2);
        assert!(outcome.results.iter().all(ApplyResult::is_success));
        assert_eq!(outcome.results[0].plan_id, plans[0].id);
    }

    #[test]
    fn skip_touches_nothing() {
        let fs = MockFilesystem::new();
        let plans = vec![plan("/p/a", BuiltinAction::Add, Some(ConflictResolution::Skip))];
        let outcome = Executor::new(&fs, &config()).apply(&plans);
        assert_eq!(outcome.results[0].status, ResultStatus::Skipped);
        assert!(outcome.is_complete());
    }

    #[test]
    fn abort_fails_and_halts_before_later_plans() {
        let fs = MockFilesystem::new();
        let plans = vec![
            plan("/p/a", BuiltinAction::Add, Some(ConflictResolution::Abort)),
            plan("/p/b", BuiltinAction::Add, None),
        ];
        let outcome = Executor::new(&fs, &config()).apply(&plans);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results[0].status, ResultStatus::Failed);
        assert_eq!(
            outcome.halt,
            Some(ApplicationError::ConflictAborted {
                path: PathBuf::from("/p/a")
            })
        );
    }

    #[test]
    fn pending_conflict_halts_without_result() {
        let fs = MockFilesystem::new();
        let plans = vec![plan("/p/a", BuiltinAction::Add, Some(ConflictResolution::Ask))];
        assert!(plans[0].is_pending());

        let outcome = Executor::new(&fs, &config()).apply(&plans);
        assert!(outcome.results.is_empty());
        assert!(matches!(
            outcome.halt,
            Some(ApplicationError::ConflictUnresolved { .. })
        ));
    }

    #[test]
    fn error_strategy_skip_continues() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file()
            .with(eq(Path::new("/p/a")), always())
            .returning(|p, _| Err(io_error(p)));
        fs.expect_write_file()
            .with(eq(Path::new("/p/b")), always())
            .returning(|_, _| Ok(()));

        let mut config = config();
        config.strategy.error_resolution = ErrorResolution::Skip;
        let plans = vec![
            plan("/p/a", BuiltinAction::Add, None),
            plan("/p/b", BuiltinAction::Add, None),
        ];
        let outcome = Executor::new(&fs, &config).apply(&plans);

        assert!(outcome.is_complete());
        assert_eq!(outcome.results[0].status, ResultStatus::Failed);
        assert!(outcome.results[0].error.is_errored);
        assert_eq!(outcome.results[0].error.chosen_resolution, Some(ErrorResolution::Skip));
        assert!(outcome.results[0].status_message.contains("permission denied"));
        assert_eq!(outcome.results[1].status, ResultStatus::Succeed);
    }

    #[test]
    fn abort_on_fail_overrides_skip_strategy() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().returning(|p, _| Err(io_error(p)));

        let mut config = config();
        config.strategy.error_resolution = ErrorResolution::Skip;
        let mut first = plan("/p/a", BuiltinAction::Add, None);
        first.artifact = first.artifact.with_flags(ActionFlags {
            abort_on_fail: true,
            ..Default::default()
        });
        let plans = vec![first, plan("/p/b", BuiltinAction::Add, None)];
        let outcome = Executor::new(&fs, &config).apply(&plans);

        assert_eq!(outcome.results.len(), 1);
        assert!(matches!(
            outcome.halt,
            Some(ApplicationError::FilesystemError { .. })
        ));
    }

    #[test]
    fn dry_run_reports_without_writing() {
        let mut fs = MockFilesystem::new();
        fs.expect_write_file().never();
        fs.expect_remove_file().never();
        fs.expect_is_file_exists().return_const(true);

        let mut config = config();
        config.behavior.dry = true;
        let plans = vec![
            plan("/p/a", BuiltinAction::Add, None),
            plan("/p/b", BuiltinAction::Remove, Some(ConflictResolution::Overwrite)),
        ];
        let outcome = Executor::new(&fs, &config).apply(&plans);
        assert!(outcome.results.iter().all(ApplyResult::is_success));
    }

    #[test]
    fn remove_of_absent_file_succeeds() {
        let mut fs = MockFilesystem::new();
        fs.expect_is_file_exists().return_const(false);
        fs.expect_remove_file().never();

        let plans = vec![plan("/p/gone", BuiltinAction::Remove, None)];
        let outcome = Executor::new(&fs, &config()).apply(&plans);
        assert_eq!(outcome.results[0].status, ResultStatus::Succeed);
    }

    #[test]
    fn cancellation_stops_before_next_plan() {
        let token = CancellationToken::new();
        let mut fs = MockFilesystem::new();
        {
            let token = token.clone();
            fs.expect_write_file().times(1).returning(move |_, _| {
                token.cancel();
                Ok(())
            });
        }

        let plans = vec![
            plan("/p/a", BuiltinAction::Add, None),
            plan("/p/b", BuiltinAction::Add, None),
        ];
        let outcome = Executor::new(&fs, &config())
            .with_cancellation(token)
            .apply(&plans);

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.halt, Some(ApplicationError::Cancelled));
    }
}
