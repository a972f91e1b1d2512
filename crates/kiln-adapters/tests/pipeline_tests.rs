//! End-to-end runs of the generation pipeline against the in-memory adapters.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use kiln_adapters::{MemoryCache, MemoryFilesystem, NonInteractive, SimpleRenderer};
use kiln_core::{
    application::{
        ApplicationError, EngineConfig, GenerateRequest, GenerateService, ResourceCatalog,
        RunOutput, ports::Filesystem, services::CancellationToken,
    },
    domain::{
        Action, ActionConfig, ActionKind, ActionTemplate, Answers, BuiltinAction, CacheTtl, ConflictResolution,
        ErrorResolution, GeneratorName, GeneratorResource, ResultStatus,
    },
};

const ROOT: &str = "/p";

// ── helpers ───────────────────────────────────────────────────────────────────

fn generator(actions: Vec<Action>) -> GeneratorResource {
    actions.into_iter().fold(
        GeneratorResource::new(GeneratorName::try_new("gen").unwrap()),
        GeneratorResource::with_action,
    )
}

fn catalog(actions: Vec<Action>) -> ResourceCatalog {
    ResourceCatalog::builder()
        .generator(generator(actions))
        .build()
        .unwrap()
}

fn action(kind: BuiltinAction, destination: &str, content: &str) -> Action {
    Action::new(kind, destination).with_template(ActionTemplate::raw(content))
}

fn path(relative: &str) -> PathBuf {
    Path::new(ROOT).join(relative)
}

struct Harness {
    config: EngineConfig,
    catalog: ResourceCatalog,
    fs: MemoryFilesystem,
    decisions: NonInteractive,
}

impl Harness {
    fn new(actions: Vec<Action>) -> Self {
        Self::with_catalog(catalog(actions))
    }

    fn with_catalog(catalog: ResourceCatalog) -> Self {
        Self {
            config: EngineConfig::rooted_at(ROOT).unwrap(),
            catalog,
            fs: MemoryFilesystem::new(),
            decisions: NonInteractive::new(),
        }
    }

    fn with_file(mut self, relative: &str, content: &str) -> Self {
        self.fs = self.fs.with_file(path(relative), content);
        self
    }

    fn conflicts(mut self, strategy: ConflictResolution) -> Self {
        self.config.strategy.conflict_resolution = strategy;
        self
    }

    fn service(&self) -> GenerateService {
        GenerateService::new(
            self.config.clone(),
            self.catalog.clone(),
            Box::new(SimpleRenderer::new()),
            Box::new(self.fs.clone()),
            Box::new(self.decisions),
        )
    }

    fn run(&self) -> RunOutput {
        self.run_with(Answers::new())
    }

    fn run_with(&self, answers: Answers) -> RunOutput {
        self.service()
            .run(GenerateRequest::new("gen", ROOT).with_answers(answers))
            .unwrap()
    }

    fn file(&self, relative: &str) -> Option<String> {
        self.fs.contents(path(relative))
    }
}

fn statuses(out: &RunOutput) -> Vec<ResultStatus> {
    out.reports.iter().map(|r| r.status).collect()
}

// ── rendering and identity ────────────────────────────────────────────────────

#[test]
fn checksums_are_deterministic_across_runs() {
    let mut harness = Harness::new(vec![
        action(BuiltinAction::Add, "{{name}}.txt", "hello {{name}}"),
        action(BuiltinAction::Add, "b.txt", "static"),
    ]);
    harness.config.behavior.dry = true;
    let answers = Answers::new().with("name", "kiln");

    let first = harness.run_with(answers.clone());
    let second = harness.run_with(answers);

    let sums = |out: &RunOutput| {
        out.artifacts
            .iter()
            .map(|a| a.checksum().clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(sums(&first), sums(&second));
    // identity is per run, content identity is not
    assert_ne!(first.artifacts[0].id(), second.artifacts[0].id());
}

#[test]
fn reports_follow_action_order() {
    let names = ["c.txt", "a.txt", "b.txt"];
    let harness = Harness::new(
        names
            .iter()
            .map(|n| action(BuiltinAction::Add, n, n))
            .collect(),
    );

    let out = harness.run();

    let reported: Vec<_> = out
        .reports
        .iter()
        .map(|r| r.provenance.destination_path.clone())
        .collect();
    assert_eq!(reported, names.iter().map(|n| path(n)).collect::<Vec<_>>());
    for (report, (artifact, plan)) in out.reports.iter().zip(out.artifacts.iter().zip(&out.plans)) {
        assert_eq!(&report.artifact_id, artifact.id());
        assert_eq!(report.plan_id, plan.id);
    }
}

#[test]
fn answers_and_helpers_shape_paths_and_content() {
    let harness = Harness::new(vec![action(
        BuiltinAction::Add,
        "src/{{kebabCase name}}.ts",
        "export class {{pascalCase name}} {}",
    )]);

    harness.run_with(Answers::new().with("name", "user profile"));

    assert_eq!(
        harness.file("src/user-profile.ts").as_deref(),
        Some("export class UserProfile {}")
    );
}

// ── conflicts ─────────────────────────────────────────────────────────────────

#[test]
fn identical_content_is_not_a_conflict() {
    let harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "same")])
        .with_file("a.txt", "same")
        .conflicts(ConflictResolution::Abort);

    let out = harness.run();

    assert!(out.is_complete());
    assert!(!out.plans[0].conflict.is_conflicted);
    assert_eq!(statuses(&out), vec![ResultStatus::Succeed]);
}

#[test]
fn overwrite_strategy_replaces_content() {
    let harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "new")])
        .with_file("a.txt", "old")
        .conflicts(ConflictResolution::Overwrite);

    let out = harness.run();

    assert_eq!(harness.file("a.txt").as_deref(), Some("new"));
    let report = &out.reports[0];
    assert_eq!(report.status, ResultStatus::Succeed);
    assert!(report.conflict.is_conflicted);
    assert_eq!(report.conflict.chosen_resolution, Some(ConflictResolution::Overwrite));
    assert!(report.status_message.starts_with("overwrote"));
}

#[test]
fn skip_strategy_keeps_existing_content() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "a.txt", "new"),
        action(BuiltinAction::Add, "b.txt", "fresh"),
    ])
    .with_file("a.txt", "old")
    .conflicts(ConflictResolution::Skip);

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(statuses(&out), vec![ResultStatus::Skipped, ResultStatus::Succeed]);
    assert_eq!(harness.file("a.txt").as_deref(), Some("old"));
    assert_eq!(harness.file("b.txt").as_deref(), Some("fresh"));
}

#[test]
fn abort_strategy_halts_and_keeps_prior_results() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "first.txt", "1"),
        action(BuiltinAction::Add, "a.txt", "new"),
        action(BuiltinAction::Add, "never.txt", "3"),
    ])
    .with_file("a.txt", "old")
    .conflicts(ConflictResolution::Abort);

    let out = harness.run();

    assert_eq!(statuses(&out), vec![ResultStatus::Succeed, ResultStatus::Failed]);
    assert!(matches!(out.halt, Some(ApplicationError::ConflictAborted { .. })));
    assert!(out.reports[1].error.is_errored);
    assert_eq!(harness.file("first.txt").as_deref(), Some("1"));
    assert_eq!(harness.file("a.txt").as_deref(), Some("old"));
    assert_eq!(harness.file("never.txt"), None);
}

#[test]
fn force_overwrite_beats_abort() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "a.txt", "forced").force_overwrite(true),
    ])
    .with_file("a.txt", "old")
    .conflicts(ConflictResolution::Abort);

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(harness.file("a.txt").as_deref(), Some("forced"));
}

#[test]
fn unanswered_ask_halts_before_writing() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "a.txt", "new"),
        action(BuiltinAction::Add, "b.txt", "later"),
    ])
    .with_file("a.txt", "old")
    .conflicts(ConflictResolution::Ask);

    let out = harness.run();

    assert!(out.results.is_empty());
    assert!(matches!(out.halt, Some(ApplicationError::ConflictUnresolved { .. })));
    assert_eq!(harness.file("b.txt"), None);
}

#[test]
fn decision_provider_resolves_pending_conflicts() {
    let mut harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "new")])
        .with_file("a.txt", "old")
        .conflicts(ConflictResolution::Ask);
    harness.decisions = NonInteractive::resolving_with(ConflictResolution::Overwrite);

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(
        out.plans[0].conflict.chosen_resolution,
        Some(ConflictResolution::Overwrite)
    );
    assert_eq!(harness.file("a.txt").as_deref(), Some("new"));
}

// ── apply errors ──────────────────────────────────────────────────────────────

#[test]
fn skip_error_strategy_records_failure_and_continues() {
    // "dir" is a directory, so writing it as a file fails
    let mut harness = Harness::new(vec![
        action(BuiltinAction::Add, "dir", "x"),
        action(BuiltinAction::Add, "after.txt", "y"),
    ])
    .with_file("dir/inner.txt", "");
    harness.config.strategy.error_resolution = ErrorResolution::Skip;

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(statuses(&out), vec![ResultStatus::Failed, ResultStatus::Succeed]);
    let error = &out.reports[0].error;
    assert!(error.is_errored);
    assert_eq!(error.chosen_resolution, Some(ErrorResolution::Skip));
    assert_eq!(harness.file("after.txt").as_deref(), Some("y"));
}

#[test]
fn abort_on_fail_halts_even_when_errors_are_skipped() {
    let mut harness = Harness::new(vec![
        action(BuiltinAction::Add, "dir", "x").abort_on_fail(true),
        action(BuiltinAction::Add, "after.txt", "y"),
    ])
    .with_file("dir/inner.txt", "");
    harness.config.strategy.error_resolution = ErrorResolution::Skip;

    let out = harness.run();

    assert_eq!(statuses(&out), vec![ResultStatus::Failed]);
    assert!(matches!(out.halt, Some(ApplicationError::FilesystemError { .. })));
    assert_eq!(harness.file("after.txt"), None);
}

// ── action semantics ──────────────────────────────────────────────────────────

#[test]
fn append_sees_a_file_added_earlier_in_the_run() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "log.txt", "a\n"),
        action(BuiltinAction::Append, "log.txt", "b\n"),
    ]);

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(out.artifacts[1].raw_content(), "b\n");
    assert_eq!(out.artifacts[1].final_content(), "a\nb\n");
    assert_eq!(harness.file("log.txt").as_deref(), Some("a\nb\n"));
}

#[test]
fn modify_renders_against_current_content() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "a.txt", "base"),
        action(BuiltinAction::Modify, "a.txt", "{{content}} + {{extra}}"),
    ]);

    harness.run_with(Answers::new().with("extra", "more"));

    assert_eq!(harness.file("a.txt").as_deref(), Some("base + more"));
}

#[test]
fn move_relocates_the_file() {
    let harness = Harness::new(vec![action(BuiltinAction::Move, "new/place.txt", "old.txt")])
        .with_file("old.txt", "payload");

    let out = harness.run();

    assert!(out.is_complete());
    assert_eq!(harness.file("new/place.txt").as_deref(), Some("payload"));
    assert_eq!(harness.file("old.txt"), None);
    assert_eq!(
        out.reports[0].provenance.source_path.as_deref(),
        Some(path("old.txt").as_path())
    );
}

#[test]
fn move_of_missing_source_fails_the_render() {
    let harness = Harness::new(vec![action(BuiltinAction::Move, "to.txt", "missing.txt")]);

    let err = harness
        .service()
        .run(GenerateRequest::new("gen", ROOT))
        .unwrap_err();

    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn remove_deletes_existing_files() {
    let harness = Harness::new(vec![action(BuiltinAction::Remove, "a.txt", "")])
        .with_file("a.txt", "bye")
        .conflicts(ConflictResolution::Overwrite);

    let out = harness.run();

    assert_eq!(statuses(&out), vec![ResultStatus::Succeed]);
    assert_eq!(harness.file("a.txt"), None);
}

#[test]
fn custom_actions_delegate_content() {
    let catalog = ResourceCatalog::builder()
        .custom_action_fn(
            "banner",
            |answers: &Answers, _config: &ActionConfig, _fs: &dyn Filesystem| {
                let title = answers.get("title").map(|t| t.to_string()).unwrap_or_default();
                Ok(format!("== {} ==", title))
            },
        )
        .generator(generator(vec![Action::new(
            ActionKind::Custom("banner".into()),
            "banner.txt",
        )]))
        .build()
        .unwrap();
    let harness = Harness::with_catalog(catalog);

    harness.run_with(Answers::new().with("title", "hi"));

    assert_eq!(harness.file("banner.txt").as_deref(), Some("== hi =="));
}

// ── hooks, dry runs, cancellation, caching ────────────────────────────────────

#[test]
fn hook_mutations_reach_the_filesystem_and_reports() {
    let harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "original")]);
    let mut service = harness.service();
    service.hooks_mut().on_rendered(|_, artifacts| {
        Ok(artifacts
            .iter()
            .map(|a| a.with_content("hooked", "hooked"))
            .collect())
    });

    let out = service.run(GenerateRequest::new("gen", ROOT)).unwrap();

    assert_eq!(harness.file("a.txt").as_deref(), Some("hooked"));
    assert_eq!(out.plans[0].artifact.final_content(), "hooked");
    assert!(out.plans[0].artifact.checksum().matches("hooked"));
}

#[test]
fn hook_dropping_an_artifact_reduces_every_stage() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "kept.txt", "k"),
        action(BuiltinAction::Add, "dropped.txt", "d"),
    ]);
    let mut service = harness.service();
    service.hooks_mut().on_rendered(|_, mut artifacts| {
        artifacts.retain(|a| !a.destination_path().ends_with("dropped.txt"));
        Ok(artifacts)
    });

    let out = service.run(GenerateRequest::new("gen", ROOT)).unwrap();

    assert_eq!(out.plans.len(), 1);
    assert_eq!(out.results.len(), 1);
    assert_eq!(out.reports.len(), 1);
    assert_eq!(harness.file("kept.txt").as_deref(), Some("k"));
    assert_eq!(harness.file("dropped.txt"), None);
}

#[test]
fn reports_follow_plans_retargeted_by_hooks() {
    let harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "x")]);
    let mut service = harness.service();
    service.hooks_mut().on_planned(|_, plans| {
        Ok(plans
            .into_iter()
            .map(|mut plan| {
                plan.artifact = plan.artifact.with_destination(path("b.txt"));
                plan
            })
            .collect())
    });

    let out = service.run(GenerateRequest::new("gen", ROOT)).unwrap();

    assert_eq!(harness.file("b.txt").as_deref(), Some("x"));
    assert_eq!(harness.file("a.txt"), None);
    assert_eq!(out.reports[0].provenance.destination_path, path("b.txt"));
}

#[test]
fn failing_hook_stops_the_run() {
    let harness = Harness::new(vec![action(BuiltinAction::Add, "a.txt", "x")]);
    let mut service = harness.service();
    service.hooks_mut().on_planned(|_, _| Err("policy says no".into()));

    let err = service.run(GenerateRequest::new("gen", ROOT)).unwrap_err();

    assert!(err.to_string().contains("policy says no"));
    assert_eq!(harness.file("a.txt"), None);
}

#[test]
fn dry_run_reports_without_mutating() {
    let actions = vec![
        action(BuiltinAction::Add, "new.txt", "n"),
        action(BuiltinAction::Add, "a.txt", "changed"),
        action(BuiltinAction::Remove, "gone.txt", ""),
    ];
    let mut dry = Harness::new(actions.clone())
        .with_file("a.txt", "old")
        .with_file("gone.txt", "x")
        .conflicts(ConflictResolution::Overwrite);
    dry.config.behavior.dry = true;
    let before = dry.fs.snapshot();

    let dry_out = dry.run();
    let again = dry.run();

    assert_eq!(dry.fs.snapshot(), before);
    assert!(dry_out.dry);

    let real = Harness::new(actions)
        .with_file("a.txt", "old")
        .with_file("gone.txt", "x")
        .conflicts(ConflictResolution::Overwrite);
    let real_out = real.run();

    let messages = |out: &RunOutput| {
        out.reports
            .iter()
            .map(|r| (r.status, r.status_message.clone()))
            .collect::<Vec<_>>()
    };
    assert_eq!(messages(&dry_out), messages(&again));
    assert_eq!(messages(&dry_out), messages(&real_out));
}

#[test]
fn cancellation_stops_before_the_next_plan() {
    let harness = Harness::new(vec![
        action(BuiltinAction::Add, "a.txt", "1"),
        action(BuiltinAction::Add, "b.txt", "2"),
    ]);
    let token = CancellationToken::new();
    let trigger = token.clone();
    let mut service = harness.service().with_cancellation(token);
    service.hooks_mut().on_planned(move |_, plans| {
        trigger.cancel();
        Ok(plans)
    });

    let out = service.run(GenerateRequest::new("gen", ROOT)).unwrap();

    assert!(out.results.is_empty());
    assert_eq!(out.halt, Some(ApplicationError::Cancelled));
    assert!(harness.fs.list_files().is_empty());
}

#[test]
fn cache_hits_skip_rendering() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let catalog = ResourceCatalog::builder()
        .helper("counted", move |s: &str| {
            counter.fetch_add(1, Ordering::SeqCst);
            s.to_string()
        })
        .generator(generator(vec![action(
            BuiltinAction::Add,
            "a.txt",
            "{{counted name}}",
        )]))
        .build()
        .unwrap();

    let mut harness = Harness::with_catalog(catalog);
    harness.config.behavior.dry = true;
    let cache = MemoryCache::new(CacheTtl::ONE_HOUR);
    let answers = Answers::new().with("name", "x");

    for _ in 0..2 {
        let out = harness
            .service()
            .with_cache(Box::new(cache.clone()))
            .run(GenerateRequest::new("gen", ROOT).with_answers(answers.clone()))
            .unwrap();
        assert_eq!(out.artifacts[0].final_content(), "x");
    }

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len(), 1);
}

#[test]
fn edited_partials_miss_the_cache() {
    let cache = MemoryCache::new(CacheTtl::ONE_HOUR);
    let rendered: Vec<String> = ["v1", "v2"]
        .into_iter()
        .map(|body| {
            let catalog = ResourceCatalog::builder()
                .partial("header", body)
                .generator(generator(vec![action(BuiltinAction::Add, "a.txt", "{{> header}}")]))
                .build()
                .unwrap();
            let mut harness = Harness::with_catalog(catalog);
            harness.config.behavior.dry = true;
            let out = harness
                .service()
                .with_cache(Box::new(cache.clone()))
                .run(GenerateRequest::new("gen", ROOT))
                .unwrap();
            out.artifacts[0].final_content().to_string()
        })
        .collect();

    assert_eq!(rendered, ["v1", "v2"]);
    assert_eq!(cache.len(), 2);
}
