use std::path::PathBuf;

use revstamp::boundary::BoundaryWarning;
use revstamp::cli::orchestration::{
    run_stamp_workflow, Operation, StampTarget, StampWorkflowArgs, WorkflowResult,
};
use revstamp::config::Config;
use revstamp::encoding::TextEncoding;
use revstamp::gateway::MemoryGateway;
use revstamp::git::{MockRepository, Repository};
use revstamp::version_file::FileKind;
use revstamp::RevStampError;

const PACKAGE_JSON: &str = "/repo/web/package.json";
const APP_RC: &str = "/repo/native/app.rc";

fn package_json(version: &str) -> String {
    format!("{{\r\n\t\"name\": \"web\",\r\n\t\"version\": \"{}\"\r\n}}\r\n", version)
}

fn app_rc(tuple: &str, dotted: &str) -> String {
    format!(
        " FILEVERSION {tuple}\r\n PRODUCTVERSION {tuple}\r\n\t\t\tVALUE \"FileVersion\", \"{dotted}\"\r\n\t\t\tVALUE \"ProductVersion\", \"{dotted}\"\r\n"
    )
}

fn seeded_gateway() -> MemoryGateway {
    let gateway = MemoryGateway::new();
    gateway.insert_text(PACKAGE_JSON, &package_json("2.4.0"), TextEncoding::Utf8);
    gateway.insert_text(
        APP_RC,
        &format!("\u{feff}{}", app_rc("2,4,0,0", "2.4.0.0")),
        TextEncoding::Utf16Le,
    );
    gateway
}

fn args(operation: Operation, commit: bool, push: bool) -> StampWorkflowArgs {
    StampWorkflowArgs {
        targets: vec![
            StampTarget {
                kind: FileKind::ManifestJson,
                paths: vec![PathBuf::from(PACKAGE_JSON)],
            },
            StampTarget {
                kind: FileKind::NativeResource,
                paths: vec![PathBuf::from(APP_RC)],
            },
        ],
        operation,
        commit,
        push,
        dry_run: false,
    }
}

fn run(
    args: &StampWorkflowArgs,
    config: &Config,
    gateway: &MemoryGateway,
    repo: &MockRepository,
) -> anyhow::Result<WorkflowResult> {
    run_stamp_workflow(args, config, gateway, Some(repo as &dyn Repository))
}

#[test]
fn test_insert_commit_and_push() {
    let gateway = seeded_gateway();
    let repo = MockRepository::new("/repo");

    let result = run(&args(Operation::Insert(318), true, true), &Config::default(), &gateway, &repo).unwrap();

    assert!(result.succeeded);
    assert_eq!(result.version(), Some("2.4.318"));
    assert_eq!(result.files_written.len(), 2);
    assert!(result.pushed);

    assert_eq!(gateway.text(PACKAGE_JSON).unwrap(), package_json("2.4.318"));
    assert_eq!(
        gateway.text(APP_RC).unwrap(),
        format!("\u{feff}{}", app_rc("2,4,0,318", "2.4.0.318"))
    );

    let commits = repo.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].message, "Update version to 2.4.318 ***NO_CI***");
    let repo_paths: Vec<&str> = commits[0].changes.iter().map(|c| c.repo_path.as_str()).collect();
    assert_eq!(repo_paths, vec!["web/package.json", "native/app.rc"]);
    assert_eq!(commits[0].changes[1].code_page, 1200);
    assert_eq!(result.commit_id, Some(commits[0].id.to_string()));
    assert_eq!(repo.pushes(), vec![("origin".to_string(), "main".to_string())]);
}

#[test]
fn test_increment_without_commit() {
    let gateway = seeded_gateway();
    let repo = MockRepository::new("/repo");

    let result = run(&args(Operation::Increment, false, false), &Config::default(), &gateway, &repo).unwrap();

    assert!(result.succeeded);
    assert_eq!(result.targets[0].version.as_deref(), Some("2.4.1"));
    assert_eq!(result.targets[1].version.as_deref(), Some("2.4.0.1"));
    assert_eq!(result.commit_id, None);
    assert!(repo.commits().is_empty());
}

#[test]
fn test_show_reads_without_writing() {
    let gateway = seeded_gateway();
    let before = gateway.contents(APP_RC).unwrap();
    let repo = MockRepository::new("/repo");

    let result = run(&args(Operation::Show, true, false), &Config::default(), &gateway, &repo).unwrap();

    assert!(result.succeeded);
    assert!(result.targets.iter().all(|t| t.report.is_none()));
    assert_eq!(result.targets[1].version.as_deref(), Some("2.4.0.0"));
    assert_eq!(gateway.contents(APP_RC).unwrap(), before);
    assert!(repo.commits().is_empty());
}

#[test]
fn test_show_without_version_is_an_error() {
    let gateway = MemoryGateway::new();
    gateway.insert_text(PACKAGE_JSON, "{}\r\n", TextEncoding::Utf8);
    let mut workflow = args(Operation::Show, false, false);
    workflow.targets.truncate(1);

    let err = run(&workflow, &Config::default(), &gateway, &MockRepository::new("/repo")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RevStampError>(),
        Some(RevStampError::NoVersionFound { .. })
    ));
}

#[test]
fn test_dry_run_changes_nothing() {
    let gateway = seeded_gateway();
    let before = gateway.contents(PACKAGE_JSON).unwrap();
    let repo = MockRepository::new("/repo");
    let mut workflow = args(Operation::Insert(5), true, true);
    workflow.dry_run = true;

    let result = run(&workflow, &Config::default(), &gateway, &repo).unwrap();

    assert!(result.succeeded);
    assert_eq!(gateway.contents(PACKAGE_JSON).unwrap(), before);
    assert!(result.targets.iter().all(|t| t.version.is_none()));
    assert!(result.targets.iter().all(|t| t.report.is_some()));
    assert!(repo.commits().is_empty());
    assert!(repo.pushes().is_empty());
    assert!(!result.pushed);
}

#[test]
fn test_partial_failure_skips_commit_by_default() {
    let gateway = seeded_gateway();
    gateway.insert_text(APP_RC, " FILEVERSION 1,0,0,0\r\n", TextEncoding::Utf8);
    let repo = MockRepository::new("/repo");

    let result = run(&args(Operation::Insert(9), true, false), &Config::default(), &gateway, &repo).unwrap();

    assert!(!result.succeeded);
    assert_eq!(result.files_written, vec![PathBuf::from(PACKAGE_JSON)]);
    assert!(result
        .warnings
        .iter()
        .any(|w| matches!(w, BoundaryWarning::PatternNotFound { .. })));
    assert!(repo.commits().is_empty());
}

#[test]
fn test_partial_failure_commits_when_allowed() {
    let gateway = seeded_gateway();
    gateway.insert_text(APP_RC, " FILEVERSION 1,0,0,0\r\n", TextEncoding::Utf8);
    let repo = MockRepository::new("/repo");
    let mut config = Config::default();
    config.behavior.commit_on_partial_failure = true;

    let result = run(&args(Operation::Insert(9), true, false), &config, &gateway, &repo).unwrap();

    assert!(!result.succeeded);
    let commits = repo.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].changes.len(), 1);
    assert_eq!(commits[0].changes[0].repo_path, "web/package.json");
}

#[test]
fn test_nothing_to_commit_warns() {
    let gateway = seeded_gateway();
    let repo = MockRepository::new("/repo");
    let mut workflow = args(Operation::Increment, true, false);
    for target in &mut workflow.targets {
        target.paths.clear();
    }

    let result = run(&workflow, &Config::default(), &gateway, &repo).unwrap();

    assert!(result.succeeded);
    assert_eq!(result.warnings, vec![BoundaryWarning::NothingToCommit]);
    assert!(repo.commits().is_empty());
}

#[test]
fn test_invalid_revision_stops_before_writing() {
    let gateway = seeded_gateway();
    let repo = MockRepository::new("/repo");

    let err = run(&args(Operation::Insert(70000), true, false), &Config::default(), &gateway, &repo).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<RevStampError>(),
        Some(RevStampError::InvalidRevision(_))
    ));
    assert_eq!(gateway.text(PACKAGE_JSON).unwrap(), package_json("2.4.0"));
    assert!(repo.commits().is_empty());
}

#[test]
fn test_commit_without_repository_is_an_error() {
    let gateway = seeded_gateway();
    let result = run_stamp_workflow(
        &args(Operation::Insert(1), true, false),
        &Config::default(),
        &gateway,
        None,
    );
    assert!(result.is_err());
}

#[test]
fn test_rejected_push_is_an_error_after_commit() {
    let gateway = seeded_gateway();
    let repo = MockRepository::new("/repo").rejecting_pushes();

    let result = run(&args(Operation::Insert(2), true, true), &Config::default(), &gateway, &repo);

    assert!(result.is_err());
    assert_eq!(repo.commits().len(), 1);
}
