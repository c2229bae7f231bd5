//! Main workflow orchestration logic
//!
//! Keeps the stamping workflow apart from argument parsing so it can be
//! driven programmatically, and tested with in-memory files and a mock
//! repository.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::gateway::{DryRunGateway, FileDataGateway};
use crate::git::{FileChange, Repository};
use crate::ui;
use crate::version_file::{BatchReport, FileKind, VersionFile};

/// Code page assumed for files whose encoding was never detected
const DEFAULT_CODE_PAGE: u32 = 65001;

/// What to do with the version files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Write this revision into every version token
    Insert(i64),
    /// Add one to the revision of every version token
    Increment,
    /// Only read the version
    Show,
}

/// Files of one kind to run the operation over
#[derive(Debug, Clone, PartialEq)]
pub struct StampTarget {
    pub kind: FileKind,
    pub paths: Vec<PathBuf>,
}

/// Arguments for the stamp workflow
///
/// Mirrors the CLI Args after config and path lists have been resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct StampWorkflowArgs {
    pub targets: Vec<StampTarget>,

    pub operation: Operation,

    /// Commit written files afterwards
    pub commit: bool,

    /// Push the commit to the configured remote
    pub push: bool,

    /// Preview mode - read files but write nothing and never commit
    pub dry_run: bool,
}

/// Outcome for one target
#[derive(Debug, Clone, PartialEq)]
pub struct TargetResult {
    pub kind: FileKind,
    /// Version of the first file after the operation, if it could be read.
    /// Always `None` for a dry run.
    pub version: Option<String>,
    /// `None` for [Operation::Show]
    pub report: Option<BatchReport>,
}

/// Result of the stamp workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowResult {
    pub targets: Vec<TargetResult>,

    /// True when every file of every target was written
    pub succeeded: bool,

    pub files_written: Vec<PathBuf>,

    pub commit_id: Option<String>,

    pub pushed: bool,

    pub warnings: Vec<BoundaryWarning>,
}

impl WorkflowResult {
    /// The first version any target reported
    pub fn version(&self) -> Option<&str> {
        self.targets.iter().find_map(|t| t.version.as_deref())
    }
}

/// Main stamp workflow
///
/// 1. Run the operation over every target
/// 2. Report versions and per-file outcomes
/// 3. Commit the written files if asked, and allowed after failures
/// 4. Push the commit if asked
///
/// # Arguments
///
/// * `args` - Targets, operation and commit options
/// * `config` - revstamp configuration
/// * `gateway` - Where version files are read from and written to
/// * `repo` - Repository to commit to; only needed when committing
///
/// # Returns
///
/// The per-target outcomes, or the first fatal error
pub fn run_stamp_workflow<G: FileDataGateway>(
    args: &StampWorkflowArgs,
    config: &Config,
    gateway: G,
    repo: Option<&dyn Repository>,
) -> Result<WorkflowResult> {
    let targets = if args.dry_run {
        ui::display_status("Dry run: no file will be changed");
        stamp_targets(args, DryRunGateway::new(&gateway))?
    } else {
        stamp_targets(args, &gateway)?
    };

    let mut result = WorkflowResult {
        succeeded: targets
            .iter()
            .filter_map(|t| t.report.as_ref())
            .all(BatchReport::succeeded),
        files_written: targets
            .iter()
            .filter_map(|t| t.report.as_ref())
            .flat_map(|report| report.written().map(|outcome| outcome.path.clone()))
            .collect(),
        warnings: targets
            .iter()
            .filter_map(|t| t.report.as_ref())
            .flat_map(|report| report.warnings.iter().cloned())
            .collect(),
        targets,
        ..WorkflowResult::default()
    };

    if args.commit && !args.dry_run && args.operation != Operation::Show {
        commit_written_files(args, config, repo, &mut result)?;
    }

    Ok(result)
}

fn stamp_targets<G: FileDataGateway>(
    args: &StampWorkflowArgs,
    gateway: G,
) -> Result<Vec<TargetResult>> {
    let mut results = Vec::with_capacity(args.targets.len());

    for target in args.targets.iter().filter(|t| !t.paths.is_empty()) {
        let file = VersionFile::new(target.kind, target.paths.iter().cloned(), &gateway);

        let report = match args.operation {
            Operation::Show => None,
            Operation::Insert(revision) => Some(
                file.insert_revision(revision)
                    .with_context(|| format!("Cannot stamp {} files", target.kind))?,
            ),
            Operation::Increment => Some(
                file.increment_revision()
                    .with_context(|| format!("Cannot stamp {} files", target.kind))?,
            ),
        };

        let version = match &report {
            None => Some(
                file.get_full_version()
                    .with_context(|| format!("Cannot read the {} version", target.kind))?,
            ),
            // a dry run leaves the files as they were
            Some(_) if args.dry_run => None,
            Some(_) => file.get_full_version().ok(),
        };

        if let Some(report) = &report {
            ui::display_batch_summary(target.kind, report);
        }
        if let Some(version) = &version {
            ui::display_version(target.kind, version);
        }

        results.push(TargetResult {
            kind: target.kind,
            version,
            report,
        });
    }

    Ok(results)
}

fn commit_written_files(
    args: &StampWorkflowArgs,
    config: &Config,
    repo: Option<&dyn Repository>,
    result: &mut WorkflowResult,
) -> Result<()> {
    if !result.succeeded && !config.behavior.commit_on_partial_failure {
        ui::display_status("Not committing: some version files could not be stamped");
        return Ok(());
    }

    if result.files_written.is_empty() {
        let warning = BoundaryWarning::NothingToCommit;
        ui::display_boundary_warning(&warning);
        result.warnings.push(warning);
        return Ok(());
    }

    let repo = repo.ok_or_else(|| anyhow!("No repository to commit to"))?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| anyhow!("Cannot commit to a bare repository"))?;

    let changes = result
        .targets
        .iter()
        .filter_map(|t| t.report.as_ref())
        .flat_map(|report| report.written())
        .map(|outcome| {
            let code_page = outcome
                .encoding
                .map_or(DEFAULT_CODE_PAGE, |values| values.code_page);
            FileChange::edit(&outcome.path, &workdir, code_page)
        })
        .collect::<crate::Result<Vec<_>>>()?;

    let message = config
        .commit
        .render_message(result.version().unwrap_or("unknown"));
    let id = repo
        .commit_changes(&changes, &message)
        .context("Failed to commit version files")?;
    ui::display_commit(&id.to_string(), &message);
    result.commit_id = Some(id.to_string());

    if args.push {
        let branch = repo.current_branch()?;
        ui::display_status(&format!(
            "Pushing {} to {}",
            branch, config.commit.remote
        ));
        repo.push_branch(&config.commit.remote, &branch)
            .with_context(|| format!("Failed to push {} to {}", branch, config.commit.remote))?;
        ui::display_success(&format!("Pushed {} to {}", branch, config.commit.remote));
        result.pushed = true;
    }

    Ok(())
}
