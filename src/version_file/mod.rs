//! Revision stamping for version files
//!
//! A [VersionFile] binds a [FileKind] to a list of paths and a
//! [FileDataGateway]. The kind selects a [KindDescriptor] (its patterns and
//! rewrite mode); one shared algorithm does the rest:
//!
//! 1. detect the encoding from the file's BOM
//! 2. read the file as text, without its leading BOM
//! 3. find every version token and put the new revision into its fourth
//!    segment, or its patch segment when there is no fourth
//! 4. write the text back in the original encoding, with a single leading
//!    BOM if the file had one
//!
//! Files are processed one after another. A file whose patterns match
//! nothing, or that cannot be read, is reported as failed and left alone;
//! the rest of the batch carries on. Only an invalid revision stops a batch.

pub mod kind;
pub mod pattern;

pub use kind::{FileKind, KindDescriptor, RewriteMode};
pub use pattern::{VersionPattern, VersionToken};

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::boundary::BoundaryWarning;
use crate::encoding::{detect_encoding, EncodingValues, BOM_CHAR};
use crate::error::{RevStampError, Result};
use crate::gateway::FileDataGateway;
use crate::revision::{check_revision, next_revision, MAX_REVISION};
use crate::ui;

static SIMPLE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]+[.,][0-9]+[.,][0-9]+[0-9A-Za-z_-]*[.,]?[0-9]*[0-9A-Za-z_-]*")
        .expect("hardcoded regex must compile")
});

static UNWANTED_DELIMITERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",+").expect("hardcoded regex must compile"));

/// One rewritten line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenChange {
    pub old: String,
    pub new: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    Written,
    Failed(String),
}

/// What happened to a single file of a batch
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    /// `None` when the file could not be opened
    pub encoding: Option<EncodingValues>,
    pub status: FileStatus,
    pub changes: Vec<TokenChange>,
}

impl FileOutcome {
    fn failed(path: &Path, encoding: Option<EncodingValues>, reason: impl Into<String>) -> Self {
        FileOutcome {
            path: path.to_path_buf(),
            encoding,
            status: FileStatus::Failed(reason.into()),
            changes: Vec::new(),
        }
    }

    pub fn is_written(&self) -> bool {
        self.status == FileStatus::Written
    }
}

/// Result of an insert or increment over all files of a [VersionFile]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    pub files: Vec<FileOutcome>,
    pub warnings: Vec<BoundaryWarning>,
}

impl BatchReport {
    /// True when every file of the batch was written.
    pub fn succeeded(&self) -> bool {
        self.files.iter().all(FileOutcome::is_written)
    }

    pub fn written(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|outcome| outcome.is_written())
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.files.iter().filter(|outcome| !outcome.is_written())
    }
}

#[derive(Debug, Clone, Copy)]
enum RevisionSource {
    /// Caller supplied, already validated
    Fixed(i64),
    /// Last segment of each token plus one
    Increment,
}

struct BatchState {
    source: RevisionSource,
    checked: bool,
    report: BatchReport,
}

impl BatchState {
    fn new(source: RevisionSource) -> Self {
        BatchState {
            source,
            checked: matches!(source, RevisionSource::Fixed(_)),
            report: BatchReport::default(),
        }
    }

    fn warn(&mut self, warning: BoundaryWarning) {
        ui::display_boundary_warning(&warning);
        self.report.warnings.push(warning);
    }

    fn revision_for(&mut self, token: &VersionToken<'_>) -> Result<i64> {
        match self.source {
            RevisionSource::Fixed(revision) => Ok(revision),
            RevisionSource::Increment => {
                let digits = token.revision_digits();
                if !self.checked {
                    self.checked = true;
                    let revision = next_revision(digits)?;
                    if let Some(warning) = check_revision(revision)? {
                        self.warn(warning);
                    }
                    return Ok(revision);
                }

                // only the first value may stop the batch; later ones fail their file
                match next_revision(digits) {
                    Ok(revision) if (0..=MAX_REVISION).contains(&revision) => Ok(revision),
                    _ => Err(RevStampError::RevisionOutOfRange {
                        digits: digits.to_string(),
                    }),
                }
            }
        }
    }
}

/// A set of version files of one kind, and the gateway used to reach them.
pub struct VersionFile<G> {
    kind: FileKind,
    paths: Vec<PathBuf>,
    gateway: G,
}

impl<G: FileDataGateway> VersionFile<G> {
    pub fn new<I, P>(kind: FileKind, paths: I, gateway: G) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        VersionFile {
            kind,
            paths: paths.into_iter().map(Into::into).collect(),
            gateway,
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Writes `revision` into every version token of every file.
    ///
    /// # Returns
    /// * `Ok(BatchReport)` - Per-file outcomes; check [BatchReport::succeeded]
    /// * `Err` - If `revision` is outside `0..=65535`; no file is touched
    pub fn insert_revision(&self, revision: i64) -> Result<BatchReport> {
        let warning = check_revision(revision)?;
        let mut state = BatchState::new(RevisionSource::Fixed(revision));
        if let Some(warning) = warning {
            state.warn(warning);
        }
        self.run_batch(state)
    }

    /// Adds one to the last numeric segment of every version token.
    ///
    /// The first new revision of the batch is validated (and may warn).
    /// A later value outside `0..=65535` fails only the file it belongs to.
    ///
    /// # Returns
    /// * `Ok(BatchReport)` - Per-file outcomes; check [BatchReport::succeeded]
    /// * `Err` - If the first new revision is outside `0..=65535`; no file is touched
    pub fn increment_revision(&self) -> Result<BatchReport> {
        self.run_batch(BatchState::new(RevisionSource::Increment))
    }

    /// Reads the version of the first token of the first pattern in the
    /// first file, with `,` delimiters turned into `.`.
    pub fn get_full_version(&self) -> Result<String> {
        let path = self
            .paths
            .first()
            .ok_or_else(|| RevStampError::NoVersionFound {
                path: PathBuf::new(),
            })?;
        let not_found = || RevStampError::NoVersionFound { path: path.clone() };

        let values = detect_encoding(self.gateway.open_for_read(path)?)?;
        let (_, text) = strip_bom(&self.gateway.read_text(path, values.encoding)?);
        let primary = self.kind.descriptor().patterns[0];
        let token = primary.find(&text).ok_or_else(not_found)?;

        let version = SIMPLE_VERSION
            .find(&text[token.version_start..token.span.end])
            .ok_or_else(not_found)?;
        Ok(UNWANTED_DELIMITERS
            .replace_all(version.as_str(), ".")
            .into_owned())
    }

    fn run_batch(&self, mut state: BatchState) -> Result<BatchReport> {
        for path in &self.paths {
            match self.stamp_file(path, &mut state) {
                Ok(outcome) => state.report.files.push(outcome),
                Err(err) if err.is_fatal_to_batch() => return Err(err),
                Err(err) => {
                    ui::display_error(&format!(
                        "Error stamping file \"{}\": {}",
                        path.display(),
                        err
                    ));
                    state
                        .report
                        .files
                        .push(FileOutcome::failed(path, None, err.to_string()));
                }
            }
        }
        Ok(state.report)
    }

    fn stamp_file(&self, path: &Path, state: &mut BatchState) -> Result<FileOutcome> {
        ui::display_status(&format!("Reading file: {}", path.display()));
        let values = detect_encoding(self.gateway.open_for_read(path)?)?;
        let (had_bom, mut text) = strip_bom(&self.gateway.read_text(path, values.encoding)?);

        let descriptor = self.kind.descriptor();
        let mut changes = Vec::new();
        let mut missing = Vec::new();

        match descriptor.mode {
            RewriteMode::Independent => {
                for pattern in &descriptor.patterns {
                    match rewrite_tokens(&text, pattern, |token| state.revision_for(token))? {
                        Some((rewritten, mut pattern_changes)) => {
                            text = rewritten;
                            changes.append(&mut pattern_changes);
                        }
                        None => missing.push(pattern.name()),
                    }
                }
            }
            RewriteMode::LockStep => {
                let primary = descriptor.patterns[0];
                match primary.find(&text) {
                    None => missing.push(primary.name()),
                    Some(token) => {
                        let revision = state.revision_for(&token)?;
                        let new = token.with_revision(revision);
                        let rewritten = [
                            &text[..token.span.start],
                            new.as_str(),
                            &text[token.span.end..],
                        ]
                        .concat();
                        changes.push(TokenChange {
                            old: token.original(),
                            new,
                        });
                        text = rewritten;

                        // Followers are optional, so no match is not a failure.
                        for follower in &descriptor.patterns[1..] {
                            if let Some((rewritten, mut follower_changes)) =
                                rewrite_tokens(&text, follower, |_| Ok(revision))?
                            {
                                text = rewritten;
                                changes.append(&mut follower_changes);
                            }
                        }
                    }
                }
            }
        }

        if !missing.is_empty() {
            for pattern in &missing {
                state.warn(BoundaryWarning::PatternNotFound {
                    path: path.to_path_buf(),
                    pattern: (*pattern).to_string(),
                });
            }
            let reason = RevStampError::PatternNotFound {
                path: path.to_path_buf(),
                pattern: missing.join(", "),
            };
            return Ok(FileOutcome::failed(path, Some(values), reason.to_string()));
        }

        for change in &changes {
            ui::display_rewrite(change.old.trim(), change.new.trim());
        }

        if had_bom {
            text.insert(0, BOM_CHAR);
        }
        self.gateway.write_text(path, &text, values.encoding)?;

        Ok(FileOutcome {
            path: path.to_path_buf(),
            encoding: Some(values),
            status: FileStatus::Written,
            changes,
        })
    }
}

/// Rewrites every token of `pattern` in `text`.
///
/// Returns `None` when the pattern matches nothing.
fn rewrite_tokens<F>(
    text: &str,
    pattern: &VersionPattern,
    mut revision_for: F,
) -> Result<Option<(String, Vec<TokenChange>)>>
where
    F: FnMut(&VersionToken<'_>) -> Result<i64>,
{
    let tokens = pattern.find_all(text);
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut rewritten = String::with_capacity(text.len());
    let mut changes = Vec::with_capacity(tokens.len());
    let mut copied_to = 0;

    for token in &tokens {
        let new = token.with_revision(revision_for(token)?);
        rewritten.push_str(&text[copied_to..token.span.start]);
        rewritten.push_str(&new);
        copied_to = token.span.end;
        changes.push(TokenChange {
            old: token.original(),
            new,
        });
    }
    rewritten.push_str(&text[copied_to..]);

    Ok(Some((rewritten, changes)))
}

/// Drops the run of BOM characters at the start of the text so that
/// patterns anchored at line starts also match the first line.
///
/// Returns whether the text started with a BOM.
fn strip_bom(text: &str) -> (bool, String) {
    let body = text.trim_start_matches(BOM_CHAR);
    (body.len() != text.len(), body.to_string())
}
