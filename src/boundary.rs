use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while stamping a batch of version files.
/// These are reported to the user but never abort the batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// The revision equals the largest value a version segment can hold
    RevisionAtLimit { revision: i64 },
    /// A version pattern found nothing in a file, so the file was left alone
    PatternNotFound { path: PathBuf, pattern: String },
    /// A path input expanded to no files
    NoFilesMatched { input: String },
    /// A commit was requested but no file was written
    NothingToCommit,
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::RevisionAtLimit { revision } => write!(
                f,
                "Revision value {} is at the maximum allowable limit. Please address or the next build will fail.",
                revision
            ),
            BoundaryWarning::PatternNotFound { path, pattern } => write!(
                f,
                "No {} version found in '{}', file left unchanged",
                pattern,
                path.display()
            ),
            BoundaryWarning::NoFilesMatched { input } => {
                write!(f, "No file paths were found with the given search string: \"{}\"", input)
            }
            BoundaryWarning::NothingToCommit => {
                write!(f, "No version files were written, nothing to commit")
            }
        }
    }
}
