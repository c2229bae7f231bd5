//! Git operations abstraction layer
//!
//! After a batch has been stamped, the written files can be committed back
//! to the repository they live in and pushed.
//!
//! # Overview
//!
//! The primary abstraction is the [Repository] trait. The concrete
//! implementations include:
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use revstamp::git::{FileChange, Repository};
//! # fn example<R: Repository>(repo: &R, changes: &[FileChange]) -> revstamp::Result<()> {
//! let branch = repo.current_branch()?;
//! repo.commit_changes(changes, "Update version to 1.2.3")?;
//! repo.push_branch("origin", &branch)?;
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use std::env;
use std::path::{Path, PathBuf};

use git2::Oid;

use crate::error::{RevStampError, Result};

/// A file to include in a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub full_path: PathBuf,
    /// Path relative to the working directory, `/` separated
    pub repo_path: String,
    /// Code page the file was written with
    pub code_page: u32,
}

impl FileChange {
    /// Describes an edited file inside `workdir`.
    pub fn edit(full_path: &Path, workdir: &Path, code_page: u32) -> Result<Self> {
        Ok(FileChange {
            full_path: full_path.to_path_buf(),
            repo_path: to_repo_path(full_path, workdir)?,
            code_page,
        })
    }
}

/// Converts a filesystem path to a `/` separated path relative to `workdir`.
///
/// Relative paths are taken from the current directory.
///
/// # Returns
/// * `Ok(String)` - The repository path, e.g. `src/App/App.csproj`
/// * `Err` - If the path is outside the working directory
pub fn to_repo_path(full_path: &Path, workdir: &Path) -> Result<String> {
    let absolute = if full_path.is_absolute() {
        full_path.to_path_buf()
    } else {
        env::current_dir()?.join(full_path)
    };

    let relative = match absolute.strip_prefix(workdir) {
        Ok(relative) => relative.to_path_buf(),
        // tempdirs and checkouts may sit behind symlinks
        Err(_) => absolute
            .canonicalize()?
            .strip_prefix(workdir.canonicalize()?)
            .map(Path::to_path_buf)
            .map_err(|_| {
                RevStampError::path(format!(
                    "\"{}\" is outside the working directory \"{}\"",
                    full_path.display(),
                    workdir.display()
                ))
            })?,
    };

    Ok(relative.to_string_lossy().replace('\\', "/"))
}

/// Common git operation trait for abstraction
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// `git2::Error` into [crate::error::RevStampError::Git] and remote failures
/// into [crate::error::RevStampError::Remote].
pub trait Repository {
    /// The working directory, `None` for bare repositories
    fn workdir(&self) -> Option<PathBuf>;

    /// Name of the branch `HEAD` points at
    ///
    /// # Returns
    /// * `Ok(String)` - The short branch name, e.g. "main"
    /// * `Err` - If `HEAD` is detached
    fn current_branch(&self) -> Result<String>;

    /// Stage the given files and commit them on `HEAD`
    ///
    /// # Arguments
    /// * `changes` - Files to stage; deleted files are removed from the index
    /// * `message` - The commit message
    ///
    /// # Returns
    /// * `Ok(Oid)` - The id of the new commit
    /// * `Err` - If staging or committing fails
    fn commit_changes(&self, changes: &[FileChange], message: &str) -> Result<Oid>;

    /// Push a local branch to the branch of the same name on `remote`
    fn push_branch(&self, remote: &str, branch: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_to_repo_path_uses_forward_slashes() {
        let dir = TempDir::new().unwrap();
        let full = dir.path().join("src").join("App").join("App.csproj");
        assert_eq!(
            to_repo_path(&full, dir.path()).unwrap(),
            "src/App/App.csproj"
        );
    }

    #[test]
    fn test_to_repo_path_outside_workdir() {
        let workdir = TempDir::new().unwrap();
        let other = TempDir::new().unwrap();
        let file = other.path().join("package.json");
        std::fs::write(&file, "{}").unwrap();

        assert!(to_repo_path(&file, workdir.path()).is_err());
    }

    #[test]
    fn test_file_change_edit() {
        let dir = TempDir::new().unwrap();
        let change = FileChange::edit(&dir.path().join("app.rc"), dir.path(), 1200).unwrap();
        assert_eq!(change.repo_path, "app.rc");
        assert_eq!(change.full_path, dir.path().join("app.rc"));
        assert_eq!(change.code_page, 1200);
    }
}
