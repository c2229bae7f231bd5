use crate::error::{RevStampError, Result};
use crate::git::{FileChange, Repository};
use git2::{ObjectType, Oid};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub id: Oid,
    pub message: String,
    pub changes: Vec<FileChange>,
}

/// Mock repository for testing without actual git operations
pub struct MockRepository {
    workdir: PathBuf,
    branch: String,
    reject_push: bool,
    commits: Mutex<Vec<RecordedCommit>>,
    pushes: Mutex<Vec<(String, String)>>,
}

impl MockRepository {
    /// Create a mock repository rooted at `workdir` on branch "main"
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        MockRepository {
            workdir: workdir.into(),
            branch: "main".to_string(),
            reject_push: false,
            commits: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    /// Set the current branch
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Make every push fail
    pub fn rejecting_pushes(mut self) -> Self {
        self.reject_push = true;
        self
    }

    /// Commits made so far, oldest first
    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// `(remote, branch)` pairs pushed so far
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Repository for MockRepository {
    fn workdir(&self) -> Option<PathBuf> {
        Some(self.workdir.clone())
    }

    fn current_branch(&self) -> Result<String> {
        Ok(self.branch.clone())
    }

    fn commit_changes(&self, changes: &[FileChange], message: &str) -> Result<Oid> {
        let mut commits = self.commits.lock().unwrap_or_else(PoisonError::into_inner);
        let seed = format!("{}:{}", commits.len(), message);
        let id = Oid::hash_object(ObjectType::Commit, seed.as_bytes())?;

        commits.push(RecordedCommit {
            id,
            message: message.to_string(),
            changes: changes.to_vec(),
        });
        Ok(id)
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        if self.reject_push {
            return Err(RevStampError::remote(format!(
                "Push of {} to {} rejected",
                branch, remote
            )));
        }
        self.pushes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(path: &str) -> FileChange {
        FileChange {
            full_path: PathBuf::from("/repo").join(path),
            repo_path: path.to_string(),
            code_page: 65001,
        }
    }

    #[test]
    fn test_mock_repository_records_commits() {
        let repo = MockRepository::new("/repo");

        let first = repo.commit_changes(&[change("a.json")], "one").unwrap();
        let second = repo.commit_changes(&[change("b.json")], "two").unwrap();

        let commits = repo.commits();
        assert_eq!(commits.len(), 2);
        assert_ne!(first, second);
        assert_eq!(commits[1].id, second);
        assert_eq!(commits[1].changes[0].repo_path, "b.json");
    }

    #[test]
    fn test_mock_repository_pushes() {
        let repo = MockRepository::new("/repo").with_branch("develop");
        let branch = repo.current_branch().unwrap();
        repo.push_branch("origin", &branch).unwrap();
        assert_eq!(
            repo.pushes(),
            vec![("origin".to_string(), "develop".to_string())]
        );
    }

    #[test]
    fn test_mock_repository_rejecting_pushes() {
        let repo = MockRepository::default().rejecting_pushes();
        assert!(repo.push_branch("origin", "main").is_err());
        assert!(repo.pushes().is_empty());
    }
}
