use crate::error::{RevStampError, Result};
use crate::git::FileChange;
use git2::{
    Commit, Cred, CredentialType, ErrorCode, Oid, PushOptions, RemoteCallbacks,
    Repository as Git2Repo, Signature,
};
use std::path::{Path, PathBuf};

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
    author_name: String,
    author_email: String,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo,
            author_name: "revstamp".to_string(),
            author_email: "revstamp@localhost".to_string(),
        }
    }

    /// Author used when the repository has no signature configured
    pub fn with_fallback_author(
        mut self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        self.author_name = name.into();
        self.author_email = email.into();
        self
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature.to_owned()),
            Err(_) => Ok(Signature::now(&self.author_name, &self.author_email)?),
        }
    }

    fn head_commit(&self) -> Result<Option<Commit<'_>>> {
        match self.repo.head() {
            Ok(head) => Ok(Some(head.peel_to_commit()?)),
            Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl super::Repository for Git2Repository {
    fn workdir(&self) -> Option<PathBuf> {
        self.repo.workdir().map(Path::to_path_buf)
    }

    fn current_branch(&self) -> Result<String> {
        let head = self.repo.find_reference("HEAD")?;
        let target = head.symbolic_target().ok_or_else(|| {
            RevStampError::Git(git2::Error::from_str("HEAD is detached, no branch to commit on"))
        })?;

        Ok(target.trim_start_matches("refs/heads/").to_string())
    }

    fn commit_changes(&self, changes: &[FileChange], message: &str) -> Result<Oid> {
        let mut index = self.repo.index()?;

        for change in changes {
            index.add_path(Path::new(&change.repo_path))?;
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.signature()?;
        let parent = self.head_commit()?;
        let parents: Vec<&Commit<'_>> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        Ok(oid)
    }

    fn push_branch(&self, remote: &str, branch: &str) -> Result<()> {
        let mut remote = self
            .repo
            .find_remote(remote)
            .map_err(|e| RevStampError::remote(format!("Cannot find remote: {}", e)))?;

        let mut callbacks = RemoteCallbacks::new();
        callbacks.credentials(|_url, username, allowed| {
            if allowed.contains(CredentialType::SSH_KEY) {
                if let Some(username) = username {
                    return Cred::ssh_key_from_agent(username);
                }
            }
            Cred::default()
        });
        callbacks.push_update_reference(|refname, status| match status {
            Some(reason) => Err(git2::Error::from_str(&format!(
                "{} was rejected: {}",
                refname, reason
            ))),
            None => Ok(()),
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{0}:refs/heads/{0}", branch);
        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .map_err(|e| RevStampError::remote(format!("Push failed: {}", e)))?;

        Ok(())
    }
}
