use std::path::{Path, PathBuf};

use color_eyre::Result;
use git2::{ErrorCode, Repository, Status};

pub struct HookRepo {
    repo: Repository,
}

impl HookRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Repository::discover(path.as_ref())?;
        Ok(HookRepo { repo })
    }

    pub fn workdir(&self) -> Result<PathBuf> {
        Ok(self
            .repo
            .workdir()
            .ok_or_else(|| color_eyre::eyre::eyre!("Repository has no working directory"))?
            .to_path_buf())
    }

    /// Stashes local changes, reporting whether anything was stashed.
    pub fn stash_save(&mut self) -> Result<bool> {
        let signature = self.repo.signature()?;
        match self.repo.stash_save(&signature, "pre-push", None) {
            Ok(_) => Ok(true),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Re-applies the most recent stash entry, leaving it on the stack.
    pub fn stash_restore(&mut self) -> Result<()> {
        self.repo.stash_apply(0, None)?;
        Ok(())
    }

    /// Files that differ between the working tree (plus index) and the
    /// remote-tracking branch. When the branch has never been pushed, every
    /// tracked file counts as outgoing.
    pub fn outgoing_files(&self, remote: &str, branch: &str) -> Result<Vec<String>> {
        let reference = format!("refs/remotes/{}/{}", remote, branch);
        let tree = match self.repo.find_reference(&reference) {
            Ok(reference) => Some(reference.peel_to_tree()?),
            Err(err) if err.code() == ErrorCode::NotFound => None,
            Err(err) => return Err(err.into()),
        };

        let diff = self
            .repo
            .diff_tree_to_workdir_with_index(tree.as_ref(), None)?;

        let mut files = vec![];
        for delta in diff.deltas() {
            if let Some(path) = delta.new_file().path().or_else(|| delta.old_file().path()) {
                files.push(path.to_string_lossy().into_owned());
            }
        }
        Ok(files)
    }

    pub fn worktree_modified(&self) -> Result<Vec<String>> {
        let modified_flags = Status::WT_NEW
            | Status::WT_MODIFIED
            | Status::WT_DELETED
            | Status::WT_TYPECHANGE
            | Status::WT_RENAMED;
        Ok(self
            .repo
            .statuses(None)?
            .iter()
            .filter(|entry| entry.status().intersects(modified_flags))
            .map(|entry| String::from_utf8_lossy(entry.path_bytes()).into_owned())
            .collect())
    }

    /// Stages the given paths (removals included) and commits them on HEAD.
    pub fn commit_files<P: AsRef<Path>>(&self, paths: &[P], message: &str) -> Result<()> {
        let workdir = self.workdir()?;
        let mut index = self.repo.index()?;

        for path in paths {
            let path = path.as_ref();
            if workdir.join(path).exists() {
                index.add_path(path)?;
            } else {
                index.remove_path(path)?;
            }
        }
        index.write()?;

        let tree = self.repo.find_tree(index.write_tree()?)?;
        let signature = self.repo.signature()?;
        let parent = self.repo.head()?.peel_to_commit()?;
        self.repo
            .commit(Some("HEAD"), &signature, &signature, message, &tree, &[&parent])?;

        Ok(())
    }

    fn head_branch(&self) -> Result<String> {
        let branch = self
            .repo
            .branches(None)?
            .filter_map(|branch| {
                branch
                    .ok()
                    .and_then(|branch| branch.0.is_head().then(|| branch.0))
            })
            .next()
            .ok_or_else(|| color_eyre::eyre::eyre!("No HEAD branch found"))?;
        Ok(String::from_utf8_lossy(branch.name_bytes()?).into_owned())
    }

    fn head_ref(&self) -> Result<String> {
        let target = self
            .repo
            .find_reference("HEAD")?
            .symbolic_target_bytes()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .ok_or_else(|| color_eyre::eyre::eyre!("No HEAD branch found"))?;
        Ok(target.trim_start_matches("refs/heads/").to_string())
    }

    pub fn current_branch(&self) -> Result<String> {
        self.head_branch().or_else(|_| self.head_ref())
    }
}
