use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use owo_colors::OwoColorize;

use crate::git::HookRepo;

/// Runs the pre-push checks for the repository at `path`.
///
/// Uncommitted changes are stashed up front and restored before returning,
/// whether or not the checks pass.
pub fn run(path: &Path) -> Result<()> {
    let mut repo = HookRepo::open(path)?;
    let stashed = repo.stash_save()?;

    let outcome = check_outgoing(&repo);

    if stashed {
        repo.stash_restore()?;
    }
    outcome
}

fn check_outgoing(repo: &HookRepo) -> Result<()> {
    let root = repo.workdir()?;
    let branch = repo.current_branch()?;
    let outgoing = repo.outgoing_files("origin", &branch)?;

    let mut makefiles = BTreeSet::new();
    for file in &outgoing {
        let mut dir = root.join(file);
        dir.pop();
        if let Some(makefile) = nearest_makefile(&dir, &root) {
            makefiles.insert(makefile);
        }
    }

    for makefile in &makefiles {
        let dir = makefile
            .parent()
            .ok_or_else(|| eyre!("Makefile has no parent directory"))?;

        if run_target(makefile, dir, "format")?.is_some() {
            let modified = repo.worktree_modified()?;
            if !modified.is_empty() {
                repo.commit_files(&modified, "formatting")?;
                println!("{} formatting changes", "committed".green());
            }
        }

        if let Some(status) = run_target(makefile, dir, "test")? {
            if !status.success() {
                return Err(eyre!(
                    "Tests failed running `make test` in `{}`",
                    dir.display()
                ));
            }
        }
    }

    Ok(())
}

/// Walks up from `dir` to the repository root looking for a Makefile.
fn nearest_makefile(dir: &Path, root: &Path) -> Option<PathBuf> {
    let mut dir = dir.to_path_buf();
    loop {
        let candidate = dir.join("Makefile");
        if candidate.is_file() {
            return Some(candidate);
        }
        if dir == root || !dir.pop() {
            return None;
        }
    }
}

// A target counts as declared when some line begins with `<target>:`.
fn has_target(makefile: &Path, target: &str) -> Result<bool> {
    let file = fs::File::open(makefile)?;
    let prefix = format!("{}:", target);
    for line in BufReader::new(file).lines() {
        if line?.starts_with(&prefix) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Runs `make <target>` in `dir`, or returns None when the Makefile does not
/// declare the target.
fn run_target(makefile: &Path, dir: &Path, target: &str) -> Result<Option<ExitStatus>> {
    if !has_target(makefile, target)? {
        return Ok(None);
    }

    println!(
        "{} `make {}` in `{}`",
        "running".cyan(),
        target,
        dir.display()
    );
    let status = Command::new("make").arg(target).current_dir(dir).status()?;
    Ok(Some(status))
}
