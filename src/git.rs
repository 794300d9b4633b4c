//! Git repository detection via the `git` command line.
//!
//! These detectors feed config resolution: commit hash, active branch and the
//! single configured remote. Each is independent so an override for one field
//! never changes what another detector reports.

use std::process::Command;

use crate::error::{Error, Result};

fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git").args(args).output().map_err(|e| Error::Git {
        command: args.join(" "),
        detail: e.to_string(),
    })?;
    if !output.status.success() {
        return Err(Error::Git {
            command: args.join(" "),
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// HEAD commit hash of the working directory's repository.
pub fn revision_hash() -> Result<String> {
    run_git(&["rev-parse", "HEAD"])
}

/// Name of the currently checked-out branch.
pub fn current_branch() -> Result<String> {
    run_git(&["branch", "--show-current"])
}

/// Detects the active branch and refuses to proceed from a feature branch.
/// An explicit `branch` override in config bypasses this check entirely.
pub fn safe_branch() -> Result<String> {
    let branch = current_branch()?;
    if branch != "master" && branch != "main" {
        return Err(Error::UnsafeBranch { branch });
    }
    Ok(branch)
}

/// The single configured remote. Zero remotes means there is nothing to
/// detect repository information from; more than one makes the choice
/// ambiguous. Both ask the user to configure `repo` and `repo_hosting`.
pub fn single_remote() -> Result<String> {
    let remotes: Vec<String> = run_git(&["remote"])?
        .split_whitespace()
        .map(str::to_string)
        .collect();
    match remotes.as_slice() {
        [] => Err(Error::AmbiguousRemote(
            "No remote repository detected. \
             Unable to retrieve repository information. \
             Please explicit repository name (user/repo) \
             and host (github, bitbucket...) in the yaml config."
                .to_string(),
        )),
        [remote] => Ok(remote.clone()),
        many => Err(Error::AmbiguousRemote(format!(
            "More than one remote found ({}) \
             while detecting repository information. \
             Please explicit repository name (user/repo) \
             and host (github, bitbucket...) in the yaml config.",
            many.join(", ")
        ))),
    }
}

/// URL the given remote points at.
pub fn remote_url(remote: &str) -> Result<String> {
    run_git(&["remote", "get-url", remote])
}
