//! Crate-wide error taxonomy.
//!
//! Every failure is fatal for the current invocation: there is no retry or
//! partial-success path. Variants carry enough context that the CLI can print
//! an actionable message without re-running with different flags.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// No known hosting provider matched the repository remote URL.
    #[error(
        "Unsupported remote repository '{remote}'. \
         Please explicit the repository name (user/repo) with the 'repo' key \
         and the hosting service with the 'repo_hosting' key in the yaml config."
    )]
    Resolution { remote: String },

    /// Zero or more than one git remote configured.
    #[error("{0}")]
    AmbiguousRemote(String),

    /// Detected branch is not in the allowed set and no override was given.
    #[error(
        "Current detected branch '{branch}' is neither 'master' nor 'main'. \
         Stopping to prevent accidental publication from a feature branch. \
         If you still want to release from '{branch}', \
         make that explicit adding a 'branch' key in the yaml config."
    )]
    UnsafeBranch { branch: String },

    /// Project-field lookup for a name with no extraction pattern.
    #[error("Unknown project field '{field}'")]
    UnknownField { field: String },

    /// Non-2xx response or unparseable body from the Asset Library API.
    /// The body is surfaced verbatim for diagnosis.
    #[error("Asset Library API error (status {status}): {body}")]
    Http { status: u16, body: String },

    /// Transport-level failure before any response was obtained.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A git subprocess failed or produced undecodable output.
    #[error("git {command} failed: {detail}")]
    Git { command: String, detail: String },

    #[error("Credentials missing: set {0} in the environment or in .env")]
    MissingCredentials(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
