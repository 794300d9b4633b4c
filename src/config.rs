//! Config loading: parses the user's YAML metadata file and resolves every
//! unset optional field through its detector.
//!
//! The build is two-phase on purpose. [`RawConfig`] is a pure parse of the
//! document with optional fields left optional; [`Config::resolve`] then fills
//! each gap from git or the project descriptor. Detection stays side-effect
//! free and testable apart from the parser, and an override for one field
//! never alters what is detected for another (overriding `repo` does not
//! change the detected `branch`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{error, info};

use crate::error::Result;
use crate::hosting::{self, Hosting};
use crate::previews::Preview;
use crate::{git, project};

/// The YAML document as written by the user, before any detection.
#[derive(Debug, Deserialize)]
pub struct RawConfig {
    pub asset_id: String,
    pub category: i64,
    pub project_license: String,
    #[serde(default)]
    pub previews: Vec<Preview>,
    #[serde(default)]
    pub description_files: Vec<PathBuf>,
    pub repo: Option<String>,
    pub branch: Option<String>,
    pub repo_hosting: Option<String>,
}

impl RawConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<RawConfig> {
        let path = path.as_ref();
        info!(config_path = ?path, "Loading configuration from file");
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                error!(error = ?e, config_path = ?path, "Failed to read config file");
                return Err(e.into());
            }
        };
        match serde_yaml::from_str(&content) {
            Ok(raw) => {
                info!(config_path = ?path, "Parsed config YAML successfully");
                Ok(raw)
            }
            Err(e) => {
                error!(error = ?e, config_path = ?path, "Failed to parse config YAML");
                Err(e.into())
            }
        }
    }
}

/// Fully resolved publication metadata.
#[derive(Debug)]
pub struct Config {
    pub asset_id: String,
    pub category: i64,
    pub project_license: String,
    pub previews: Vec<Preview>,
    pub description_files: Vec<PathBuf>,

    pub repo: String,
    pub branch: String,
    pub git_hash: String,
    pub repo_hosting: Hosting,

    pub project_name: Option<String>,
    pub project_version: Option<String>,
    pub config_description: Option<String>,
    pub godot_version: Option<String>,
    pub icon: Option<String>,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        Config::resolve(RawConfig::from_file(path)?)
    }

    /// Fills every unset optional field through its dedicated detector.
    ///
    /// The branch-safety check only runs when the branch is detected; an
    /// explicit `branch` key bypasses it. Remote resolution only runs when
    /// `repo` or `repo_hosting` is missing.
    pub fn resolve(raw: RawConfig) -> Result<Config> {
        let git_hash = git::revision_hash()?;

        let branch = match raw.branch {
            Some(branch) => branch,
            None => git::safe_branch()?,
        };

        let (repo, repo_hosting) = match (raw.repo, raw.repo_hosting) {
            (Some(repo), Some(name)) => (repo, Hosting::from_name(&name)?),
            (repo_override, hosting_override) => {
                let remote = git::single_remote()?;
                let url = git::remote_url(&remote)?;
                let (detected_hosting, detected_repo) = hosting::resolve_remote(&url)?;
                let repo_hosting = match hosting_override {
                    Some(name) => Hosting::from_name(&name)?,
                    None => detected_hosting,
                };
                (repo_override.unwrap_or(detected_repo), repo_hosting)
            }
        };

        info!(
            repo = %repo,
            branch = %branch,
            hosting = repo_hosting.name(),
            commit = %git_hash,
            "Resolved repository information"
        );

        Ok(Config {
            asset_id: raw.asset_id,
            category: raw.category,
            project_license: raw.project_license,
            previews: raw.previews,
            description_files: raw.description_files,
            repo,
            branch,
            git_hash,
            repo_hosting,
            project_name: project::read_field("project_name")?,
            project_version: project::read_field("project_version")?,
            config_description: project::read_field("description")?,
            godot_version: project::read_field("godot_version")?,
            icon: project::read_field("icon")?,
        })
    }

    pub fn browse_url(&self) -> String {
        self.repo_hosting.browse_url(&self.repo)
    }

    pub fn raw_url(&self) -> String {
        self.repo_hosting.raw_url(&self.repo, &self.branch)
    }

    pub fn issues_url(&self) -> String {
        self.repo_hosting.issues_url(&self.repo)
    }

    pub fn icon_url(&self) -> String {
        format!("{}/icon.svg", self.raw_url())
    }

    /// Concatenates the configured description files, dropping markdown image
    /// lines (the library renders plain text, they look awful) and a set of
    /// commit-log emojis. Falls back to the project descriptor's description
    /// when the result is empty.
    pub fn description(&self) -> Result<String> {
        let mut parts = Vec::new();
        for file in &self.description_files {
            parts.push(fs::read_to_string(file)?);
        }
        let description = clean_description(&parts.join("\n"));
        if description.is_empty() {
            return Ok(self.config_description.clone().unwrap_or_default());
        }
        Ok(description)
    }
}

const STRIPPED_EMOJIS: &str =
    "\u{2728}\u{1f41b}\u{1f3d7}\u{1f9f9}\u{1f527}\u{1f4dd}\u{267b}\u{fe0f}\u{1f484}";

fn clean_description(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with("!["))
        .collect::<Vec<_>>()
        .join("\n")
        .chars()
        .filter(|c| !STRIPPED_EMOJIS.contains(*c))
        .collect()
}
