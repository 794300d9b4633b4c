//! Hosting provider resolution: maps a git remote URL to the hosting service
//! it lives on and derives the browse/raw/issues URLs the Asset Library wants.
//!
//! Each provider carries its own URL patterns and builder rules. The raw URL
//! scheme is deliberately not generalized: GitHub serves raw content from a
//! dedicated subdomain with a `refs/heads` path segment while the others serve
//! it from a path on the main domain, each with its own shape.

use regex::Regex;

use crate::error::{Error, Result};

/// The known hosting services, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hosting {
    GitHub,
    GitLab,
    BitBucket,
    Gitea,
}

const ALL: [Hosting; 4] = [
    Hosting::GitHub,
    Hosting::GitLab,
    Hosting::BitBucket,
    Hosting::Gitea,
];

impl Hosting {
    /// Name as accepted by the Asset Library's `download_provider` field.
    pub fn name(&self) -> &'static str {
        match self {
            Hosting::GitHub => "GitHub",
            Hosting::GitLab => "GitLab",
            Hosting::BitBucket => "BitBucket",
            Hosting::Gitea => "Gitea",
        }
    }

    pub fn domain(&self) -> &'static str {
        match self {
            Hosting::GitHub => "github.com",
            Hosting::GitLab => "gitlab.com",
            Hosting::BitBucket => "bitbucket.org",
            Hosting::Gitea => "gitea.com",
        }
    }

    /// Parses a `repo_hosting` config override. Unknown names are rejected so
    /// an unsupported provider fails at config time, not at the API.
    pub fn from_name(name: &str) -> Result<Hosting> {
        ALL.iter()
            .copied()
            .find(|hosting| hosting.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::Resolution {
                remote: format!("repo_hosting '{name}' is not a supported provider"),
            })
    }

    /// URL forms this provider's remotes come in: SSH and HTTPS, with or
    /// without the `.git` suffix. The single capture group is the repo slug.
    fn patterns(&self) -> Vec<Regex> {
        let domain = self.domain().replace('.', r"\.");
        [
            format!(r"^git@{domain}:(.+?)(?:\.git)?$"),
            format!(r"^ssh://git@{domain}/(.+?)(?:\.git)?$"),
            format!(r"^https://{domain}/(.+?)(?:\.git)?/?$"),
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static pattern"))
        .collect()
    }

    pub fn browse_url(&self, repo: &str) -> String {
        format!("https://{}/{}", self.domain(), repo)
    }

    pub fn issues_url(&self, repo: &str) -> String {
        format!("https://{}/{}/issues", self.domain(), repo)
    }

    /// Base URL for raw file content. Appending `/<relative path>` to the
    /// result yields a direct file URL.
    pub fn raw_url(&self, repo: &str, branch: &str) -> String {
        match self {
            Hosting::GitHub => {
                format!("https://raw.githubusercontent.com/{repo}/refs/heads/{branch}")
            }
            Hosting::GitLab => format!("https://gitlab.com/{repo}/-/raw/{branch}"),
            Hosting::BitBucket => format!("https://bitbucket.org/{repo}/raw/{branch}"),
            Hosting::Gitea => format!("https://gitea.com/{repo}/raw/branch/{branch}"),
        }
    }
}

/// Identifies which provider a remote URL belongs to and extracts the repo
/// slug (`owner/name`). Providers are tried in a fixed order and the first
/// matching pattern wins.
pub fn resolve_remote(remote_url: &str) -> Result<(Hosting, String)> {
    for hosting in ALL {
        for pattern in hosting.patterns() {
            if let Some(captures) = pattern.captures(remote_url) {
                let repo = captures[1].to_string();
                tracing::debug!(remote = remote_url, hosting = hosting.name(), repo = %repo, "Resolved remote URL");
                return Ok((hosting, repo));
            }
        }
    }
    Err(Error::Resolution {
        remote: remote_url.to_string(),
    })
}
