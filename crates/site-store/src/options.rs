//! Store connection options
//!
//! Assembled once at startup (from the environment or explicitly) and
//! handed to [`crate::GitHubStore::new`].

use std::fmt;
use std::time::Duration;

use crate::{Error, Result};

pub const ENV_TOKEN: &str = "GITHUB_TOKEN";
pub const ENV_REPOSITORY: &str = "REPO_NAME";
pub const ENV_BRANCH: &str = "BRANCH";
pub const ENV_API_URL: &str = "GITHUB_API_URL";

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_BRANCH: &str = "master";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for one repository branch
#[derive(Clone)]
pub struct StoreOptions {
    pub token: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub api_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl fmt::Debug for StoreOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreOptions")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl StoreOptions {
    /// Create options for an `owner/name` repository on the default branch
    pub fn new(token: impl Into<String>, repository: &str) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(Error::invalid_config("access token is empty"));
        }
        let (owner, repo) = parse_repository(repository)?;

        Ok(Self {
            token,
            owner,
            repo,
            branch: DEFAULT_BRANCH.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("site-manager/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read options from `GITHUB_TOKEN`, `REPO_NAME`, `BRANCH` and
    /// `GITHUB_API_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read options through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup(ENV_TOKEN)
            .ok_or_else(|| Error::invalid_config(format!("{ENV_TOKEN} is not set")))?;
        let repository = lookup(ENV_REPOSITORY)
            .ok_or_else(|| Error::invalid_config(format!("{ENV_REPOSITORY} is not set")))?;

        let mut options = Self::new(token, &repository)?;
        if let Some(branch) = lookup(ENV_BRANCH).filter(|b| !b.trim().is_empty()) {
            options = options.with_branch(branch);
        }
        if let Some(api_url) = lookup(ENV_API_URL).filter(|u| !u.trim().is_empty()) {
            options = options.with_api_url(api_url);
        }
        Ok(options)
    }

    /// The `owner/name` form of the repository
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

fn parse_repository(repository: &str) -> Result<(String, String)> {
    let trimmed = repository.trim();
    match trimmed.split_once('/') {
        Some((owner, repo))
            if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
        {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::invalid_config(format!(
            "repository must be 'owner/name', got '{repository}'"
        ))),
    }
}
