//! Pull request context and comment posting.

use std::future::Future;
use std::pin::Pin;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::info;

static PULL_REF: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"/pull/(\d+)/").ok());

/// Errors from the GitHub REST API.
#[derive(Debug, thiserror::Error)]
pub enum GithubError {
    #[error("GitHub API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid GitHub token")]
    InvalidToken,
}

/// The workflow run the action executes in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitHubContext {
    pub event_name: String,
    pub git_ref: String,
    /// `owner/name`.
    pub repository: String,
    pub repository_owner: String,
}

impl GitHubContext {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();
        Self {
            event_name: get("GITHUB_EVENT_NAME"),
            git_ref: get("GITHUB_REF"),
            repository: get("GITHUB_REPOSITORY"),
            repository_owner: get("GITHUB_REPOSITORY_OWNER"),
        }
    }

    pub fn is_pull_request(&self) -> bool {
        self.event_name == "pull_request"
    }

    /// PR number from a `refs/pull/<n>/merge` ref.
    pub fn pull_request_number(&self) -> Option<u64> {
        if !self.is_pull_request() {
            return None;
        }
        PULL_REF
            .as_ref()?
            .captures(&self.git_ref)?
            .get(1)?
            .as_str()
            .parse()
            .ok()
    }

    /// Repository name without the owner.
    pub fn repository_name(&self) -> Option<&str> {
        self.repository.rsplit('/').next().filter(|n| !n.is_empty())
    }

    /// Owner, falling back to the first segment of `owner/name`.
    pub fn owner(&self) -> Option<&str> {
        if !self.repository_owner.is_empty() {
            return Some(&self.repository_owner);
        }
        self.repository
            .split_once('/')
            .map(|(owner, _)| owner)
            .filter(|o| !o.is_empty())
    }
}

/// Markdown posted on the pull request.
pub fn comment_body(asset_version_url: &str) -> String {
    format!(
        "**Hello**, Finite State is analyzing your files! :rocket:. \n\
         Please, [click here]({asset_version_url}) to see the progress of the analysis.\
         <br />\n\
         [Finite State](https://platform.finitestate.io/)"
    )
}

/// Posts issue comments.
pub trait Commenter: Send + Sync {
    fn create_comment<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), GithubError>> + Send + 'a>>;
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    body: &'a str,
}

/// [`Commenter`] over the GitHub REST API.
pub struct GithubCommenter {
    http: reqwest::Client,
    api_url: String,
}

impl GithubCommenter {
    pub fn new(api_url: impl Into<String>, token: &str) -> Result<Self, GithubError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("token {token}"))
                .map_err(|_| GithubError::InvalidToken)?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github.v3+json"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("fsupload-action"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            api_url: api_url.into(),
        })
    }

    async fn post_comment(
        &self,
        owner: &str,
        repo: &str,
        issue_number: u64,
        body: &str,
    ) -> Result<(), GithubError> {
        let url = format!(
            "{}/repos/{owner}/{repo}/issues/{issue_number}/comments",
            self.api_url.trim_end_matches('/')
        );
        let resp = self
            .http
            .post(&url)
            .json(&CommentRequest { body })
            .send()
            .await?;
        let status = resp.status();

        if status != StatusCode::CREATED {
            let body = resp.text().await.unwrap_or_default();
            return Err(GithubError::Api {
                status: status.as_u16(),
                body,
            });
        }

        info!(pr = issue_number, "commented on pull request");
        Ok(())
    }
}

impl Commenter for GithubCommenter {
    fn create_comment<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        issue_number: u64,
        body: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<(), GithubError>> + Send + 'a>> {
        Box::pin(self.post_comment(owner, repo, issue_number, body))
    }
}
