//! GitHub REST backend
//!
//! Files are read and written through the repository contents API; the
//! blob sha GitHub returns for each file is the version token.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::document::{CommitSummary, DirEntry, Document, EntryKind, VersionToken};
use crate::options::StoreOptions;
use crate::path::{normalize_dir_path, normalize_file_path};
use crate::store::DocumentStore;
use crate::{Error, Result};

const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
    List,
    Dispatch,
    Commits,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetch => "fetch",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
            Self::Dispatch => "dispatch",
            Self::Commits => "commits",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    path: String,
    sha: String,
    #[serde(default)]
    size: u64,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentsEntry>),
    Single(ContentsEntry),
}

#[derive(Debug, Deserialize)]
struct WriteResponse {
    content: ContentsEntry,
}

#[derive(Debug, Serialize)]
struct WriteRequest<'a> {
    message: &'a str,
    content: String,
    branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    sha: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DeleteRequest<'a> {
    message: &'a str,
    sha: &'a str,
    branch: &'a str,
}

#[derive(Debug, Serialize)]
struct DispatchRequest<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
}

#[derive(Debug, Deserialize)]
struct CommitEntry {
    sha: String,
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
    #[serde(default)]
    author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
struct CommitAuthor {
    name: String,
    date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Document store backed by a GitHub repository branch
pub struct GitHubStore {
    client: Client,
    base: Url,
    options: StoreOptions,
}

impl fmt::Debug for GitHubStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubStore")
            .field("base", &self.base.as_str())
            .field("options", &self.options)
            .finish()
    }
}

impl GitHubStore {
    /// Create a store client. No request is made until the first call.
    pub fn new(options: StoreOptions) -> Result<Self> {
        let base = Url::parse(&options.api_url)
            .map_err(|e| Error::invalid_config(format!("invalid API url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::invalid_config(format!(
                "API url cannot be a base: {}",
                options.api_url
            )));
        }

        let client = Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent.clone())
            .default_headers(default_headers(&options.token)?)
            .build()
            .map_err(|e| Error::invalid_config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base,
            options,
        })
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }

    fn repo_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| Error::invalid_config("API url cannot be a base"))?;
            path.pop_if_empty();
            path.extend(["repos", self.options.owner.as_str(), self.options.repo.as_str()]);
            path.extend(segments);
        }
        Ok(url)
    }

    pub(crate) fn contents_url(&self, path: &str) -> Result<Url> {
        let mut segments = vec!["contents"];
        if path.is_empty() {
            segments.push("");
        } else {
            segments.extend(path.split('/'));
        }
        self.repo_url(&segments)
    }

    fn send(&self, op: Operation, path: &str, request: RequestBuilder) -> Result<Response> {
        let response = request.send().map_err(|e| {
            tracing::warn!(%op, path, error = %e, "Request to remote store failed");
            Error::transient(format!("{op} {path}: {e}"))
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiError>(&body)
            .map(|e| e.message)
            .unwrap_or(body);
        let err = classify_status(op, path, status, &message);
        tracing::warn!(%op, path, %status, error = %err, "Remote store rejected request");
        Err(err)
    }

    fn put_contents(
        &self,
        op: Operation,
        path: &str,
        content: &str,
        version: Option<&VersionToken>,
        message: &str,
    ) -> Result<Document> {
        let path = normalize_file_path(path)?;
        let body = WriteRequest {
            message,
            content: STANDARD.encode(content),
            branch: &self.options.branch,
            sha: version.map(VersionToken::as_str),
        };

        let response = self.send(op, &path, self.client.put(self.contents_url(&path)?).json(&body))?;
        let written: WriteResponse = read_json(response, &path)?;

        tracing::info!(%op, path = %path, version = %written.content.sha, "Committed document");
        Ok(Document::new(
            path,
            content,
            VersionToken::new(written.content.sha),
        ))
    }
}

impl DocumentStore for GitHubStore {
    fn fetch(&self, path: &str) -> Result<Document> {
        let path = normalize_file_path(path)?;
        let request = self
            .client
            .get(self.contents_url(&path)?)
            .query(&[("ref", self.options.branch.as_str())]);
        let response = self.send(Operation::Fetch, &path, request)?;

        match read_json::<ContentsResponse>(response, &path)? {
            ContentsResponse::Single(entry) if entry.kind == "file" => {
                let content = decode_content(&path, entry.content.as_deref(), entry.encoding.as_deref())?;
                tracing::debug!(path = %path, version = %entry.sha, "Fetched document");
                Ok(Document::new(path, content, VersionToken::new(entry.sha)))
            }
            _ => Err(Error::not_found(path)),
        }
    }

    fn create(&self, path: &str, content: &str, message: &str) -> Result<Document> {
        self.put_contents(Operation::Create, path, content, None, message)
    }

    fn update(
        &self,
        path: &str,
        content: &str,
        version: &VersionToken,
        message: &str,
    ) -> Result<Document> {
        self.put_contents(Operation::Update, path, content, Some(version), message)
    }

    fn delete(&self, path: &str, version: &VersionToken, message: &str) -> Result<()> {
        let path = normalize_file_path(path)?;
        let body = DeleteRequest {
            message,
            sha: version.as_str(),
            branch: &self.options.branch,
        };
        self.send(
            Operation::Delete,
            &path,
            self.client.delete(self.contents_url(&path)?).json(&body),
        )?;
        tracing::info!(path = %path, "Deleted document");
        Ok(())
    }

    fn list_directory(&self, path: &str) -> Result<Vec<DirEntry>> {
        let path = normalize_dir_path(path)?;
        let request = self
            .client
            .get(self.contents_url(&path)?)
            .query(&[("ref", self.options.branch.as_str())]);
        let response = self.send(Operation::List, &path, request)?;

        match read_json::<ContentsResponse>(response, &path)? {
            ContentsResponse::Listing(entries) => Ok(entries
                .into_iter()
                .map(|entry| DirEntry {
                    kind: if entry.kind == "dir" {
                        EntryKind::Dir
                    } else {
                        EntryKind::File
                    },
                    name: entry.name,
                    path: entry.path,
                    version: VersionToken::new(entry.sha),
                    size: entry.size,
                })
                .collect()),
            ContentsResponse::Single(_) => Err(Error::not_found(path)),
        }
    }

    fn dispatch_workflow(&self, workflow: &str) -> Result<()> {
        let url = self.repo_url(&["actions", "workflows", workflow, "dispatches"])?;
        let body = DispatchRequest {
            git_ref: &self.options.branch,
        };
        self.send(Operation::Dispatch, workflow, self.client.post(url).json(&body))?;
        tracing::info!(workflow, branch = %self.options.branch, "Dispatched workflow");
        Ok(())
    }

    fn latest_commit(&self) -> Result<CommitSummary> {
        let branch = self.options.branch.as_str();
        let request = self
            .client
            .get(self.repo_url(&["commits"])?)
            .query(&[("sha", branch), ("per_page", "1")]);
        let response = self.send(Operation::Commits, branch, request)?;

        let commits: Vec<CommitEntry> = read_json(response, branch)?;
        let head = commits
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(branch))?;

        let (author, date) = match head.commit.author {
            Some(author) => (author.name, author.date),
            None => ("unknown".to_string(), Utc::now()),
        };
        Ok(CommitSummary::new(&head.sha, head.commit.message, author, date))
    }
}

fn default_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let auth = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|e| Error::invalid_config(format!("invalid auth header: {e}")))?;
    headers.insert(AUTHORIZATION, auth);
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("application/vnd.github+json"),
    );
    headers.insert(
        "X-GitHub-Api-Version",
        HeaderValue::from_static(API_VERSION),
    );
    Ok(headers)
}

fn read_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
    let body = response
        .text()
        .map_err(|e| Error::transient(format!("reading response for {path}: {e}")))?;
    serde_json::from_str(&body).map_err(|e| Error::malformed(path, e.to_string()))
}

/// Map a non-success status to the store error taxonomy
pub(crate) fn classify_status(
    op: Operation,
    path: &str,
    status: StatusCode,
    message: &str,
) -> Error {
    match (status, op) {
        (StatusCode::NOT_FOUND, _) => Error::not_found(path),
        (StatusCode::CONFLICT, _) => Error::VersionConflict {
            path: path.to_string(),
        },
        (StatusCode::UNPROCESSABLE_ENTITY, Operation::Create) => Error::AlreadyExists {
            path: path.to_string(),
        },
        (StatusCode::UNPROCESSABLE_ENTITY, Operation::Update | Operation::Delete) => {
            Error::VersionConflict {
                path: path.to_string(),
            }
        }
        _ => Error::transient(format!("{op} {path} returned {status}: {message}")),
    }
}

/// Decode the base64 body of a contents API file entry
pub(crate) fn decode_content(
    path: &str,
    content: Option<&str>,
    encoding: Option<&str>,
) -> Result<String> {
    if encoding != Some("base64") {
        return Err(Error::malformed(
            path,
            format!("unsupported content encoding {encoding:?}"),
        ));
    }

    let compact: String = content
        .unwrap_or_default()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = STANDARD
        .decode(compact)
        .map_err(|e| Error::malformed(path, format!("invalid base64: {e}")))?;
    String::from_utf8(bytes).map_err(|e| Error::malformed(path, format!("not UTF-8: {e}")))
}
