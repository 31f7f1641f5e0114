//! GitHub v3 REST implementation of [`RepositoryClient`].

use super::client::{RepoRef, RepositoryClient, RepositoryInfo, RepositoryTree};
use crate::config::ImportConfig;
use crate::error::ImportError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

const RAW_MEDIA_TYPE: &str = "application/vnd.github.v3.raw";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";

#[derive(Debug, Deserialize)]
struct RawOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct RawRepository {
    name: String,
    full_name: String,
    owner: RawOwner,
    description: Option<String>,
    html_url: String,
    #[serde(default)]
    clone_url: String,
    default_branch: String,
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    language: Option<String>,
}

impl From<RawRepository> for RepositoryInfo {
    fn from(raw: RawRepository) -> Self {
        Self {
            name: raw.name,
            full_name: raw.full_name,
            owner: raw.owner.login,
            description: raw.description,
            html_url: raw.html_url,
            clone_url: raw.clone_url,
            default_branch: raw.default_branch,
            stars: raw.stargazers_count,
            forks: raw.forks_count,
            language: raw.language,
        }
    }
}

/// GitHub API client; a bearer token is attached to every request when set
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(config: &ImportConfig) -> Result<Self, ImportError> {
        let mut headers = HeaderMap::new();
        let agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| ImportError::fetch_failed("client setup", e))?;
        headers.insert(USER_AGENT, agent);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ImportError::fetch_failed("client setup", e))?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            token: config.resolved_token(),
        })
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.http.get(url);
        match &self.token {
            Some(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => request,
        }
    }

    async fn send(
        &self,
        request: RequestBuilder,
        stage: &str,
        subject: &str,
    ) -> Result<reqwest::Response, ImportError> {
        let response = request
            .send()
            .await
            .map_err(|e| ImportError::fetch_failed(stage, e))?;
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(status_error(status, stage, subject))
        }
    }
}

/// Map a non-success status to the import error taxonomy.
fn status_error(status: StatusCode, stage: &str, subject: &str) -> ImportError {
    match status {
        StatusCode::UNAUTHORIZED => ImportError::AuthRequired(subject.to_string()),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS => {
            ImportError::AccessDenied(subject.to_string())
        }
        StatusCode::NOT_FOUND if stage == "repository metadata" => {
            ImportError::RepositoryNotFound(subject.to_string())
        }
        StatusCode::NOT_FOUND => ImportError::fetch_failed(stage, format!("{} not found", subject)),
        other => ImportError::fetch_failed(stage, format!("HTTP {}", other.as_u16())),
    }
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    async fn fetch_repository(&self, repo: &RepoRef) -> Result<RepositoryInfo, ImportError> {
        let url = format!("{}/repos/{}/{}", self.api_base, repo.owner, repo.name);
        debug!(url = %url, "Fetching repository metadata");
        let stage = "repository metadata";
        let response = self
            .send(self.get(&url).header(ACCEPT, JSON_MEDIA_TYPE), stage, &repo.full_name())
            .await?;
        let raw: RawRepository = response
            .json()
            .await
            .map_err(|e| ImportError::fetch_failed(stage, e))?;
        Ok(raw.into())
    }

    async fn fetch_tree(&self, repo: &RepoRef, branch: &str) -> Result<RepositoryTree, ImportError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base, repo.owner, repo.name, branch
        );
        debug!(url = %url, "Fetching repository contents");
        let stage = "repository contents";
        let response = self
            .send(self.get(&url).header(ACCEPT, JSON_MEDIA_TYPE), stage, &repo.full_name())
            .await?;
        response
            .json()
            .await
            .map_err(|e| ImportError::fetch_failed(stage, e))
    }

    async fn fetch_blob(&self, repo: &RepoRef, sha: &str) -> Result<String, ImportError> {
        let url = format!("{}/repos/{}/{}/git/blobs/{}", self.api_base, repo.owner, repo.name, sha);
        let stage = "file content";
        let response = self
            .send(self.get(&url).header(ACCEPT, RAW_MEDIA_TYPE), stage, sha)
            .await?;
        response
            .text()
            .await
            .map_err(|e| ImportError::fetch_failed(stage, e))
    }
}
