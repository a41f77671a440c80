//! Kimai REST API client.
//!
//! Fetches the projects, activities and timesheet entries a report is built
//! from. All requests authenticate with a bearer API token.

use std::fmt;
use std::time::Duration;

use ks_core::{Activity, Project, TimesheetEntry};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Default request timeout for API calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of timesheet records requested per call.
pub const DEFAULT_PAGE_SIZE: usize = 500;

/// Kimai client errors.
#[derive(Debug, Error)]
pub enum KimaiError {
    /// The provided API token was invalid.
    #[error("invalid API token: {reason}")]
    InvalidToken { reason: &'static str },
    /// The Kimai base URL was invalid.
    #[error("invalid Kimai URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: &'static str },
    /// Failed to build HTTP client.
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
    /// HTTP request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// Kimai rejected the API token.
    #[error("unauthorized (status {status}): check the API token")]
    Unauthorized { status: u16 },
    /// API returned an error response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
    /// Failed to parse response.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Filter for the `/timesheets` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimesheetQuery {
    /// Kimai user id; the token owner when `None`.
    pub user: Option<String>,
    /// `YYYY-MM-DDThh:mm:ss`
    pub begin: String,
    /// `YYYY-MM-DDThh:mm:ss`
    pub end: String,
    /// Only entries of these projects; all projects when empty.
    pub projects: Vec<u64>,
    pub size: usize,
}

impl TimesheetQuery {
    pub fn new(begin: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            user: None,
            begin: begin.into(),
            end: end.into(),
            projects: Vec::new(),
            size: DEFAULT_PAGE_SIZE,
        }
    }

    fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(4 + self.projects.len());
        if let Some(user) = self.user.as_deref().filter(|u| !u.is_empty()) {
            params.push(("user", user.to_string()));
        }
        params.push(("begin", self.begin.clone()));
        params.push(("end", self.end.clone()));
        for project in &self.projects {
            params.push(("projects[]", project.to_string()));
        }
        params.push(("size", self.size.to_string()));
        params
    }
}

/// Kimai API client.
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client for the API rooted at `base_url`
    /// (e.g. `https://kimai.example.com/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or whitespace-only, if the URL
    /// is not an http(s) URL, or if the HTTP client fails to build.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Result<Self, KimaiError> {
        let base_url = base_url.into();
        let api_token = api_token.into();

        if api_token.trim().is_empty() {
            return Err(KimaiError::InvalidToken {
                reason: "API token cannot be empty",
            });
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(KimaiError::InvalidUrl {
                url: base_url,
                reason: "expected an http:// or https:// URL",
            });
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .map_err(KimaiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }

    pub async fn projects(&self) -> Result<Vec<Project>, KimaiError> {
        self.get("projects", &[]).await
    }

    pub async fn activities(&self) -> Result<Vec<Activity>, KimaiError> {
        self.get("activities", &[]).await
    }

    /// Fetches the timesheet entries matching `query`.
    pub async fn timesheets(
        &self,
        query: &TimesheetQuery,
    ) -> Result<Vec<TimesheetEntry>, KimaiError> {
        let entries: Vec<TimesheetEntry> = self.get("timesheets", &query.params()).await?;
        if entries.len() >= query.size {
            tracing::warn!(
                size = query.size,
                "received a full page of timesheets, later entries may be missing"
            );
        }
        Ok(entries)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, KimaiError> {
        let url = format!("{}/{path}", self.base_url);
        tracing::debug!(%url, ?params, "requesting Kimai API");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_token)
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(KimaiError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(parse_api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| KimaiError::InvalidResponse(err.to_string()))
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> KimaiError {
    #[derive(Deserialize)]
    struct ErrorPayload {
        message: String,
    }

    let message = serde_json::from_str::<ErrorPayload>(body)
        .map_or_else(|_| body.trim().to_string(), |payload| payload.message);
    KimaiError::Api {
        status: status.as_u16(),
        message,
    }
}
