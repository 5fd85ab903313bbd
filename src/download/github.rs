//! GitHub endpoint client for release and CI-artifact discovery.
//!
//! Wraps the two read-only REST endpoint families the downloader needs
//! (latest release by repository, workflow runs by repository plus their
//! artifact lists) and the streaming binary download path. Base URLs are
//! injectable so tests can point the client at stub endpoints.

use crate::error::FetchError;
use crate::progress::Reporter;
use futures_util::StreamExt;
use log::debug;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

/// Fixed identifying header sent with every request.
const USER_AGENT: &str = concat!(
    "remix-dl/",
    env!("CARGO_PKG_VERSION"),
    " - RTX Remix downloader"
);

const API_BASE: &str = "https://api.github.com";

/// CI artifacts are fetched through this unzip-redirect service; the
/// platform's native artifact API wraps them in an additional zip layer.
const ARTIFACT_BASE: &str = "https://nightly.link";

const DOWNLOAD_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const DOWNLOAD_INACTIVITY_TIMEOUT: Duration = Duration::from_secs(30);

/// Latest-release metadata.
#[derive(Deserialize, Debug)]
pub struct Release {
    pub tag_name: String,
    pub name: Option<String>,
    pub assets: Vec<ReleaseAsset>,
}

impl Release {
    /// Human-readable build name; releases without a title fall back to
    /// their tag.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

/// One downloadable asset attached to a release.
#[derive(Deserialize, Debug)]
pub struct ReleaseAsset {
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

/// Workflow-run listing; the platform returns runs newest-first.
#[derive(Deserialize, Debug)]
pub struct WorkflowRuns {
    pub workflow_runs: Vec<WorkflowRun>,
}

#[derive(Deserialize, Debug)]
pub struct WorkflowRun {
    pub head_branch: String,
    /// Null while the run is still in progress.
    pub conclusion: Option<String>,
    pub artifacts_url: String,
}

#[derive(Deserialize, Debug)]
pub struct ArtifactList {
    pub artifacts: Vec<Artifact>,
}

#[derive(Deserialize, Debug)]
pub struct Artifact {
    pub id: u64,
    pub name: String,
    /// Pre-compression size; not usable as a download length.
    pub size_in_bytes: u64,
}

/// HTTP client for the hosting platform's endpoints.
pub struct Client {
    http: reqwest::Client,
    api_base: String,
    artifact_base: String,
}

impl Client {
    /// Client against the real GitHub and unzip-redirect endpoints.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_urls(API_BASE, ARTIFACT_BASE)
    }

    /// Client with overridden base URLs (no trailing slash); used by tests.
    pub fn with_base_urls(api_base: &str, artifact_base: &str) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(DOWNLOAD_CONNECT_TIMEOUT)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            artifact_base: artifact_base.trim_end_matches('/').to_string(),
        })
    }

    /// Latest tagged release of `repo` ("owner/name").
    pub async fn latest_release(&self, repo: &str) -> Result<Release, FetchError> {
        let url = format!("{}/repos/{}/releases/latest", self.api_base, repo);
        self.get_json(repo, &url).await
    }

    /// CI runs for `repo`, newest first.
    pub async fn workflow_runs(&self, repo: &str) -> Result<WorkflowRuns, FetchError> {
        let url = format!("{}/repos/{}/actions/runs", self.api_base, repo);
        self.get_json(repo, &url).await
    }

    /// Artifact list for a run, via the absolute URL the run listing carries.
    pub async fn run_artifacts(
        &self,
        repo: &str,
        artifacts_url: &str,
    ) -> Result<ArtifactList, FetchError> {
        self.get_json(repo, artifacts_url).await
    }

    /// Clean-zip download URL for a CI artifact, via the redirect service.
    pub fn artifact_download_url(&self, repo: &str, artifact_id: u64) -> String {
        format!(
            "{}/{}/actions/artifacts/{}.zip",
            self.artifact_base, repo, artifact_id
        )
    }

    /// Stream a binary payload to `dest`, reporting byte progress.
    ///
    /// Redirects are followed (default policy). The transfer fails if no
    /// data arrives for `DOWNLOAD_INACTIVITY_TIMEOUT`; there is no cap on
    /// total transfer time. Pass `total` of zero when the size is unknown.
    pub async fn download(
        &self,
        url: &str,
        dest: &Path,
        label: &str,
        total: u64,
        reporter: &Reporter,
    ) -> Result<(), FetchError> {
        debug!("downloading {} to {}", url, dest.display());

        let response = self.http.get(url).send().await.map_err(|e| {
            FetchError::Download {
                url: url.to_string(),
                source: e,
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::DownloadStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        loop {
            let chunk = match timeout(DOWNLOAD_INACTIVITY_TIMEOUT, stream.next()).await {
                Ok(Some(Ok(chunk))) => chunk,
                Ok(Some(Err(e))) => {
                    return Err(FetchError::Download {
                        url: url.to_string(),
                        source: e,
                    });
                }
                Ok(None) => break,
                Err(_) => {
                    return Err(FetchError::DownloadStalled {
                        url: url.to_string(),
                        secs: DOWNLOAD_INACTIVITY_TIMEOUT.as_secs(),
                    });
                }
            };

            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            reporter.download(label, downloaded, total);
        }

        file.flush().await?;
        reporter.download_done();
        debug!("downloaded {} bytes from {}", downloaded, url);
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, repo: &str, url: &str) -> Result<T, FetchError> {
        debug!("GET {}", url);

        let response = self.http.get(url).send().await.map_err(|e| {
            FetchError::Api {
                repo: repo.to_string(),
                source: e,
            }
        })?;

        if !response.status().is_success() {
            return Err(FetchError::ApiStatus {
                repo: repo.to_string(),
                status: response.status(),
            });
        }

        response.json().await.map_err(|e| FetchError::Api {
            repo: repo.to_string(),
            source: e,
        })
    }
}
