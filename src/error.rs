//! Error types for the fetch pipeline.
//!
//! Every way a repository fetch can fail gets its own variant so the shell
//! can tell the user which repository and which stage went wrong. No retry
//! logic exists anywhere; callers either surface these or abort the run.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while resolving or downloading one repository's build.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to create HTTP client: {0}")]
    Client(reqwest::Error),

    #[error("GitHub API request for {repo} failed: {source}")]
    Api {
        repo: String,
        source: reqwest::Error,
    },

    #[error("GitHub API for {repo} returned HTTP {status}")]
    ApiStatus { repo: String, status: StatusCode },

    #[error("no eligible asset in the latest release of {repo} (only symbol packages found)")]
    NoEligibleAsset { repo: String },

    #[error("no successful workflow run on branch '{branch}' of {repo}")]
    NoMatchingRun { repo: String, branch: String },

    #[error("no artifact matching build type '{build_type}' in the latest run of {repo}")]
    NoMatchingArtifact { repo: String, build_type: String },

    #[error("download from {url} failed: {source}")]
    Download {
        url: String,
        source: reqwest::Error,
    },

    #[error("download from {url} returned HTTP {status}")]
    DownloadStatus { url: String, status: StatusCode },

    #[error("download from {url} stalled: no data received for {secs} seconds")]
    DownloadStalled { url: String, secs: u64 },

    #[error("archive {path} could not be unpacked: {source}")]
    Archive {
        path: PathBuf,
        source: zip::result::ZipError,
    },

    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),
}
