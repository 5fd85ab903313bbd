//! Build acquisition from the hosting platform.
//!
//! ## Module Organization
//!
//! - `github` - endpoint client for release/run/artifact discovery and
//!   streaming downloads
//! - `release` - latest-tagged-release fetcher
//! - `artifact` - newest-successful-CI-run fetcher
//! - `extract` - zip unpacking

pub mod github;

mod artifact;
mod extract;
mod release;

pub use artifact::fetch_artifact;
pub use release::fetch_release;

use crate::error::FetchError;
use crate::progress::Reporter;
use crate::repos::{BuildType, FetchStrategy, RepoSpec};
use tempfile::TempDir;

/// The unpacked, normalized payload of one repository fetch.
#[derive(Debug)]
pub struct FetchResult {
    /// Ephemeral directory holding the payload. Deleted when the guard
    /// drops, on success and failure paths alike.
    pub dir: TempDir,
    /// Resolved display name, recorded for the build manifest.
    pub build_name: String,
}

/// Fetch one repository's latest build according to its strategy.
pub async fn fetch(
    spec: &RepoSpec,
    gh: &github::Client,
    build_type: BuildType,
    reporter: &Reporter,
) -> Result<FetchResult, FetchError> {
    match spec.strategy {
        FetchStrategy::Release => fetch_release(gh, spec.repo, reporter).await,
        FetchStrategy::Artifact { branch } => {
            fetch_artifact(gh, spec.repo, branch, build_type, reporter).await
        }
    }
}
