//! Canonical registry of RTX Remix source repositories.
//!
//! This module defines the authoritative list of repositories the downloader
//! pulls from. When adding or removing repositories, update ONLY the
//! REPOSITORIES table below; the orchestrator derives everything else
//! (step counts, merge order, manifest order) from it.

use clap::ValueEnum;
use std::fmt;

/// Name of the output directory created next to the executable.
pub const OUTPUT_DIR: &str = "remix";

/// Manifest file written into the output directory, one build name per line.
pub const MANIFEST_FILE: &str = "build_names.txt";

/// How a repository's latest build is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Latest tagged release; assets download directly.
    Release,
    /// Newest successful CI run on the given branch; artifacts download
    /// through the unzip-redirect service.
    Artifact { branch: &'static str },
}

/// One source repository and where its payload lands in the merged tree.
#[derive(Debug, Clone, Copy)]
pub struct RepoSpec {
    /// "owner/name" as the API expects it.
    pub repo: &'static str,
    pub strategy: FetchStrategy,
    /// Subpath inside the primary tree to merge into; `None` merges at root.
    pub merge_into: Option<&'static str>,
    /// The single tree every other repository is merged into.
    pub primary: bool,
}

/// All repositories, in fetch order. Exactly one entry is primary.
pub const REPOSITORIES: &[RepoSpec] = &[
    RepoSpec {
        repo: "NVIDIAGameWorks/rtx-remix",
        strategy: FetchStrategy::Release,
        merge_into: None,
        primary: true,
    },
    RepoSpec {
        repo: "NVIDIAGameWorks/dxvk-remix",
        strategy: FetchStrategy::Artifact { branch: "main" },
        merge_into: Some(".trex"),
        primary: false,
    },
    RepoSpec {
        repo: "NVIDIAGameWorks/bridge-remix",
        strategy: FetchStrategy::Artifact { branch: "main" },
        merge_into: None,
        primary: false,
    },
];

/// Build flavor to pick among a CI run's artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BuildType {
    Release,
    Debug,
    Debugoptimized,
}

impl BuildType {
    /// Substring the artifact name must contain.
    pub fn tag(self) -> &'static str {
        match self {
            BuildType::Release => "release",
            BuildType::Debug => "debug",
            BuildType::Debugoptimized => "debugoptimized",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Overall step count for the progress display: two steps per repository
/// (download, extract) plus the four finalize stages.
pub fn total_steps() -> u64 {
    (REPOSITORIES.len() * 2 + 4) as u64
}
