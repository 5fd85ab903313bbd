//! Artifact fetcher: newest successful CI build on a branch.

use crate::download::FetchResult;
use crate::download::extract;
use crate::download::github::{Artifact, Client, WorkflowRun};
use crate::error::FetchError;
use crate::progress::Reporter;
use crate::repos::BuildType;
use log::info;

/// Fetch the most recent successful CI artifact of `repo` on `branch` that
/// matches the requested build type.
///
/// The download goes through the unzip-redirect service so the payload
/// arrives as a clean zip. Artifact packaging is already flat, so no
/// wrapper-flattening happens here.
pub async fn fetch_artifact(
    gh: &Client,
    repo: &str,
    branch: &str,
    build_type: BuildType,
    reporter: &Reporter,
) -> Result<FetchResult, FetchError> {
    let dir = tempfile::Builder::new().prefix("remix-dl-").tempdir()?;

    reporter.note(format!("Fetching the latest artifact info from {repo}"));
    let runs = gh.workflow_runs(repo).await?;
    let run = select_run(&runs.workflow_runs, branch).ok_or_else(|| FetchError::NoMatchingRun {
        repo: repo.to_string(),
        branch: branch.to_string(),
    })?;

    let artifacts = gh.run_artifacts(repo, &run.artifacts_url).await?;
    let artifact = select_artifact(&artifacts.artifacts, build_type).ok_or_else(|| {
        FetchError::NoMatchingArtifact {
            repo: repo.to_string(),
            build_type: build_type.to_string(),
        }
    })?;
    info!("latest {build_type} artifact of {repo}: {}", artifact.name);

    reporter.stage(format!("Downloading latest artifact from {repo}"));
    let archive = dir.path().join(format!("{}.zip", artifact.name));
    let url = gh.artifact_download_url(repo, artifact.id);
    // Artifact sizes from the API are pre-compression, so the byte bar runs
    // without a known total.
    gh.download(&url, &archive, &artifact.name, 0, reporter).await?;

    reporter.stage(format!("Extracting latest artifact from {repo}"));
    extract::unpack_zip(&archive, dir.path()).await?;
    tokio::fs::remove_file(&archive).await?;

    Ok(FetchResult {
        dir,
        build_name: artifact.name.clone(),
    })
}

/// Newest successful run on `branch`.
///
/// The platform returns runs newest-first, so the first match wins and no
/// date comparison is needed.
fn select_run<'a>(runs: &'a [WorkflowRun], branch: &str) -> Option<&'a WorkflowRun> {
    runs.iter()
        .find(|run| run.head_branch == branch && run.conclusion.as_deref() == Some("success"))
}

/// First artifact whose name contains the requested build-type tag.
fn select_artifact(artifacts: &[Artifact], build_type: BuildType) -> Option<&Artifact> {
    artifacts
        .iter()
        .find(|artifact| artifact.name.contains(build_type.tag()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(branch: &str, conclusion: Option<&str>, artifacts_url: &str) -> WorkflowRun {
        WorkflowRun {
            head_branch: branch.to_string(),
            conclusion: conclusion.map(str::to_string),
            artifacts_url: artifacts_url.to_string(),
        }
    }

    fn artifact(id: u64, name: &str) -> Artifact {
        Artifact {
            id,
            name: name.to_string(),
            size_in_bytes: 0,
        }
    }

    #[test]
    fn selects_first_successful_run_on_branch() {
        let runs = vec![
            run("main", Some("failure"), "a"),
            run("feature/foo", Some("success"), "b"),
            run("main", None, "c"),
            run("main", Some("success"), "d"),
            run("main", Some("success"), "e"),
        ];
        assert_eq!(select_run(&runs, "main").unwrap().artifacts_url, "d");
    }

    #[test]
    fn no_successful_run_on_branch_yields_none() {
        let runs = vec![
            run("main", Some("failure"), "a"),
            run("other", Some("success"), "b"),
        ];
        assert!(select_run(&runs, "main").is_none());
    }

    #[test]
    fn selects_artifact_by_build_type_tag() {
        let artifacts = vec![
            artifact(1, "dxvk-remix-debugoptimized"),
            artifact(2, "dxvk-remix-release"),
        ];
        assert_eq!(
            select_artifact(&artifacts, BuildType::Release).unwrap().id,
            2
        );
        assert_eq!(
            select_artifact(&artifacts, BuildType::Debugoptimized)
                .unwrap()
                .id,
            1
        );
    }

    #[test]
    fn missing_build_type_yields_none() {
        let artifacts = vec![artifact(1, "dxvk-remix-release")];
        assert!(select_artifact(&artifacts, BuildType::Debug).is_none());
    }
}
