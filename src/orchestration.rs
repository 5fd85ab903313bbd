//! Pipeline orchestration: fetch, merge, clean, relocate, report.
//!
//! Runs the repository table in order. Every fetch completes before any
//! merge begins, and a single fetch failure fails the whole run; an
//! incomplete merged tree is never produced. Ephemeral fetch directories
//! are TempDir guards, so they are released on every exit path.

use crate::download::{self, FetchResult, github};
use crate::merge;
use crate::progress::Reporter;
use crate::repos::{BuildType, FetchStrategy, MANIFEST_FILE, OUTPUT_DIR, REPOSITORIES};
use anyhow::{Context, Result, ensure};
use log::info;
use std::path::{Path, PathBuf};

/// What a completed run produced.
pub struct RunReport {
    /// Final output directory (`remix/` under `output_root`).
    pub output_dir: PathBuf,
    /// Build names written to the manifest, in fetch order.
    pub build_names: Vec<String>,
}

/// Run the full download-and-assemble pipeline.
///
/// The merged tree lands at `output_root/remix/` along with the build
/// manifest. Progress is reported per numbered stage through `reporter`.
pub async fn run(
    gh: &github::Client,
    build_type: BuildType,
    output_root: &Path,
    reporter: &Reporter,
) -> Result<RunReport> {
    let repos = REPOSITORIES;
    ensure!(
        repos.iter().filter(|spec| spec.primary).count() == 1,
        "repository table must designate exactly one primary tree"
    );

    // Fetch every repository before any merge.
    let mut results: Vec<FetchResult> = Vec::with_capacity(repos.len());
    for spec in repos {
        let result = download::fetch(spec, gh, build_type, reporter)
            .await
            .with_context(|| format!("fetching {}", spec.repo))?;
        results.push(result);
    }

    let build_names: Vec<String> = repos
        .iter()
        .zip(&results)
        .filter(|(spec, _)| matches!(spec.strategy, FetchStrategy::Artifact { .. }))
        .map(|(_, result)| result.build_name.clone())
        .collect();

    let primary_index = repos
        .iter()
        .position(|spec| spec.primary)
        .context("repository table has no primary tree")?;
    let primary_path = results[primary_index].dir.path().to_path_buf();

    reporter.stage("Moving builds into the primary tree");
    for (spec, result) in repos.iter().zip(&results) {
        if spec.primary {
            continue;
        }
        let dest = match spec.merge_into {
            Some(subpath) => primary_path.join(subpath),
            None => primary_path.clone(),
        };
        merge::merge_move(result.dir.path(), &dest)
            .with_context(|| format!("merging {} into the primary tree", spec.repo))?;
    }

    reporter.stage("Cleaning up debugging symbols");
    let removed = merge::remove_debug_files(&primary_path)
        .context("removing debug files from the merged tree")?;
    info!("removed {removed} debug files");

    reporter.stage(format!("Moving files to the \"{OUTPUT_DIR}\" directory"));
    let output_dir = output_root.join(OUTPUT_DIR);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    merge::merge_move(&primary_path, &output_dir)
        .context("relocating the merged tree to the output directory")?;

    let manifest_path = output_dir.join(MANIFEST_FILE);
    let mut manifest = build_names.join("\n");
    if !manifest.is_empty() {
        manifest.push('\n');
    }
    std::fs::write(&manifest_path, manifest)
        .with_context(|| format!("writing build manifest {}", manifest_path.display()))?;

    reporter.stage("Cleaning up temporary directories");
    // TempDir guards release every ephemeral fetch directory here.
    drop(results);

    info!("assembled {} builds into {}", repos.len(), output_dir.display());
    Ok(RunReport {
        output_dir,
        build_names,
    })
}
