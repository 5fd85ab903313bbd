//! Release fetcher: latest tagged release of a repository.

use crate::download::FetchResult;
use crate::download::extract;
use crate::download::github::{Client, Release, ReleaseAsset};
use crate::error::FetchError;
use crate::merge;
use crate::progress::Reporter;
use log::info;

/// Fetch the latest release payload of `repo` into a fresh temp directory.
///
/// The selected asset is downloaded, unpacked, and the archive deleted; the
/// single top-level wrapper directory releases ship with is flattened away
/// so the payload sits at the directory root.
pub async fn fetch_release(
    gh: &Client,
    repo: &str,
    reporter: &Reporter,
) -> Result<FetchResult, FetchError> {
    let dir = tempfile::Builder::new().prefix("remix-dl-").tempdir()?;

    reporter.note(format!("Fetching the latest release info from {repo}"));
    let release = gh.latest_release(repo).await?;
    let asset = select_asset(&release).ok_or_else(|| FetchError::NoEligibleAsset {
        repo: repo.to_string(),
    })?;
    let build_name = release.display_name().to_string();
    info!("latest release of {repo}: {build_name} ({})", asset.name);

    reporter.stage(format!("Downloading latest release from {repo}"));
    let archive = dir.path().join(format!("{build_name}.zip"));
    gh.download(
        &asset.browser_download_url,
        &archive,
        &asset.name,
        asset.size,
        reporter,
    )
    .await?;

    reporter.stage(format!("Extracting latest release from {repo}"));
    extract::unpack_zip(&archive, dir.path()).await?;
    tokio::fs::remove_file(&archive).await?;
    merge::flatten_root(dir.path())?;

    Ok(FetchResult { dir, build_name })
}

/// Select the release asset to download, excluding debug-symbol packages.
///
/// When several non-symbol assets exist the last one in listing order wins,
/// matching the layout of the published releases.
fn select_asset(release: &Release) -> Option<&ReleaseAsset> {
    release
        .assets
        .iter()
        .filter(|asset| !asset.name.contains("symbols"))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release(asset_names: &[&str]) -> Release {
        Release {
            tag_name: "v0.5.0".to_string(),
            name: Some("remix-0.5.0".to_string()),
            assets: asset_names
                .iter()
                .map(|name| ReleaseAsset {
                    name: name.to_string(),
                    browser_download_url: format!("https://example.invalid/{name}"),
                    size: 1,
                })
                .collect(),
        }
    }

    #[test]
    fn never_selects_a_symbols_asset_when_alternatives_exist() {
        let release = release(&["remix-0.5.0-symbols.zip", "remix-0.5.0.zip"]);
        assert_eq!(select_asset(&release).unwrap().name, "remix-0.5.0.zip");
    }

    #[test]
    fn last_non_symbol_asset_wins() {
        let release = release(&["remix-a.zip", "remix-symbols.zip", "remix-b.zip"]);
        assert_eq!(select_asset(&release).unwrap().name, "remix-b.zip");
    }

    #[test]
    fn only_symbols_means_no_eligible_asset() {
        let release = release(&["remix-0.5.0-symbols.zip"]);
        assert!(select_asset(&release).is_none());
    }

    #[test]
    fn empty_asset_list_means_no_eligible_asset() {
        let release = release(&[]);
        assert!(select_asset(&release).is_none());
    }
}
