//! Recursive tree merge and flatten operations.
//!
//! This is the one routine the whole pipeline reuses: freshly unpacked
//! release archives are flattened with it, and every secondary repository's
//! payload is merged into the primary tree with it. Entries are snapshotted
//! before any mutation so directories can be removed as they empty without
//! invalidating the iteration.

use log::debug;
use std::fs;
use std::io;
use std::path::Path;
use walkdir::WalkDir;

/// Filenames removed from the merged tree before it ships.
const DEBUG_FILE_NAMES: &[&str] = &["CRC.txt", "artifacts_readme.txt"];

/// Recursively move the contents of `source` into `dest`.
///
/// Files are moved directly; a file already present at the destination is
/// replaced (source always overwrites destination). Directories are created
/// at the destination as needed and merged recursively; each source
/// subdirectory is removed once emptied. `source` itself is left in place
/// for the caller (or its TempDir guard) to dispose of.
pub fn merge_move(source: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;

    // Snapshot before mutating: entries are removed as they are moved.
    let entries: Vec<fs::DirEntry> = fs::read_dir(source)?.collect::<io::Result<_>>()?;

    for entry in entries {
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            debug!("merging {} into {}", entry.path().display(), target.display());
            merge_move(&entry.path(), &target)?;
            fs::remove_dir(entry.path())?;
        } else {
            debug!("moving {} to {}", entry.path().display(), target.display());
            move_file(&entry.path(), &target)?;
        }
    }

    Ok(())
}

/// Move one file, replacing whatever is at `target`.
///
/// Temp directories commonly live on a different filesystem than the output
/// tree, so a failed rename falls back to copy-and-delete.
fn move_file(source: &Path, target: &Path) -> io::Result<()> {
    if let Ok(meta) = fs::symlink_metadata(target) {
        if meta.is_dir() {
            fs::remove_dir_all(target)?;
        } else {
            fs::remove_file(target)?;
        }
    }

    match fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(_) => {
            fs::copy(source, target)?;
            fs::remove_file(source)
        }
    }
}

/// Strip the single top-level wrapper directory from an unpacked archive.
///
/// Release zips package their payload under one wrapper directory; its
/// contents are merged into `dir` and the emptied wrapper is removed. A
/// payload that is already flat (anything other than exactly one top-level
/// directory) is left untouched.
pub fn flatten_root(dir: &Path) -> io::Result<()> {
    let entries: Vec<fs::DirEntry> = fs::read_dir(dir)?.collect::<io::Result<_>>()?;

    let [wrapper] = entries.as_slice() else {
        return Ok(());
    };
    if !wrapper.file_type()?.is_dir() {
        return Ok(());
    }

    debug!("flattening wrapper directory {}", wrapper.path().display());
    merge_move(&wrapper.path(), dir)?;
    fs::remove_dir(wrapper.path())
}

/// Delete known debug/symbol files anywhere under `root`.
///
/// Covers `*.pdb` plus the fixed filenames in `DEBUG_FILE_NAMES`. Returns
/// the number of files removed.
pub fn remove_debug_files(root: &Path) -> io::Result<usize> {
    let mut removed = 0;

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(io::Error::other)?;
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdb = entry.path().extension().is_some_and(|ext| ext == "pdb");
        let is_listed = entry
            .file_name()
            .to_str()
            .is_some_and(|name| DEBUG_FILE_NAMES.contains(&name));

        if is_pdb || is_listed {
            debug!("removing debug file {}", entry.path().display());
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }

    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(path: PathBuf, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn merge_moves_disjoint_trees() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(src.join("a.txt"), "a");
        write(src.join("sub/b.txt"), "b");
        write(dst.join("c.txt"), "c");

        merge_move(&src, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("sub/b.txt")).unwrap(), "b");
        assert_eq!(fs::read_to_string(dst.join("c.txt")).unwrap(), "c");
        // emptied subdirectory is gone, source root remains
        assert!(!src.join("sub").exists());
        assert!(src.exists());
    }

    #[test]
    fn merge_source_overwrites_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(src.join("shared.txt"), "from source");
        write(dst.join("shared.txt"), "from dest");

        merge_move(&src, &dst).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("shared.txt")).unwrap(),
            "from source"
        );
    }

    #[test]
    fn merging_an_empty_directory_changes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let empty = tmp.path().join("empty");
        let dst = tmp.path().join("dst");
        write(src.join("a.txt"), "a");
        write(src.join("sub/b.txt"), "b");
        fs::create_dir_all(&empty).unwrap();

        merge_move(&src, &dst).unwrap();
        merge_move(&empty, &dst).unwrap();

        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert_eq!(fs::read_to_string(dst.join("sub/b.txt")).unwrap(), "b");
        assert_eq!(fs::read_dir(&dst).unwrap().count(), 2);
    }

    #[test]
    fn merge_combines_overlapping_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(src.join("bin/new.dll"), "new");
        write(dst.join("bin/old.dll"), "old");

        merge_move(&src, &dst).unwrap();

        assert!(dst.join("bin/new.dll").exists());
        assert!(dst.join("bin/old.dll").exists());
    }

    #[test]
    fn flatten_strips_single_wrapper() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path().join("remix-1.0/bin/runtime.dll"), "x");
        write(tmp.path().join("remix-1.0/readme.md"), "y");

        flatten_root(tmp.path()).unwrap();

        assert!(tmp.path().join("bin/runtime.dll").exists());
        assert!(tmp.path().join("readme.md").exists());
        assert!(!tmp.path().join("remix-1.0").exists());
    }

    #[test]
    fn flatten_leaves_flat_payload_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path().join("runtime.dll"), "x");
        write(tmp.path().join("d3d9.dll"), "y");

        flatten_root(tmp.path()).unwrap();

        assert!(tmp.path().join("runtime.dll").exists());
        assert!(tmp.path().join("d3d9.dll").exists());
    }

    #[test]
    fn flatten_leaves_single_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path().join("only.txt"), "x");

        flatten_root(tmp.path()).unwrap();

        assert!(tmp.path().join("only.txt").exists());
    }

    #[test]
    fn removes_debug_files_recursively() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path().join("runtime.dll"), "keep");
        write(tmp.path().join("runtime.pdb"), "drop");
        write(tmp.path().join(".trex/d3d9.pdb"), "drop");
        write(tmp.path().join(".trex/CRC.txt"), "drop");
        write(tmp.path().join("artifacts_readme.txt"), "drop");

        let removed = remove_debug_files(tmp.path()).unwrap();

        assert_eq!(removed, 4);
        assert!(tmp.path().join("runtime.dll").exists());
        assert!(!tmp.path().join("runtime.pdb").exists());
        assert!(!tmp.path().join(".trex/d3d9.pdb").exists());
        assert!(!tmp.path().join(".trex/CRC.txt").exists());
        assert!(!tmp.path().join("artifacts_readme.txt").exists());
    }
}
