//! Recursive directory copy/move helpers shared by backup and restore

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::filter::ExclusionFilter;
use crate::error::{SiteError, SiteResult};

/// Recursively copy `src` into `dst`, optionally skipping excluded entries
///
/// Excluded directories are pruned whole; their contents are never visited.
pub(crate) fn copy_tree(
    src: &Path,
    dst: &Path,
    filter: Option<&ExclusionFilter>,
) -> SiteResult<()> {
    if !src.is_dir() {
        return Err(SiteError::Io(format!(
            "Not a directory: {}",
            src.display()
        )));
    }

    fs::create_dir_all(dst)
        .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", dst.display(), e)))?;

    let walker = WalkDir::new(src).min_depth(1).into_iter().filter_entry(|e| {
        filter.map_or(true, |f| !f.is_excluded_name(e.file_name()))
    });

    for entry in walker {
        let entry = entry?;
        let rel = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| SiteError::Io(format!("Path outside copy root: {}", e)))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", target.display(), e)))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| SiteError::Io(format!("Failed to create {}: {}", parent.display(), e)))?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                SiteError::Io(format!(
                    "Failed to copy {} to {}: {}",
                    entry.path().display(),
                    target.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}

/// Move a directory into place, falling back to copy+delete when a plain
/// rename is not possible (e.g. across filesystems)
pub(crate) fn move_tree(src: &Path, dst: &Path) -> SiteResult<()> {
    if fs::rename(src, dst).is_ok() {
        return Ok(());
    }

    copy_tree(src, dst, None)?;
    fs::remove_dir_all(src)
        .map_err(|e| SiteError::Io(format!("Failed to remove {}: {}", src.display(), e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_copy_tree_preserves_structure() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");

        write(&src.join("index.html"), "<html></html>");
        write(&src.join("css/style.css"), "body {}");

        copy_tree(&src, &dst, None).unwrap();

        assert_eq!(
            fs::read_to_string(dst.join("index.html")).unwrap(),
            "<html></html>"
        );
        assert_eq!(fs::read_to_string(dst.join("css/style.css")).unwrap(), "body {}");
    }

    #[test]
    fn test_copy_tree_applies_filter() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");

        write(&src.join("index.html"), "ok");
        write(&src.join(".git/HEAD"), "ref: refs/heads/main");
        write(&src.join("logs/run.log"), "old log");

        let filter = ExclusionFilter::default();
        copy_tree(&src, &dst, Some(&filter)).unwrap();

        assert!(dst.join("index.html").exists());
        assert!(!dst.join(".git").exists());
        assert!(!dst.join("logs").exists());
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let temp = TempDir::new().unwrap();
        let err = copy_tree(&temp.path().join("absent"), &temp.path().join("dst"), None)
            .unwrap_err();
        assert!(matches!(err, SiteError::Io(_)));
    }

    #[test]
    fn test_move_tree() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("src");
        let dst = temp.path().join("dst");

        write(&src.join("page.html"), "content");
        move_tree(&src, &dst).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read_to_string(dst.join("page.html")).unwrap(), "content");
    }
}
