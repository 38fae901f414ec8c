//! Path utilities.
//!
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `direct_child_name` - name of a path sitting directly inside a directory

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// File name of `path` if it sits directly inside `dir`.
///
/// Returns `None` for paths in subdirectories, outside `dir`, or with a
/// non UTF-8 name. Only the parent is normalized, since the file itself
/// may already be gone (rename, atomic save).
pub fn direct_child_name(dir: &Path, path: &Path) -> Option<String> {
    let parent = path.parent()?;
    if normalize_path(parent) != normalize_path(dir) {
        return None;
    }
    path.file_name()?.to_str().map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let normalized = normalize_path(Path::new("/absolute/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let normalized = normalize_path(Path::new("relative/path/file.txt"));
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_direct_child_name() {
        let temp = tempfile::TempDir::new().unwrap();
        let root = temp.path();
        std::fs::create_dir(root.join("nested")).unwrap();

        assert_eq!(
            direct_child_name(root, &root.join("style.css")),
            Some("style.css".to_string())
        );
        assert_eq!(direct_child_name(root, &root.join("nested/a.css")), None);
        assert_eq!(direct_child_name(&root.join("nested"), &root.join("a.css")), None);
    }
}
