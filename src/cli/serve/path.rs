//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

/// Browsers request this on every page; answered empty to keep logs quiet
const FAVICON: &str = "favicon.ico";

/// Document served for directory requests (and `/`)
const INDEX: &str = "index.html";

/// Where a request URL leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/favicon.ico`: empty 200 regardless of the file system
    Favicon,
    /// Existing file under the project root
    File(PathBuf),
    /// Nothing to serve
    NotFound,
}

impl Route {
    pub fn from_url(url: &str, root: &Path) -> Self {
        let Some(clean) = normalize_url(url) else {
            return Self::NotFound;
        };
        if clean == FAVICON {
            return Self::Favicon;
        }
        resolve_path(&clean, root).map_or(Self::NotFound, Self::File)
    }
}

/// Resolve a normalized URL to a file under `serve_root`.
///
/// Directories resolve to their `index.html`. Anything that escapes the
/// root, through `..` or a symlink, resolves to nothing.
fn resolve_path(clean: &str, serve_root: &Path) -> Option<PathBuf> {
    if clean.split('/').any(|seg| seg == "..") {
        return None;
    }

    let local = serve_root.join(clean);

    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join(INDEX);
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Normalize URL: strip query string and fragment, decode, trim slashes.
///
/// `None` if the decoded path is not valid UTF-8.
fn normalize_url(url: &str) -> Option<String> {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;

    Some(decoded.trim_matches('/').to_string())
}
