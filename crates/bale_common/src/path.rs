//! Path normalization for OS-independent cache keys.
//!
//! Asset ids derived from file paths must be byte-identical regardless of
//! the operating system that produced them, so path separators are always
//! normalized to `/` before a path participates in an identity string.

use std::path::Path;

/// Renders a path with all separators normalized to `/`.
///
/// Windows `\` separators (and mixed forms) collapse to the single
/// canonical separator so the same project produces the same cache keys
/// on every platform.
pub fn normalize_separators(path: &Path) -> String {
    let raw = path.to_string_lossy();
    if raw.contains('\\') {
        raw.replace('\\', "/")
    } else {
        raw.into_owned()
    }
}

/// Returns `path` relative to `root`, normalized with `/` separators.
///
/// If `path` is not inside `root`, the path is returned as-is (normalized).
/// Identity derivation only calls this with project-rooted paths; the
/// fallback keeps out-of-root paths stable rather than erroring.
pub fn relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => normalize_separators(rel),
        Err(_) => normalize_separators(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn forward_slashes_unchanged() {
        let p = PathBuf::from("src/pages/index.js");
        assert_eq!(normalize_separators(&p), "src/pages/index.js");
    }

    #[test]
    fn backslashes_normalized() {
        let p = PathBuf::from(r"src\pages\index.js");
        assert_eq!(normalize_separators(&p), "src/pages/index.js");
    }

    #[test]
    fn relative_inside_root() {
        let root = PathBuf::from("/project");
        let p = PathBuf::from("/project/src/a.js");
        assert_eq!(relative_path(&root, &p), "src/a.js");
    }

    #[test]
    fn relative_outside_root_falls_back() {
        let root = PathBuf::from("/project");
        let p = PathBuf::from("/elsewhere/lib.js");
        assert_eq!(relative_path(&root, &p), "/elsewhere/lib.js");
    }

    #[test]
    fn same_input_same_output() {
        let root = PathBuf::from("/project");
        let p = PathBuf::from("/project/src/a.js");
        assert_eq!(relative_path(&root, &p), relative_path(&root, &p));
    }
}
