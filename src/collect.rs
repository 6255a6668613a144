use std::path::{Path, PathBuf};

use tracing::{debug, error};

/// Extensions considered source code worth documenting.
pub const ALLOWED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "css", "scss", "html"];

/// Directory names that are never descended into (dependencies, build
/// output, version-control metadata).
pub const EXCLUDED_DIRS: &[&str] = &["node_modules", ".git", "dist", "build", "coverage"];

/// A file selected for analysis: absolute path plus the path relative to
/// the feature root, normalised to forward slashes for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub rel_path: String,
}

/// Recursively collects all files under `root` whose extension is in
/// [`ALLOWED_EXTENSIONS`], skipping any directory named in [`EXCLUDED_DIRS`].
///
/// Traversal order follows directory-listing order and is not stable across
/// platforms; callers must not rely on it. Filesystem errors are fatal and
/// propagate to the caller.
pub fn collect_files(root: &Path) -> Result<Vec<SourceFile>, std::io::Error> {
    let mut results = Vec::new();

    fn visit_dir(
        dir: &Path,
        root: &Path,
        results: &mut Vec<SourceFile>,
    ) -> Result<(), std::io::Error> {
        for entry_res in std::fs::read_dir(dir)? {
            let entry = entry_res?;
            let path = entry.path();
            if path.is_dir() {
                let dir_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                if EXCLUDED_DIRS.contains(&dir_name) {
                    debug!(path = %path.display(), "Skipping excluded directory");
                    continue;
                }
                visit_dir(&path, root, results)?;
            } else if path.is_file() {
                let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
                if !ALLOWED_EXTENSIONS.contains(&ext) {
                    continue;
                }
                let rel_path = match path.strip_prefix(root) {
                    Ok(rel) => rel
                        .components()
                        .map(|c| c.as_os_str().to_string_lossy().into_owned())
                        .collect::<Vec<_>>()
                        .join("/"),
                    Err(_) => path.to_string_lossy().into_owned(),
                };
                debug!(file = %rel_path, "Collected source file");
                results.push(SourceFile { path, rel_path });
            }
        }
        Ok(())
    }

    if let Err(e) = visit_dir(root, root, &mut results) {
        error!(error = ?e, root = %root.display(), "Error while collecting files");
        return Err(e);
    }

    Ok(results)
}
