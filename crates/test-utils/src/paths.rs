//! Helpers for writing test inputs to disk.

use std::io::Write;
use std::path::PathBuf;

use tempfile::{NamedTempFile, TempDir};

/// Returns the workspace root directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Write `content` to a named temp file with the given extension.
///
/// The file lives as long as the returned handle.
pub fn temp_file_with(content: &str, extension: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(&format!(".{}", extension))
        .tempfile()
        .expect("create temp file");
    file.write_all(content.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

/// Write several named files into a fresh temp directory.
pub fn temp_dir_with(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    for (name, content) in files {
        std::fs::write(dir.path().join(name), content).expect("write temp dir file");
    }
    dir
}
