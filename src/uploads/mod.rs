// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Persists uploaded image blobs into the working directory.
//!
//! Files are keyed by the client-supplied filename, reduced to its final path
//! component so traversal sequences are not honored. There is no
//! deduplication: a recurring filename overwrites the previous blob, and
//! concurrent writes to the same name are last-write-wins.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Reduce a client-supplied filename to a bare file name.
///
/// Returns `None` for names with no usable final component (empty strings,
/// `.`/`..`, trailing separators).
pub fn sanitize_filename(name: &str) -> Option<String> {
    let name = Path::new(name).file_name()?.to_str()?;
    if name.is_empty() || name == "." || name == ".." {
        return None;
    }
    Some(name.to_string())
}

/// Write an uploaded blob under `dir`, creating the directory if absent.
///
/// Returns the resolved path of the stored file.
pub fn save_upload(dir: &Path, filename: &str, data: &[u8]) -> Result<PathBuf> {
    let safe_name =
        sanitize_filename(filename).ok_or_else(|| anyhow!("Unusable filename: {:?}", filename))?;

    if safe_name != filename {
        tracing::warn!(
            supplied = filename,
            stored = %safe_name,
            "upload filename reduced to its final component"
        );
    }

    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create upload directory {}", dir.display()))?;

    let path = dir.join(safe_name);
    // Last write wins on a recurring name.
    fs::write(&path, data)
        .with_context(|| format!("Failed to write upload to {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_filename("cat.jpg").as_deref(), Some("cat.jpg"));
    }

    #[test]
    fn test_sanitize_strips_traversal() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename("/absolute/path/img.png").as_deref(),
            Some("img.png")
        );
    }

    #[test]
    fn test_sanitize_rejects_unusable_names() {
        assert!(sanitize_filename("").is_none());
        assert!(sanitize_filename(".").is_none());
        assert!(sanitize_filename("..").is_none());
        assert!(sanitize_filename("dir/").is_none());
    }

    #[test]
    fn test_save_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let uploads = dir.path().join("uploads");

        let path = save_upload(&uploads, "cat.jpg", b"jpeg-bytes").unwrap();
        assert_eq!(path, uploads.join("cat.jpg"));
        assert_eq!(fs::read(&path).unwrap(), b"jpeg-bytes");
    }

    #[test]
    fn test_save_traversal_stays_in_dir() {
        let dir = tempdir().unwrap();
        let uploads = dir.path().join("uploads");

        let path = save_upload(&uploads, "../escape.jpg", b"data").unwrap();
        assert_eq!(path, uploads.join("escape.jpg"));
        assert!(path.starts_with(&uploads));
    }

    #[test]
    fn test_save_same_name_last_write_wins() {
        let dir = tempdir().unwrap();

        let first = save_upload(dir.path(), "img.png", b"first").unwrap();
        let second = save_upload(dir.path(), "img.png", b"second").unwrap();

        assert_eq!(first, second);
        assert_eq!(fs::read(&second).unwrap(), b"second");
    }

    #[test]
    fn test_save_unusable_name_fails() {
        let dir = tempdir().unwrap();
        assert!(save_upload(dir.path(), "..", b"data").is_err());
    }
}
