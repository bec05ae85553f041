//! Content-hashed, atomic artifact writes.
//!
//! Every generated file (charts, export, README) goes through
//! [`write_artifact`]. Two rules:
//!
//! - **Unchanged content is not rewritten.** The SHA-256 of the new bytes is
//!   compared with the file on disk; on a match the file is left alone, so
//!   its mtime stays put and a scheduled job that commits the results sees no
//!   diff.
//! - **Writes are atomic.** Bytes go to a hidden sibling (`.name.tmp`) that is
//!   then renamed over the target. A crash mid-write leaves the old file
//!   intact and at worst a stray temp file.

use sha2::{Digest, Sha256};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Hex SHA-256 of a byte slice.
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Hex SHA-256 of a file's contents.
pub fn hash_file(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(content_hash(&bytes))
}

/// What [`write_artifact`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    Unchanged,
}

impl fmt::Display for WriteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStatus::Written => write!(f, "written"),
            WriteStatus::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// Write `bytes` to `path` unless the file already holds exactly them.
///
/// Creates missing parent directories.
pub fn write_artifact(path: &Path, bytes: &[u8]) -> io::Result<WriteStatus> {
    match hash_file(path) {
        Ok(existing) if existing == content_hash(bytes) => {
            tracing::debug!(path = %path.display(), "artifact unchanged");
            return Ok(WriteStatus::Unchanged);
        }
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tmp = temp_sibling(path);
    if let Err(e) = std::fs::write(&tmp, bytes).and_then(|()| std::fs::rename(&tmp, path)) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");
    Ok(WriteStatus::Written)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn content_hash_known_value() {
        assert_eq!(
            content_hash(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn hash_file_matches_content_hash() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a.bin");
        fs::write(&path, b"version 1").unwrap();
        assert_eq!(hash_file(&path).unwrap(), content_hash(b"version 1"));
    }

    #[test]
    fn writes_new_file_and_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("assets/nested/chart.svg");

        let status = write_artifact(&path, b"<svg/>").unwrap();

        assert_eq!(status, WriteStatus::Written);
        assert_eq!(fs::read(&path).unwrap(), b"<svg/>");
        assert!(!tmp.path().join("assets/nested/.chart.svg.tmp").exists());
    }

    #[test]
    fn identical_content_is_unchanged() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        write_artifact(&path, b"[]\n").unwrap();

        assert_eq!(write_artifact(&path, b"[]\n").unwrap(), WriteStatus::Unchanged);
    }

    #[test]
    fn different_content_replaces_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("out.json");
        fs::write(&path, b"old").unwrap();

        assert_eq!(write_artifact(&path, b"new").unwrap(), WriteStatus::Written);
        assert_eq!(fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        // target is a directory, so the rename fails
        let path = tmp.path().join("taken");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        assert!(write_artifact(&path, b"data").is_err());
        assert!(!tmp.path().join(".taken.tmp").exists());
        assert!(path.join("keep").exists());
    }
}
