//! Host collaborator.
//!
//! The session never touches export files directly. It asks a [`Host`] for a
//! destination and hands it text to append, one chunk per band.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{Result, StippleError};

/// Save-path prompt and append-only export sink.
pub trait Host {
    /// Ask for a destination. `None` means the user cancelled.
    fn request_save_path(&mut self) -> Option<PathBuf>;

    /// Reset any previous contents at `path` before the first chunk of a run.
    fn clear_file(&mut self, path: &Path) -> Result<()>;

    /// Append one chunk of export text to `path`.
    fn append_chunk(&mut self, path: &Path, text: &str) -> Result<()>;
}

/// Filesystem-backed host.
///
/// The save prompt is answered from a preset path, once. Each append opens,
/// writes and closes the file, so no handle outlives a chunk.
#[derive(Debug, Default, Clone)]
pub struct FileHost {
    pending: Option<PathBuf>,
}

impl FileHost {
    /// A host whose save prompt is always cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// A host that answers the next save prompt with `path`.
    pub fn with_save_path(path: impl Into<PathBuf>) -> Self {
        Self {
            pending: Some(path.into()),
        }
    }

    /// Queue an answer for the next save prompt.
    pub fn set_save_path(&mut self, path: impl Into<PathBuf>) {
        self.pending = Some(path.into());
    }
}

impl Host for FileHost {
    fn request_save_path(&mut self) -> Option<PathBuf> {
        self.pending.take()
    }

    fn clear_file(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StippleError::Io {
                path: parent.to_path_buf(),
                message: format!("Failed to create output directory: {}", e),
            })?;
        }

        fs::write(path, b"").map_err(|e| StippleError::Export {
            path: path.to_path_buf(),
            message: format!("Failed to truncate: {}", e),
        })
    }

    fn append_chunk(&mut self, path: &Path, text: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| StippleError::Export {
                path: path.to_path_buf(),
                message: format!("Failed to open for append: {}", e),
            })?;

        file.write_all(text.as_bytes())
            .map_err(|e| StippleError::Export {
                path: path.to_path_buf(),
                message: format!("Failed to append chunk: {}", e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_path_answered_once() {
        let mut host = FileHost::with_save_path("points.txt");
        assert_eq!(host.request_save_path(), Some(PathBuf::from("points.txt")));
        assert_eq!(host.request_save_path(), None);
    }

    #[test]
    fn test_default_host_cancels() {
        assert_eq!(FileHost::new().request_save_path(), None);
    }

    #[test]
    fn test_clear_then_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("points.txt");
        let mut host = FileHost::new();

        host.clear_file(&path).unwrap();
        host.append_chunk(&path, "1,00 2,00\n").unwrap();
        host.append_chunk(&path, "\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "1,00 2,00\n\n");

        host.clear_file(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_append_to_directory_fails() {
        let dir = tempdir().unwrap();
        let mut host = FileHost::new();
        let err = host.append_chunk(dir.path(), "x\n").unwrap_err();
        assert!(matches!(err, StippleError::Export { .. }));
    }
}
