use std::path::{Path, PathBuf};

/// Basic information about a media file found during traversal.
///
/// Size and mtime are not part of the selection policy; they ride along
/// for diagnostics and future change detection.
#[derive(Debug, Clone)]
pub struct ScannedFile {
  pub path: PathBuf,
  pub size_bytes: u64,
  pub modified_unix: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
  #[error("not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  #[error("io error: {0}")]
  Io(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Port for the filesystem traversal collaborator.
///
/// An error from `scan_media_files` is fatal for the whole run: it means
/// the scan root itself is missing or unreadable. Failures below the root
/// are the adapter's to log and skip, so the returned list is whatever
/// was reachable, in traversal order.
#[async_trait::async_trait]
pub trait FileScanner: Send + Sync {
  async fn scan_media_files(&self, root: &Path) -> Result<Vec<ScannedFile>, ScanError>;
}
