use std::path::Path;

use crate::domain::MediaRecord;

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
  #[error("io error: {0}")]
  Io(String),

  #[error("unsupported format: {0}")]
  Unsupported(String),

  #[error("corrupt stream data: {0}")]
  Corrupt(String),

  #[error("internal error: {0}")]
  Internal(String),
}

/// Port that abstracts per-file metadata extraction.
///
/// The core only needs audio language tags and video bit rates; how the
/// adapter obtains them (FFmpeg, MediaInfo, …) is its own business. A
/// failure here is recoverable: the caller skips the file and moves on.
#[async_trait::async_trait]
pub trait MediaProbe: Send + Sync {
  async fn probe(&self, path: &Path) -> Result<MediaRecord, ProbeError>;
}
