use async_trait::async_trait;
use std::path::Path;

use kinopick_core::ports::{FileScanner, ScanError, ScannedFile};

use crate::config::ScanConfig;
use crate::fs_scanner::{FsScannedFile, ScannerError, scan_media_with_cfg};

/// `FileScanner` implementation over the local filesystem.
#[derive(Debug, Clone)]
pub struct WalkScanner {
  cfg: ScanConfig,
}

impl WalkScanner {
  pub fn new(cfg: ScanConfig) -> Self {
    Self { cfg }
  }

  /// Scanner configured from the `[scanner]` section of `kinopick.toml`.
  pub fn from_config() -> Result<Self, kinopick_config::ConfigError> {
    Ok(Self::new(ScanConfig::load()?))
  }
}

impl Default for WalkScanner {
  fn default() -> Self {
    Self::new(ScanConfig::default())
  }
}

#[async_trait]
impl FileScanner for WalkScanner {
  async fn scan_media_files(&self, root: &Path) -> Result<Vec<ScannedFile>, ScanError> {
    let files = scan_media_with_cfg(root, &self.cfg).await.map_err(map_scanner_error)?;

    // Infra DTO -> domain DTO.
    let mapped = files
      .into_iter()
      .map(|f: FsScannedFile| ScannedFile {
        path: f.path,
        size_bytes: f.size,
        modified_unix: f.modified,
      })
      .collect();

    Ok(mapped)
  }
}

fn map_scanner_error(err: ScannerError) -> ScanError {
  match err {
    ScannerError::NotADirectory(p) => ScanError::NotADirectory(p),
    ScannerError::Root { path, source } => ScanError::Io(format!("{}: {source}", path.display())),
    ScannerError::Io(e) => ScanError::Io(e.to_string()),
    ScannerError::Config(e) => ScanError::Internal(e.to_string()),
  }
}
