use std::fs;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use futures::StreamExt;
use thiserror::Error;

use kinopick_fs::async_walker::{Filtering, WalkConfig, walk_filtered};

use crate::config::ScanConfig;

#[derive(Debug, Error)]
pub enum ScannerError {
  #[error("not a directory: {}", .0.display())]
  NotADirectory(PathBuf),

  #[error("cannot read {}: {source}", .path.display())]
  Root { path: PathBuf, source: std::io::Error },

  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  #[error("config error: {0}")]
  Config(#[from] kinopick_config::ConfigError),
}

/// Lightweight DTO for a media file found during scanning.
/// Minimal metadata is kept here to reduce memory footprint during large traversals.
#[derive(Debug, Clone)]
pub struct FsScannedFile {
  pub path: PathBuf,
  pub size: u64,
  pub modified: u64,
}

/// Checks whether a path carries one of the configured media extensions.
/// Comparisons are case-insensitive.
fn is_media(path: &Path, cfg: &ScanConfig) -> bool {
  let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
    return false;
  };

  cfg.media_exts.iter().any(|cfg_ext| cfg_ext.eq_ignore_ascii_case(ext))
}

/// Safely extracts size and modification time.
/// Returns default UNIX epoch on systems where modification time is unavailable.
fn file_metadata(path: &Path) -> Result<(u64, u64), ScannerError> {
  let meta = fs::metadata(path)?;
  let size = meta.len();

  let modified = meta.modified()?.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();

  Ok((size, modified))
}

/// Walks `root` and returns every media file below it, in traversal order.
///
/// The root itself must exist and be a directory; anything else fails
/// before the walk starts, naming the path. Errors below the root
/// (permission holes, files vanishing mid-scan) are logged and skipped so
/// one bad corner cannot abort the batch.
pub async fn scan_media_with_cfg(
  root: &Path,
  cfg: &ScanConfig,
) -> Result<Vec<FsScannedFile>, ScannerError> {
  let root_meta = fs::metadata(root)
    .map_err(|source| ScannerError::Root { path: root.to_path_buf(), source })?;
  if !root_meta.is_dir() {
    return Err(ScannerError::NotADirectory(root.to_path_buf()));
  }

  // An existing root can still be unreadable (permissions); probe it here
  // so the failure is fatal instead of a swallowed walker item.
  fs::read_dir(root).map_err(|source| ScannerError::Root { path: root.to_path_buf(), source })?;

  let walk_cfg =
    WalkConfig { max_depth: cfg.max_depth.unwrap_or(64) as usize, dedup_dirs: true };
  let ignore_hidden = cfg.ignore_hidden;

  let entries = walk_filtered(root.to_path_buf(), walk_cfg, move |entry| {
    let path = entry.path.clone();

    async move {
      // Hidden folders tend to be trash bins, sync caches and the like.
      if ignore_hidden {
        if let Some(name) = path.file_name() {
          if name.to_string_lossy().starts_with('.') {
            return Filtering::IgnoreDir;
          }
        }
      }

      // Partial downloads.
      if path.extension().is_some_and(|e| e == "tmp") {
        return Filtering::Ignore;
      }

      Filtering::Continue
    }
  });

  tokio::pin!(entries);

  let mut files = Vec::new();

  while let Some(res) = entries.next().await {
    let entry = match res {
      Ok(e) => e,
      Err(e) => {
        tracing::warn!(error = %e, "walker error, entry skipped");
        continue;
      }
    };

    let path = entry.path;

    if entry.file_type.is_file() && is_media(&path, cfg) {
      match file_metadata(&path) {
        Ok((size, modified)) => files.push(FsScannedFile { path, size, modified }),
        Err(e) => {
          tracing::warn!(path = %path.display(), error = %e, "metadata unreadable, file skipped");
        }
      }
    }
  }

  Ok(files)
}
