use async_trait::async_trait;
use std::path::Path;

use kinopick_core::ports::ScanReporter;

/// `ScanReporter` that forwards scan progress to the log.
///
/// Tables and artifacts go to stdout and files; progress and skips belong
/// on the diagnostic channel so `RUST_LOG` can silence them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
  pub fn new() -> Self {
    Self
  }
}

#[async_trait]
impl ScanReporter for ConsoleReporter {
  async fn started(&self, total_files: usize) {
    tracing::info!(files = total_files, "scan started");
  }

  async fn file_indexed(&self, title: &str, path: &Path, files_in_group: usize) {
    tracing::info!(title, path = %path.display(), files = files_in_group, "indexed");
  }

  async fn file_skipped(&self, path: &Path, error: &str) {
    tracing::warn!(path = %path.display(), error, "file skipped");
  }

  async fn finished(&self, titles: usize) {
    tracing::info!(titles, "scan finished");
  }
}
