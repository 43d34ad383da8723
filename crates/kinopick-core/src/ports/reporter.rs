use std::path::Path;

/// Diagnostic sink for scan progress.
///
/// Keeps the core free of printing: the CLI plugs in a console
/// implementation, tests plug in [`NullReporter`] or a recording stub.
#[async_trait::async_trait]
pub trait ScanReporter: Send + Sync {
  async fn started(&self, total_files: usize);
  async fn file_indexed(&self, title: &str, path: &Path, files_in_group: usize);
  async fn file_skipped(&self, path: &Path, error: &str);
  async fn finished(&self, titles: usize);
}

/// Reporter that swallows every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

#[async_trait::async_trait]
impl ScanReporter for NullReporter {
  async fn started(&self, _total_files: usize) {}
  async fn file_indexed(&self, _title: &str, _path: &Path, _files_in_group: usize) {}
  async fn file_skipped(&self, _path: &Path, _error: &str) {}
  async fn finished(&self, _titles: usize) {}
}
