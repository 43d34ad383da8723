use std::path::Path;

use crate::domain::{FileEntry, TitleIndex, Winner};
use crate::errors::CoreError;
use crate::ports::{FileScanner, MediaProbe, ScanReporter};
use crate::selection::{self, SelectionPolicy};

/// Orchestrates the pipeline: scan → probe → group → select.
///
/// Generic over its three ports so the CLI can inject the real adapters
/// and tests can inject in-memory stubs.
pub struct PickService<S, M, R>
where
  S: FileScanner,
  M: MediaProbe,
  R: ScanReporter,
{
  scanner: S,
  probe: M,
  reporter: R,
}

impl<S, M, R> PickService<S, M, R>
where
  S: FileScanner,
  M: MediaProbe,
  R: ScanReporter,
{
  pub fn new(scanner: S, probe: M, reporter: R) -> Self {
    Self { scanner, probe, reporter }
  }

  /// Builds the title index for `root`:
  /// - walks the tree (fatal if the root itself is missing or unreadable),
  /// - probes every media file, skipping the ones the probe rejects,
  /// - groups each `(path, record)` under the name of its parent directory.
  pub async fn build_index(&self, root: &Path) -> Result<TitleIndex, CoreError> {
    let files =
      self.scanner.scan_media_files(root).await.map_err(|e| CoreError::Scan(e.to_string()))?;

    self.reporter.started(files.len()).await;

    let mut index = TitleIndex::new();

    for scanned in files {
      let Some(title) = title_of(&scanned.path) else {
        tracing::warn!(path = %scanned.path.display(), "no parent directory name, file skipped");
        continue;
      };

      let record = match self.probe.probe(&scanned.path).await {
        Ok(record) => record,
        Err(e) => {
          // Per-file failures never abort the batch.
          tracing::warn!(path = %scanned.path.display(), error = %e, "probe failed, file skipped");
          self.reporter.file_skipped(&scanned.path, &e.to_string()).await;
          continue;
        }
      };

      let entry = FileEntry { path: scanned.path.clone(), record };
      let files_in_group = index.insert(&title, entry);
      self.reporter.file_indexed(&title, &scanned.path, files_in_group).await;
    }

    self.reporter.finished(index.len()).await;

    Ok(index)
  }

  /// Full pipeline: the index plus one winner per title.
  ///
  /// An empty index is a valid outcome (no recognized media under the
  /// root) and yields an empty winners list.
  pub async fn run(
    &self,
    root: &Path,
    policy: &SelectionPolicy,
  ) -> Result<(TitleIndex, Vec<Winner>), CoreError> {
    let index = self.build_index(root).await?;
    let winners = selection::select_winners(&index, policy);
    Ok((index, winners))
  }
}

/// Grouping key: the name of the file's immediate parent directory, not
/// any ancestor above it.
fn title_of(path: &Path) -> Option<String> {
  path.parent().and_then(|dir| dir.file_name()).map(|name| name.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AudioTrack, MediaRecord, VideoTrack};
  use crate::ports::{NullReporter, ProbeError, ScanError, ScannedFile};
  use std::collections::HashMap;
  use std::path::PathBuf;
  use std::sync::Mutex;

  struct StubScanner {
    result: Result<Vec<&'static str>, ScanError>,
  }

  #[async_trait::async_trait]
  impl FileScanner for StubScanner {
    async fn scan_media_files(&self, _root: &Path) -> Result<Vec<ScannedFile>, ScanError> {
      match &self.result {
        Ok(paths) => Ok(
          paths
            .iter()
            .map(|p| ScannedFile { path: PathBuf::from(p), size_bytes: 1, modified_unix: 0 })
            .collect(),
        ),
        Err(ScanError::NotADirectory(p)) => Err(ScanError::NotADirectory(p.clone())),
        Err(ScanError::Io(e)) => Err(ScanError::Io(e.clone())),
        Err(ScanError::Internal(e)) => Err(ScanError::Internal(e.clone())),
      }
    }
  }

  /// Probe backed by a path → record map; unknown paths fail as corrupt.
  struct StubProbe {
    records: HashMap<PathBuf, MediaRecord>,
  }

  impl StubProbe {
    fn new(entries: &[(&str, &[&str], Option<u64>)]) -> Self {
      let records = entries
        .iter()
        .map(|(path, langs, bitrate)| {
          let audio_tracks = langs
            .iter()
            .map(|l| AudioTrack { language: Some((*l).to_owned()), codec: None })
            .collect();
          let video_tracks = bitrate
            .map(|b| vec![VideoTrack { max_bit_rate: b, width: 1920, height: 1080, codec: None }])
            .unwrap_or_default();
          (PathBuf::from(path), MediaRecord { audio_tracks, video_tracks })
        })
        .collect();
      Self { records }
    }
  }

  #[async_trait::async_trait]
  impl MediaProbe for StubProbe {
    async fn probe(&self, path: &Path) -> Result<MediaRecord, ProbeError> {
      self
        .records
        .get(path)
        .cloned()
        .ok_or_else(|| ProbeError::Corrupt(format!("no moov atom in {}", path.display())))
    }
  }

  #[derive(Default)]
  struct RecordingReporter {
    events: Mutex<Vec<String>>,
  }

  #[async_trait::async_trait]
  impl ScanReporter for RecordingReporter {
    async fn started(&self, total_files: usize) {
      self.events.lock().unwrap().push(format!("started:{total_files}"));
    }
    async fn file_indexed(&self, title: &str, _path: &Path, files_in_group: usize) {
      self.events.lock().unwrap().push(format!("indexed:{title}:{files_in_group}"));
    }
    async fn file_skipped(&self, path: &Path, _error: &str) {
      self.events.lock().unwrap().push(format!("skipped:{}", path.display()));
    }
    async fn finished(&self, titles: usize) {
      self.events.lock().unwrap().push(format!("finished:{titles}"));
    }
  }

  #[tokio::test]
  async fn groups_files_by_parent_directory_name() {
    let scanner = StubScanner {
      result: Ok(vec!["/m/Dune/a.mkv", "/m/Inception/a.mkv", "/m/Dune/b.mkv"]),
    };
    let probe = StubProbe::new(&[
      ("/m/Dune/a.mkv", &["eng"], Some(8_000)),
      ("/m/Inception/a.mkv", &["deu"], Some(3_000)),
      ("/m/Dune/b.mkv", &["fra"], Some(9_000)),
    ]);

    let service = PickService::new(scanner, probe, NullReporter);
    let index = service.build_index(Path::new("/m")).await.unwrap();

    assert_eq!(index.len(), 2);
    assert_eq!(index.get("Dune").unwrap().entries.len(), 2);
    assert_eq!(index.get("Inception").unwrap().entries.len(), 1);
  }

  #[tokio::test]
  async fn probe_failure_skips_only_that_file() {
    let scanner = StubScanner { result: Ok(vec!["/m/Dune/bad.mkv", "/m/Dune/good.mkv"]) };
    // Only the good file has a record; the other fails as corrupt.
    let probe = StubProbe::new(&[("/m/Dune/good.mkv", &["deu"], Some(5_000))]);
    let reporter = RecordingReporter::default();

    let service = PickService::new(scanner, probe, reporter);
    let index = service.build_index(Path::new("/m")).await.unwrap();

    let group = index.get("Dune").unwrap();
    assert_eq!(group.entries.len(), 1);
    assert_eq!(group.entries[0].path, PathBuf::from("/m/Dune/good.mkv"));

    let events = service.reporter.events.lock().unwrap().clone();
    assert_eq!(
      events,
      vec!["started:2", "skipped:/m/Dune/bad.mkv", "indexed:Dune:1", "finished:1"]
    );
  }

  #[tokio::test]
  async fn unreadable_root_is_fatal_and_names_the_path() {
    let scanner =
      StubScanner { result: Err(ScanError::NotADirectory(PathBuf::from("/no/such/dir"))) };
    let probe = StubProbe::new(&[]);

    let service = PickService::new(scanner, probe, NullReporter);
    let err = service.build_index(Path::new("/no/such/dir")).await.unwrap_err();

    match err {
      CoreError::Scan(msg) => assert!(msg.contains("/no/such/dir")),
      other => panic!("unexpected error: {other}"),
    }
  }

  #[tokio::test]
  async fn empty_scan_is_a_valid_empty_result() {
    let scanner = StubScanner { result: Ok(vec![]) };
    let probe = StubProbe::new(&[]);

    let service = PickService::new(scanner, probe, NullReporter);
    let (index, winners) =
      service.run(Path::new("/m"), &SelectionPolicy::german()).await.unwrap();

    assert!(index.is_empty());
    assert!(winners.is_empty());
  }

  #[tokio::test]
  async fn full_run_is_idempotent_for_a_fixed_traversal_order() {
    let paths = vec!["/m/Dune/a.mkv", "/m/Dune/b.mkv", "/m/Nope/a.mp4"];
    let records: &[(&str, &[&str], Option<u64>)] = &[
      ("/m/Dune/a.mkv", &["eng"], Some(8_000)),
      ("/m/Dune/b.mkv", &["fra"], Some(9_000)),
      ("/m/Nope/a.mp4", &["eng"], None),
    ];
    let policy = SelectionPolicy::german();

    let first = PickService::new(
      StubScanner { result: Ok(paths.clone()) },
      StubProbe::new(records),
      NullReporter,
    )
    .run(Path::new("/m"), &policy)
    .await
    .unwrap()
    .1;

    let second = PickService::new(
      StubScanner { result: Ok(paths) },
      StubProbe::new(records),
      NullReporter,
    )
    .run(Path::new("/m"), &policy)
    .await
    .unwrap()
    .1;

    assert_eq!(first, second);
  }

  #[test]
  fn title_is_the_immediate_parent_directory() {
    assert_eq!(title_of(Path::new("/m/collection/Dune/a.mkv")).as_deref(), Some("Dune"));
    assert_eq!(title_of(Path::new("Dune/a.mkv")).as_deref(), Some("Dune"));
    // Bare file names and files at the filesystem root have no usable parent.
    assert_eq!(title_of(Path::new("a.mkv")), None);
    assert_eq!(title_of(Path::new("/a.mkv")), None);
  }
}
