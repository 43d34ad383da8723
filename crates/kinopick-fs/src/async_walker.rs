//! Non-blocking recursive directory walk, driven as a [`Stream`].
//!
//! The walker keeps an explicit stack of frames instead of recursing, so
//! the whole traversal is one state machine inside `stream::unfold` and
//! never blocks the executor on deep trees.

use std::collections::HashSet;
use std::future::Future;
use std::io;
use std::path::PathBuf;

use futures::stream::{self, Stream};
use tokio::fs::{self, ReadDir};

/// Identity of a directory, used to break walk cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct DirId(u64, u64);

#[cfg(unix)]
fn dir_id(meta: &std::fs::Metadata) -> DirId {
  use std::os::unix::fs::MetadataExt;
  DirId(meta.dev(), meta.ino())
}

#[cfg(windows)]
fn dir_id(meta: &std::fs::Metadata) -> DirId {
  use std::os::windows::fs::MetadataExt;
  DirId(meta.volume_serial_number().unwrap_or(0) as u64, meta.file_index().unwrap_or(0))
}

#[cfg(not(any(unix, windows)))]
fn dir_id(_meta: &std::fs::Metadata) -> DirId {
  DirId(0, 0)
}

/// Limits for the traversal.
///
/// Symlinks are never followed: entry types come from `lstat`, so a link
/// into a parent directory cannot loop the walk.
#[derive(Debug, Clone)]
pub struct WalkConfig {
  pub max_depth: usize,

  /// Deduplicate visited directories (bind mounts, duplicated trees).
  pub dedup_dirs: bool,
}

impl Default for WalkConfig {
  fn default() -> Self {
    Self { max_depth: 64, dedup_dirs: true }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filtering {
  /// Skip this entry, but still descend if it is a directory.
  Ignore,
  /// Skip this entry and do not descend.
  IgnoreDir,
  /// Emit the entry and descend into directories.
  Continue,
}

#[derive(Debug)]
pub struct WalkEntry {
  pub path: PathBuf,
  pub depth: usize,

  /// File type via `lstat`: a symlink reports as a symlink.
  pub file_type: std::fs::FileType,
}

enum Frame {
  /// Directory we still have to open.
  Pending { path: PathBuf, depth: usize },
  /// Directory currently being read.
  Open { rd: ReadDir, depth: usize },
}

/// Walks `root` recursively without filtering.
pub fn walk(root: impl Into<PathBuf>, cfg: WalkConfig) -> impl Stream<Item = io::Result<WalkEntry>> {
  walk_filtered(root, cfg, |_| async { Filtering::Continue })
}

/// Walks `root` recursively with an async per-entry filter.
///
/// I/O errors below the root are yielded as stream items so the caller can
/// log them and keep going; they never terminate the stream. An unreadable
/// root surfaces the same way, as the first and only item.
pub fn walk_filtered<F, Fut>(
  root: impl Into<PathBuf>,
  cfg: WalkConfig,
  filter: F,
) -> impl Stream<Item = io::Result<WalkEntry>>
where
  F: FnMut(&WalkEntry) -> Fut + Send + 'static,
  Fut: Future<Output = Filtering> + Send,
{
  let mut stack = Vec::with_capacity(16);
  stack.push(Frame::Pending { path: root.into(), depth: 0 });

  let state = (stack, HashSet::new(), cfg, filter);

  stream::unfold(state, |(mut stack, mut visited, cfg, mut filter)| async move {
    loop {
      // An empty stack ends the stream.
      let top = stack.last_mut()?;

      match top {
        Frame::Pending { path, depth } => {
          let path = path.clone();
          let depth = *depth;
          stack.pop();

          if depth > cfg.max_depth {
            continue;
          }

          if cfg.dedup_dirs {
            match fs::metadata(&path).await {
              Ok(meta) => {
                if meta.is_dir() && !visited.insert(dir_id(&meta)) {
                  // Already walked through another path.
                  continue;
                }
              }
              Err(e) => return Some((Err(e), (stack, visited, cfg, filter))),
            }
          }

          match fs::read_dir(&path).await {
            Ok(rd) => stack.push(Frame::Open { rd, depth }),
            Err(e) => return Some((Err(e), (stack, visited, cfg, filter))),
          }
        }

        Frame::Open { rd, depth } => {
          let depth = *depth;

          match rd.next_entry().await {
            Ok(Some(entry)) => {
              let path = entry.path();

              let entry_depth = depth + 1;
              if entry_depth > cfg.max_depth {
                continue;
              }

              let file_type = match entry.file_type().await {
                Ok(ft) => ft,
                Err(e) => return Some((Err(e), (stack, visited, cfg, filter))),
              };
              let walk_entry = WalkEntry { path: path.clone(), depth: entry_depth, file_type };

              let filtering = filter(&walk_entry).await;

              let descend = filtering != Filtering::IgnoreDir && file_type.is_dir();
              if descend {
                stack.push(Frame::Pending { path, depth: entry_depth });
              }

              match filtering {
                Filtering::Continue => {
                  return Some((Ok(walk_entry), (stack, visited, cfg, filter)));
                }
                // Ignore / IgnoreDir: loop for the next entry.
                _ => continue,
              }
            }
            Ok(None) => {
              // Directory exhausted.
              stack.pop();
            }
            Err(e) => {
              stack.pop();
              return Some((Err(e), (stack, visited, cfg, filter)));
            }
          }
        }
      }
    }
  })
}
