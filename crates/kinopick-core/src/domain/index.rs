use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::track::MediaRecord;

/// A file together with its probed metadata.
///
/// Owned by exactly one group; carries only its own record, never a
/// reference back to the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileEntry {
  pub path: PathBuf,
  pub record: MediaRecord,
}

/// All candidate files sharing one title.
///
/// Entries appear in filesystem traversal order. Groups are created on
/// first insertion, so a group is never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TitleGroup {
  pub title: String,
  pub entries: Vec<FileEntry>,
}

/// Index from movie title to its candidate files.
///
/// Built append-only during the scan, read-only afterwards. Titles keep
/// first-seen order so a full run is deterministic for a fixed traversal
/// order; the side table makes insertion O(1) amortized instead of a
/// linear scan per file.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TitleIndex {
  groups: Vec<TitleGroup>,
  #[serde(skip)]
  by_title: HashMap<String, usize>,
}

impl TitleIndex {
  pub fn new() -> Self {
    Self::default()
  }

  /// Appends `entry` to the group for `title`, creating the group on first
  /// sight of that title. Returns the number of files now in the group.
  pub fn insert(&mut self, title: &str, entry: FileEntry) -> usize {
    match self.by_title.get(title) {
      Some(&slot) => {
        let group = &mut self.groups[slot];
        group.entries.push(entry);
        group.entries.len()
      }
      None => {
        self.by_title.insert(title.to_owned(), self.groups.len());
        self.groups.push(TitleGroup { title: title.to_owned(), entries: vec![entry] });
        1
      }
    }
  }

  /// Groups in first-seen title order.
  pub fn groups(&self) -> &[TitleGroup] {
    &self.groups
  }

  pub fn get(&self, title: &str) -> Option<&TitleGroup> {
    self.by_title.get(title).map(|&slot| &self.groups[slot])
  }

  pub fn len(&self) -> usize {
    self.groups.len()
  }

  pub fn is_empty(&self) -> bool {
    self.groups.is_empty()
  }
}

/// The single file selected to represent a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winner {
  pub title: String,
  pub path: PathBuf,

  /// Peak video bit rate of the winning file, kept for diagnostics.
  pub bitrate: u64,
}
