//! Two-stage winner selection: preferred audio language first, peak video
//! bit rate second.

use std::collections::HashSet;

use crate::domain::{FileEntry, TitleGroup, TitleIndex, Winner};

const GERMAN_TAGS: &[&str] = &["ger", "deu", "de", "de_de", "de-de", "german", "deutsch"];

/// Accepted audio language tags, stored normalized (trimmed, lowercase).
///
/// Matching is case-insensitive: tags seen in the wild range from ISO 639
/// codes (`ger`, `deu`, `de`) over locale forms (`de_DE`, `de-DE`) to full
/// words (`German`, `Deutsch`), with no consistent casing.
#[derive(Debug, Clone)]
pub struct SelectionPolicy {
  languages: HashSet<String>,
}

impl Default for SelectionPolicy {
  fn default() -> Self {
    Self::german()
  }
}

impl SelectionPolicy {
  /// The built-in policy: prefer files with a German audio track.
  pub fn german() -> Self {
    Self::with_languages(GERMAN_TAGS.iter().copied())
  }

  /// Policy accepting the given language tags (normalized on the way in).
  pub fn with_languages<I, S>(tags: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let languages = tags.into_iter().map(|t| normalize_tag(t.as_ref())).collect();
    Self { languages }
  }

  /// Whether a raw track language tag belongs to the accepted set.
  pub fn matches(&self, tag: &str) -> bool {
    self.languages.contains(&normalize_tag(tag))
  }

  /// Whether `entry` carries at least one accepted audio track.
  pub fn qualifies(&self, entry: &FileEntry) -> bool {
    entry.record.audio_languages().any(|lang| self.matches(lang))
  }
}

fn normalize_tag(tag: &str) -> String {
  tag.trim().to_lowercase()
}

/// Picks the winning entry of one group, or `None` for an empty group.
///
/// Stage 1 narrows the group to entries with an accepted audio language,
/// keeping group order. Stage 2 takes the entry with the strictly highest
/// peak video bit rate over the stage-1 candidates, or over the whole
/// group when nothing qualified. Replacement uses strict `>`, so equal bit
/// rates keep the earlier entry and the result is stable for a fixed
/// group order.
///
/// The index only ever produces groups with at least one member, but the
/// group type is open for construction, so emptiness is handled here
/// rather than assumed.
pub fn select_winner<'a>(group: &'a TitleGroup, policy: &SelectionPolicy) -> Option<&'a FileEntry> {
  let qualifying: Vec<&FileEntry> = group.entries.iter().filter(|e| policy.qualifies(e)).collect();

  let candidates: Vec<&FileEntry> =
    if qualifying.is_empty() { group.entries.iter().collect() } else { qualifying };

  let mut candidates = candidates.into_iter();
  let mut best = candidates.next()?;
  for entry in candidates {
    if entry.record.peak_video_bitrate() > best.record.peak_video_bitrate() {
      best = entry;
    }
  }
  Some(best)
}

/// One winner per group, in index order. Every index-built group has at
/// least one member, so this yields exactly one winner per group.
pub fn select_winners(index: &TitleIndex, policy: &SelectionPolicy) -> Vec<Winner> {
  index
    .groups()
    .iter()
    .filter_map(|group| {
      let entry = select_winner(group, policy)?;
      Some(Winner {
        title: group.title.clone(),
        path: entry.path.clone(),
        bitrate: entry.record.peak_video_bitrate(),
      })
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{AudioTrack, MediaRecord, VideoTrack};
  use std::path::PathBuf;

  fn entry(path: &str, languages: &[&str], bitrate: Option<u64>) -> FileEntry {
    let audio_tracks = languages
      .iter()
      .map(|l| AudioTrack { language: Some((*l).to_owned()), codec: None })
      .collect();

    let video_tracks = bitrate
      .map(|max_bit_rate| vec![VideoTrack { max_bit_rate, width: 1920, height: 1080, codec: None }])
      .unwrap_or_default();

    FileEntry { path: PathBuf::from(path), record: MediaRecord { audio_tracks, video_tracks } }
  }

  fn group(title: &str, entries: Vec<FileEntry>) -> TitleGroup {
    TitleGroup { title: title.to_owned(), entries }
  }

  #[test]
  fn german_audio_beats_higher_bitrate() {
    let g = group(
      "Inception",
      vec![
        entry("/m/Inception/a.mkv", &["eng"], Some(5_000)),
        entry("/m/Inception/b.mkv", &["deu"], Some(3_000)),
      ],
    );

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Inception/b.mkv"));
  }

  #[test]
  fn highest_bitrate_wins_without_german_candidate() {
    let g = group(
      "Dune",
      vec![
        entry("/m/Dune/a.mkv", &["eng"], Some(8_000)),
        entry("/m/Dune/b.mkv", &["fra"], Some(9_000)),
      ],
    );

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Dune/b.mkv"));
  }

  #[test]
  fn single_entry_without_video_tracks_wins_with_bitrate_zero() {
    let g = group("Nope", vec![entry("/m/Nope/a.mp4", &["eng"], None)]);

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Nope/a.mp4"));
    assert_eq!(winner.record.peak_video_bitrate(), 0);
  }

  #[test]
  fn winner_comes_only_from_qualifying_entries() {
    // The English file has by far the highest bitrate, but two German
    // candidates exist, so stage 2 only ranks those.
    let g = group(
      "Heat",
      vec![
        entry("/m/Heat/eng.mkv", &["eng"], Some(20_000)),
        entry("/m/Heat/de-low.mkv", &["de"], Some(2_000)),
        entry("/m/Heat/de-high.mkv", &["de"], Some(4_000)),
      ],
    );

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Heat/de-high.mkv"));
  }

  #[test]
  fn german_entry_without_video_tracks_still_beats_non_german() {
    let g = group(
      "Alien",
      vec![
        entry("/m/Alien/eng.mkv", &["eng"], Some(9_000)),
        entry("/m/Alien/deu.mkv", &["deu"], None),
      ],
    );

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Alien/deu.mkv"));
  }

  #[test]
  fn equal_bitrates_keep_the_earlier_entry() {
    let g = group(
      "Tenet",
      vec![
        entry("/m/Tenet/first.mkv", &["deu"], Some(5_000)),
        entry("/m/Tenet/second.mkv", &["deu"], Some(5_000)),
      ],
    );

    // Twice on the same group order: same winner both times.
    let policy = SelectionPolicy::german();
    let first = select_winner(&g, &policy).unwrap();
    let second = select_winner(&g, &policy).unwrap();
    assert_eq!(first.path, PathBuf::from("/m/Tenet/first.mkv"));
    assert_eq!(second.path, first.path);
  }

  #[test]
  fn language_matching_is_case_insensitive_and_trims() {
    let policy = SelectionPolicy::german();

    for tag in ["ger", "DEU", "de_DE", "de-DE", "German", "Deutsch", " deutsch "] {
      assert!(policy.matches(tag), "expected {tag:?} to match");
    }

    for tag in ["", "g", "eng", "dee", "nl"] {
      assert!(!policy.matches(tag), "expected {tag:?} not to match");
    }
  }

  #[test]
  fn multi_track_entry_qualifies_on_any_track() {
    let g = group(
      "Arrival",
      vec![
        entry("/m/Arrival/eng.mkv", &["eng"], Some(9_000)),
        entry("/m/Arrival/dual.mkv", &["eng", "deu"], Some(4_000)),
      ],
    );

    let winner = select_winner(&g, &SelectionPolicy::german()).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Arrival/dual.mkv"));
  }

  #[test]
  fn winners_carry_group_title_and_member_path() {
    let mut index = TitleIndex::new();
    index.insert("Dune", entry("/m/Dune/a.mkv", &["eng"], Some(8_000)));
    index.insert("Dune", entry("/m/Dune/b.mkv", &["fra"], Some(9_000)));
    index.insert("Nope", entry("/m/Nope/a.mp4", &["eng"], None));

    let winners = select_winners(&index, &SelectionPolicy::german());

    assert_eq!(winners.len(), 2);
    assert_eq!(winners[0].title, "Dune");
    assert_eq!(winners[0].path, PathBuf::from("/m/Dune/b.mkv"));
    assert_eq!(winners[0].bitrate, 9_000);
    assert_eq!(winners[1].title, "Nope");
    assert_eq!(winners[1].bitrate, 0);

    // Every winner path belongs to its own group.
    for winner in &winners {
      let group = index.get(&winner.title).unwrap();
      assert!(group.entries.iter().any(|e| e.path == winner.path));
    }
  }

  #[test]
  fn hand_built_empty_group_has_no_winner() {
    let g = group("Ghost", vec![]);
    assert!(select_winner(&g, &SelectionPolicy::german()).is_none());
  }

  #[test]
  fn custom_language_policy_is_honored() {
    let policy = SelectionPolicy::with_languages(["fra", "FR"]);
    let g = group(
      "Amelie",
      vec![
        entry("/m/Amelie/de.mkv", &["deu"], Some(9_000)),
        entry("/m/Amelie/fr.mkv", &["fra"], Some(2_000)),
      ],
    );

    let winner = select_winner(&g, &policy).unwrap();
    assert_eq!(winner.path, PathBuf::from("/m/Amelie/fr.mkv"));
    assert!(policy.matches("fr"));
  }
}
