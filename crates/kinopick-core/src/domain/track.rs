use serde::{Deserialize, Serialize};

/// One audio stream of a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioTrack {
  /// Language tag as stored in the container.
  ///
  /// Free-form: muxers write anything from ISO 639 codes (`ger`, `de`)
  /// over locale forms (`de_DE`) to full words (`Deutsch`), so consumers
  /// must normalize before comparing.
  pub language: Option<String>,

  /// Codec name, if the demuxer could identify it.
  pub codec: Option<String>,
}

/// One video stream of a media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTrack {
  /// Peak bit rate in bits per second. 0 when the container does not say.
  pub max_bit_rate: u64,

  pub width: u32,
  pub height: u32,

  /// Codec name, if the demuxer could identify it.
  pub codec: Option<String>,
}

/// Full technical metadata of one file, as returned by the probe.
///
/// Produced once per file and immutable afterwards. Track order follows
/// stream order in the container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
  pub audio_tracks: Vec<AudioTrack>,
  pub video_tracks: Vec<VideoTrack>,
}

impl MediaRecord {
  /// Highest peak bit rate across all video tracks.
  ///
  /// A file without video tracks competes with 0; it can still win its
  /// group when nothing beats it.
  pub fn peak_video_bitrate(&self) -> u64 {
    self.video_tracks.iter().map(|t| t.max_bit_rate).max().unwrap_or(0)
  }

  /// All non-empty audio language tags, in stream order.
  pub fn audio_languages(&self) -> impl Iterator<Item = &str> {
    self.audio_tracks.iter().filter_map(|t| t.language.as_deref()).filter(|s| !s.is_empty())
  }
}
