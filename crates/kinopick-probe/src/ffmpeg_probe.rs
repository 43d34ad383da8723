use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ffmpeg_next as ffmpeg;

use kinopick_core::domain::{AudioTrack, MediaRecord, VideoTrack};
use kinopick_core::ports::{MediaProbe, ProbeError};

/// `MediaProbe` implementation backed by FFmpeg's demuxers.
///
/// Only container-level metadata is read; no packet is ever decoded, so a
/// probe is a header parse and cheap even on large files.
#[derive(Clone)]
pub struct FfmpegProbe;

impl FfmpegProbe {
  pub fn new() -> Self {
    if let Err(e) = ffmpeg::init() {
      tracing::warn!(error = %e, "ffmpeg init failed, probes will error");
    }
    Self
  }
}

impl Default for FfmpegProbe {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl MediaProbe for FfmpegProbe {
  async fn probe(&self, path: &Path) -> Result<MediaRecord, ProbeError> {
    let path_buf = PathBuf::from(path);

    // FFmpeg does blocking I/O; keep it off the async executor.
    tokio::task::spawn_blocking(move || probe_sync(&path_buf))
      .await
      .map_err(|e| ProbeError::Internal(format!("join error: {e}")))?
  }
}

fn probe_sync(path: &Path) -> Result<MediaRecord, ProbeError> {
  let context = ffmpeg::format::input(&path).map_err(|e| map_open_error(path, e))?;

  // Container-level rate, the fallback of last resort for video streams
  // whose parameters carry no rate of their own.
  let container_bit_rate = context.bit_rate().max(0) as u64;

  let mut record = MediaRecord::default();

  for stream in context.streams() {
    let params = stream.parameters();

    match params.medium() {
      ffmpeg::media::Type::Audio => {
        record.audio_tracks.push(AudioTrack {
          language: stream_language(&stream),
          codec: codec_name(params.id()),
        });
      }
      ffmpeg::media::Type::Video => {
        let (width, height, param_bit_rate) = unsafe {
          let p = params.as_ptr();
          ((*p).width.max(0) as u32, (*p).height.max(0) as u32, (*p).bit_rate.max(0) as u64)
        };

        // Matroska rarely fills codecpar.bit_rate; muxer statistics tags
        // (BPS) are the next best source.
        let max_bit_rate = if param_bit_rate > 0 {
          param_bit_rate
        } else {
          stream_bps_tag(&stream).unwrap_or(container_bit_rate)
        };

        record.video_tracks.push(VideoTrack {
          max_bit_rate,
          width,
          height,
          codec: codec_name(params.id()),
        });
      }
      _ => {}
    }
  }

  tracing::debug!(
    path = %path.display(),
    audio = record.audio_tracks.len(),
    video = record.video_tracks.len(),
    "probed file"
  );

  Ok(record)
}

fn map_open_error(path: &Path, e: ffmpeg::Error) -> ProbeError {
  match e {
    ffmpeg::Error::InvalidData => {
      ProbeError::Unsupported(format!("{}: {e}", path.display()))
    }
    other => ProbeError::Io(format!("{}: {other}", path.display())),
  }
}

fn stream_language(stream: &ffmpeg::Stream) -> Option<String> {
  stream.metadata().get("language").map(|s| s.to_string())
}

fn stream_bps_tag(stream: &ffmpeg::Stream) -> Option<u64> {
  let meta = stream.metadata();
  meta.get("BPS").or_else(|| meta.get("BPS-eng")).and_then(parse_bps)
}

fn parse_bps(raw: &str) -> Option<u64> {
  raw.trim().parse().ok()
}

fn codec_name(id: ffmpeg::codec::Id) -> Option<String> {
  match id {
    ffmpeg::codec::Id::None => None,
    other => Some(format!("{other:?}").to_ascii_lowercase()),
  }
}
