pub mod ffmpeg_probe;

pub use ffmpeg_probe::FfmpegProbe;
