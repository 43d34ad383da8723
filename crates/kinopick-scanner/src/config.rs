use kinopick_config::{CONFIG_BACKEND, ConfigBackend, ConfigError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScanConfig {
  /// Extensions treated as movie files. Matched case-insensitively, so
  /// `movie.MP4` counts as much as `movie.mp4`.
  #[serde(default = "default_media_exts")]
  pub media_exts: Vec<String>,

  /// Skip hidden files and directories.
  #[serde(default = "default_ignore_hidden")]
  pub ignore_hidden: bool,

  /// Optional traversal depth limit.
  pub max_depth: Option<u32>,
}

fn default_media_exts() -> Vec<String> {
  vec!["mp4".into(), "mkv".into(), "avi".into(), "m4v".into()]
}

fn default_ignore_hidden() -> bool {
  true
}

impl Default for ScanConfig {
  fn default() -> Self {
    ScanConfig {
      media_exts: default_media_exts(),
      ignore_hidden: default_ignore_hidden(),
      max_depth: None,
    }
  }
}

impl ScanConfig {
  /// Loads the `[scanner]` section, writing the effective values back so
  /// the config file documents itself.
  pub fn load() -> Result<Self, ConfigError> {
    let cfg = CONFIG_BACKEND.load_section_with_default("scanner")?;
    CONFIG_BACKEND.save_section("scanner", &cfg)?;
    Ok(cfg)
  }

  pub fn save(&self) -> Result<(), ConfigError> {
    CONFIG_BACKEND.save_section("scanner", self)
  }
}
