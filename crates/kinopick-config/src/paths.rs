use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
  #[error("toml error: {0}")]
  Toml(#[from] toml::de::Error),
  #[error("directories error: could not determine home directory")]
  Directories,
  #[error("other: {0}")]
  Other(String),
}

/// Location of `kinopick.toml`.
///
/// kinopick keeps all of its state in that one file, so this type tracks a
/// single directory. `KINOPICK_BASE_DIR` pins it to a fixed path, which is
/// what portable installs use; otherwise the platform config directory
/// applies.
#[derive(Debug, Clone)]
pub struct KinopickPaths {
  config_dir: PathBuf,
}

impl KinopickPaths {
  pub fn detect() -> Result<Self, ConfigError> {
    let config_dir = match std::env::var("KINOPICK_BASE_DIR") {
      Ok(base) => PathBuf::from(base),
      Err(_) => ProjectDirs::from("dev", "kinopick", "kinopick")
        .ok_or(ConfigError::Directories)?
        .config_dir()
        .to_path_buf(),
    };

    Self::at(config_dir)
  }

  /// Paths rooted at an explicit directory, created if needed.
  pub fn at(config_dir: impl Into<PathBuf>) -> Result<Self, ConfigError> {
    let config_dir = config_dir.into();
    std::fs::create_dir_all(&config_dir)?;
    Ok(Self { config_dir })
  }

  pub fn config_dir(&self) -> &Path {
    &self.config_dir
  }

  pub fn config_file(&self) -> PathBuf {
    self.config_dir.join("kinopick.toml")
  }
}
