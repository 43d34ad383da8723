mod backend;
mod paths;

pub use backend::{ConfigBackend, TomlConfigBackend};
pub use paths::{ConfigError, KinopickPaths};

use once_cell::sync::Lazy;

// Singleton for platform paths (respects KINOPICK_BASE_DIR).
pub static PATHS: Lazy<KinopickPaths> =
  Lazy::new(|| KinopickPaths::detect().expect("failed to init KinopickPaths"));

// Singleton for the config backend.
pub static CONFIG_BACKEND: Lazy<TomlConfigBackend> =
  Lazy::new(|| TomlConfigBackend::new(PATHS.clone()));
