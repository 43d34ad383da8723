use crate::paths::{ConfigError, KinopickPaths};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;

// toml_edit on the write path keeps user comments intact.
use toml_edit::{DocumentMut, Item};

/// Per-section access to `kinopick.toml`. Each crate owns one section
/// (`[scanner]`, `[selection]`, …) and round-trips it through this trait.
pub trait ConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError>;
  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError>;
}

pub struct TomlConfigBackend {
  paths: KinopickPaths,
}

impl TomlConfigBackend {
  pub fn new(paths: KinopickPaths) -> Self {
    Self { paths }
  }

  /// Like `load_section`, but a missing file or missing section yields the
  /// type's `Default` instead of an error.
  pub fn load_section_with_default<T>(&self, section: &str) -> Result<T, ConfigError>
  where
    T: DeserializeOwned + Default,
  {
    use std::io::ErrorKind;

    let path = self.paths.config_file();
    let content = match fs::read_to_string(&path) {
      Ok(c) => c,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        return Ok(T::default());
      }
      Err(e) => return Err(e.into()),
    };

    let toml_val: toml::Value = toml::from_str(&content)?;

    let Some(table) = toml_val.get(section) else {
      return Ok(T::default());
    };

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }
}

impl ConfigBackend for TomlConfigBackend {
  fn load_section<T: DeserializeOwned>(&self, section: &str) -> Result<T, ConfigError> {
    let path = self.paths.config_file();
    let content = fs::read_to_string(&path)?;
    let toml_val: toml::Value = toml::from_str(&content)?;

    let table = toml_val
      .get(section)
      .ok_or_else(|| ConfigError::Other(format!("missing section [{section}] in {:?}", path)))?;

    let t: T = table
      .clone()
      .try_into()
      .map_err(|e| ConfigError::Other(format!("decode section [{section}]: {e}")))?;

    Ok(t)
  }

  fn save_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    use std::io::ErrorKind;

    let path = self.paths.config_file();

    // Parse the current file as an editable document, or start fresh.
    let mut doc: DocumentMut = match fs::read_to_string(&path) {
      Ok(content) => content
        .parse::<DocumentMut>()
        .map_err(|e| ConfigError::Other(format!("parse toml_edit doc: {e}")))?,
      Err(e) if e.kind() == ErrorKind::NotFound => DocumentMut::new(),
      Err(e) => return Err(e.into()),
    };

    // Serialize the section body with plain serde-toml.
    let section_str = toml::to_string(value)
      .map_err(|e| ConfigError::Other(format!("encode section [{section}]: {e}")))?;

    // `section_str` is a headerless table ("key = value" lines); reparse it
    // into a toml_edit item we can graft onto the root.
    let section_item: Item = section_str
      .parse::<DocumentMut>()
      .map_err(|e| ConfigError::Other(format!("parse section as doc: {e}")))?
      .into_item();

    doc[section] = section_item;

    // Atomic replace so a crash cannot truncate the user's config.
    kinopick_fs::atomic_write_str(&path, &doc.to_string())?;

    Ok(())
  }
}
