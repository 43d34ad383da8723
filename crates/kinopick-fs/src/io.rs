use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes `contents` to `path` through a sibling `.tmp` file and a rename,
/// so readers never observe a half-written artifact.
pub fn atomic_write_str(path: &Path, contents: &str) -> io::Result<()> {
  let tmp_path = path.with_extension("tmp");

  {
    let mut tmp_file = fs::File::create(&tmp_path)?;
    tmp_file.write_all(contents.as_bytes())?;
    tmp_file.sync_all()?;
  }

  fs::rename(&tmp_path, path)?;
  Ok(())
}
