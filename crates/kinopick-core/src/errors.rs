use thiserror::Error;

/// Top-level error of the kinopick core.
///
/// Outer layers (CLI, tests) map this to exit codes or log lines. Only the
/// scan path is fatal; probe failures are handled per file and never reach
/// this type.
#[derive(Debug, Error)]
pub enum CoreError {
  #[error("scan error: {0}")]
  Scan(String),

  #[error("internal error: {0}")]
  Internal(String),
}
