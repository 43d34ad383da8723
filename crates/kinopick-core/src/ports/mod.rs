pub mod probe;
pub mod reporter;
pub mod scanner;

pub use probe::{MediaProbe, ProbeError};
pub use reporter::{NullReporter, ScanReporter};
pub use scanner::{FileScanner, ScanError, ScannedFile};
