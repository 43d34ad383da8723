pub mod adapter;
pub mod config;
pub mod fs_scanner;

pub use adapter::WalkScanner;
pub use config::ScanConfig;
pub use fs_scanner::{FsScannedFile, ScannerError, scan_media_with_cfg};
