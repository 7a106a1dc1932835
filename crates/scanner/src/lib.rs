mod models;
mod errors;
mod walk;
mod extract;
mod resolve;
mod report;
mod matcher;

pub use models::{ImageIndex, ImageMatch, ReferenceScanner, ScannedTree, UnusedImages};
pub use errors::ScanError;
pub use walk::{scan_directory, scan_directory_or_empty};
pub use extract::extract_references;
pub use resolve::{resolve_path, resolve_reference};
