use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Directory does not exist: {0}")]
    DirectoryNotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Failed to resolve directory '{0}': {1}")]
    InvalidRoot(String, String),

    #[error("Failed to read document '{0}': {1}")]
    ReadError(String, String),
}
