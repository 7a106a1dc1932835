use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("No path fix to undo in {0}")]
    NoFixBackup(String),

    #[error("Unreadable fix log {path}: {reason}")]
    InvalidFixLog { path: String, reason: String },

    #[error("File system error: {0}")]
    FileSystemError(String),

    #[error("Join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),

    #[error("Mapping error: {0}")]
    MappingError(#[from] mdimg_mapping::MappingError),

    #[error("Host error: {0}")]
    HostError(#[from] mdimg_hosting::HostError),
}
