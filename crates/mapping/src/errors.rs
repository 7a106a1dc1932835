use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("I/O error on '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid mapping file '{path}': {source}")]
    ParseError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize mapping: {0}")]
    SerializeError(#[from] serde_json::Error),
}
