use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to start upload tool '{tool}': {source}")]
    SpawnError {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload tool exited with {status}: {stderr}")]
    ToolFailed { status: String, stderr: String },

    #[error("Upload tool '{0}' printed no URL")]
    EmptyOutput(String),

    #[error("Upload timed out after {0}s")]
    Timeout(u64),

    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Response is not an image: {0}")]
    InvalidContent(String),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        HostError::HttpError(err.to_string())
    }
}
