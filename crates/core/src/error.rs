use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unknown chunking strategy: {0}")]
    InvalidStrategy(String),

    #[error("Unknown overlap guard: {0}")]
    InvalidOverlapGuard(String),

    #[error("Unknown fragment level: {0}")]
    InvalidLevel(String),

    #[error("Unrecognized overlap source tag: {0}")]
    InvalidOverlapSource(String),

    #[error("Metadata does not match level {level}: {reason}")]
    MetadataMismatch { level: String, reason: String },
}
