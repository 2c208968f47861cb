use thiserror::Error;

/// Error taxonomy shared by every stage of the pipeline.
///
/// A `Transport` error ends pagination but keeps already-collected
/// records. A `SchemaMismatch` skips the offending item during
/// extraction and aborts the whole run during load. `Persistence` is
/// always fatal.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<reqwest::Error> for PipelineError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<rusqlite::Error> for PipelineError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        Self::Persistence(e.to_string())
    }
}
