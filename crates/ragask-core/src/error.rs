//! Error types for ragask.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("missing required configuration: {0}")]
    MissingConfiguration(String),

    #[error("search unavailable: {0}")]
    SearchUnavailable(String),

    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("invalid request: {0}")]
    Validation(String),
}

impl Error {
    /// Stable machine-readable name of the error kind, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::MissingConfiguration(_) => "missing_configuration",
            Error::SearchUnavailable(_) => "search_unavailable",
            Error::GenerationFailed(_) => "generation_failed",
            Error::Validation(_) => "validation",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
