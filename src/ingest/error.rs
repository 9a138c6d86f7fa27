#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("{0}")]
    Validation(String),

    #[error("Failed to read document: {0}")]
    Parse(String),

    #[error("Not enough text in document: {length} characters extracted, at least {minimum} required")]
    TooShort { length: usize, minimum: usize },

    #[error("Failed to stage upload: {0}")]
    Io(#[from] std::io::Error),
}

impl IngestError {
    /// Machine readable kind used in error envelopes.
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Validation(_) => "validation_error",
            IngestError::Parse(_) => "parse_error",
            IngestError::TooShort { .. } => "too_short_error",
            IngestError::Io(_) => "io_error",
        }
    }

    pub fn is_client_error(&self) -> bool {
        !matches!(self, IngestError::Io(_))
    }
}
