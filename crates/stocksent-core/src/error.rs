//! Error types for stocksent

/// Result type alias using stocksent's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for stocksent operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model loading and inference errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Terminal/file IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("Model path does not exist: ./missing");
        assert_eq!(
            err.to_string(),
            "configuration error: Model path does not exist: ./missing"
        );

        let err = Error::classifier("Tokenization failed");
        assert_eq!(err.to_string(), "classifier error: Tokenization failed");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "stream did not contain valid UTF-8",
        );
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
