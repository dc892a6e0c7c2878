use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Invalid image: {message}")]
    InvalidImage { message: String },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

pub type Result<T> = std::result::Result<T, ChartError>;

impl ChartError {
    pub(crate) fn invalid_image(message: impl Into<String>) -> Self {
        ChartError::InvalidImage {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        ChartError::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Returns an error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ChartError::InvalidImage { .. } => "INVALID_IMAGE",
            ChartError::InvalidConfiguration { .. } => "INVALID_CONFIGURATION",
        }
    }

    /// Returns true if this error is recoverable (caller can retry with corrected input)
    pub fn is_recoverable(&self) -> bool {
        // Both kinds are input errors; the pipeline itself never fails internally
        true
    }
}
