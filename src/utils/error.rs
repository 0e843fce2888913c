use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} fetching {url}")]
    HttpStatus { status: u16, url: String },

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("missing required environment variable {0}")]
    MissingEnv(&'static str),

    #[error("delivery error: {0}")]
    Delivery(String),
}

impl AppError {
    /// Config-class errors stay fatal even in the notify stage, where
    /// delivery failures are otherwise swallowed.
    pub fn is_config(&self) -> bool {
        matches!(self, AppError::Config(_) | AppError::MissingEnv(_) | AppError::Selector { .. })
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
