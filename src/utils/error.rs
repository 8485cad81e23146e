use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unknown device code: {code}")]
    UnknownDevice { code: String },

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Element not found: {selector}")]
    ElementNotFound { selector: String },

    #[error("Scraping error: {0}")]
    Scraping(String),

    #[error("Notification error: {0}")]
    Notification(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// True for failures of the scrape phase, the ones worth a best-effort
    /// error notification before the run aborts.
    pub fn is_scraping(&self) -> bool {
        matches!(
            self,
            AppError::Navigation(_) | AppError::ElementNotFound { .. } | AppError::Scraping(_)
        )
    }
}

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
