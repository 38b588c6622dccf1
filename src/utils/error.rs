use thiserror::Error;

/// 單一頁面抓取失敗的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("could not read response body: {0}")]
    Body(String),
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Failed to fetch {url}: {failure}")]
    FetchError { url: String, failure: FetchFailure },

    #[error("Required field '{field}' not found in listing #{position} of {page_url}")]
    FieldNotFoundError {
        field: String,
        page_url: String,
        position: usize,
    },

    #[error("Pagination on {base_url} reports {found} pages, above the limit of {limit}")]
    PageLimitError {
        base_url: String,
        found: usize,
        limit: usize,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid selector '{selector}': {reason}")]
    SelectorError { selector: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Parsing,
    Output,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// CLI 結束代碼
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Low => 0,
            Self::Medium => 2,
            Self::High => 1,
            Self::Critical => 3,
        }
    }
}

impl ScrapeError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FetchError { .. } => ErrorCategory::Network,
            Self::FieldNotFoundError { .. } | Self::PageLimitError { .. } => {
                ErrorCategory::Parsing
            }
            Self::CsvError(_) | Self::IoError(_) => ErrorCategory::Output,
            Self::SelectorError { .. }
            | Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Parsing => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    /// 給使用者的處理建議
    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::FetchError {
                failure: FetchFailure::Status(status),
                ..
            } => format!(
                "The site answered with HTTP {}; check that the search URL still exists and try again later",
                status
            ),
            Self::FetchError {
                failure: FetchFailure::Timeout,
                ..
            } => "Increase --timeout-secs or check your network connection".to_string(),
            Self::FetchError { .. } => {
                "Check your network connection and that the base URL is reachable".to_string()
            }
            Self::FieldNotFoundError { .. } => {
                "The site markup may have changed; update the [markup] selectors or run with --skip-malformed"
                    .to_string()
            }
            Self::PageLimitError { .. } => {
                "Check the pagination selector, or raise max_pages if the site really has that many pages"
                    .to_string()
            }
            Self::CsvError(_) | Self::IoError(_) => {
                "Make sure the destination directory is writable".to_string()
            }
            Self::SelectorError { .. } => "Fix the CSS selector in the [markup] section".to_string(),
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Check the configuration values and run again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::FetchError { url, .. } => format!("Could not download page {}", url),
            Self::FieldNotFoundError { field, page_url, .. } => {
                format!("A listing on {} has no {}", page_url, field)
            }
            Self::CsvError(_) | Self::IoError(_) => {
                format!("Could not write the price list: {}", self)
            }
            _ => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_names_url() {
        let err = ScrapeError::FetchError {
            url: "https://example.com/koop?page=2".to_string(),
            failure: FetchFailure::Status(503),
        };

        assert!(err.to_string().contains("https://example.com/koop?page=2"));
        assert!(err.to_string().contains("503"));
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_field_not_found_is_parsing_error() {
        let err = ScrapeError::FieldNotFoundError {
            field: "address".to_string(),
            page_url: "https://example.com/koop?page=1".to_string(),
            position: 3,
        };

        assert_eq!(err.category(), ErrorCategory::Parsing);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("address"));
    }
}
