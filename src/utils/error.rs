use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to fetch {resource}: HTTP {status}")]
    FetchError { resource: String, status: u16 },

    #[error("API returned HTTP {status}: {message}")]
    ApiResponseError { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Account submission failed: {message}")]
    SubmissionError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Submission,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarketError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketError::ApiError(_)
            | MarketError::FetchError { .. }
            | MarketError::ApiResponseError { .. } => ErrorCategory::Network,
            MarketError::CsvError(_)
            | MarketError::SerializationError(_)
            | MarketError::ValidationError { .. } => ErrorCategory::Data,
            MarketError::ConfigError { .. }
            | MarketError::InvalidConfigValueError { .. }
            | MarketError::MissingConfigError { .. } => ErrorCategory::Configuration,
            MarketError::SubmissionError { .. } => ErrorCategory::Submission,
            MarketError::IoError(_) => ErrorCategory::System,
        }
    }

    /// Drives CLI exit codes. No error here leaves a session unusable.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Submission => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MarketError::ApiError(_) => "Could not reach the marketplace API".to_string(),
            MarketError::FetchError { resource, .. } => {
                format!("An error occurred while loading {}", resource)
            }
            MarketError::ApiResponseError { message, .. } => message.clone(),
            MarketError::SubmissionError { .. } => {
                "An error occurred during registration, please try again".to_string()
            }
            MarketError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting '{}': {}", field, reason)
            }
            MarketError::MissingConfigError { field } => {
                format!("Missing setting '{}'", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the API base URL and your connection, then retry",
            ErrorCategory::Data => "Check the input data format",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Submission => "Retry the submission; entered data has been kept",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
