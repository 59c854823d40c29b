use thiserror::Error;

#[derive(Error, Debug)]
pub enum SuggestError {
    #[error("Validation error on `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("Provider error: {message}")]
    ProviderError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Provider,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 使用者可手動重試
    Medium,
    /// 輸入需修正
    High,
    Critical,
}

impl SuggestError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::ProviderError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::SerializationError(_) => ErrorCategory::Validation,
            Self::ProviderError { .. } => ErrorCategory::Provider,
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Provider => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    pub fn is_provider(&self) -> bool {
        matches!(self, Self::ProviderError { .. })
    }

    /// Field named by a validation or config error, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationError { field, .. }
            | Self::MissingConfigError { field }
            | Self::InvalidConfigValueError { field, .. } => Some(field.as_str()),
            _ => None,
        }
    }

    /// Any failure raised by the provider call becomes a provider error,
    /// including validation errors about the provider's own payload.
    pub fn into_provider_error(self) -> Self {
        match self {
            Self::ProviderError { .. } => self,
            other => Self::provider(other.to_string()),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, message } => format!("{}: {}", field, message),
            Self::SerializationError(e) => format!("Request is not valid JSON: {}", e),
            Self::ProviderError { .. } => {
                "Failed to generate learning paths. Please try again.".to_string()
            }
            Self::MissingConfigError { field } => format!("Missing required setting `{}`", field),
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting `{}`: {}", field, reason)
            }
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::IoError(e) => format!("File system error: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } | Self::SerializationError(_) => {
                "Fix the highlighted input and submit again"
            }
            Self::ProviderError { .. } => {
                "Check network access and provider status, then retry manually"
            }
            Self::MissingConfigError { .. } => {
                "Set the value in the TOML config, on the command line, or via the provider's API key environment variable"
            }
            Self::InvalidConfigValueError { .. } | Self::ConfigError { .. } => {
                "Review the configuration file and command-line overrides"
            }
            Self::IoError(_) => "Check that the file exists and is readable",
        }
    }
}

pub type Result<T> = std::result::Result<T, SuggestError>;
