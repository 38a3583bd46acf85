use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration parse error in {field}: {message}")]
    ConfigParseError { field: String, message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Generated setup code is malformed: {code}")]
    CodeFormatError { code: String },

    #[error("Gave up drawing {what} after {attempts} attempts")]
    RetryLimitExceeded { what: String, attempts: usize },

    #[error("Invalid product data ({value}): {reason}")]
    InvalidProductData { value: String, reason: String },

    #[error("Payload encoder failed: {message}")]
    EncoderError { message: String },

    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Configuration,
    Generation,
    Encoding,
    Io,
    Processing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ProvisionError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProvisionError::IoError(_) => ErrorCategory::Io,
            ProvisionError::ConfigParseError { .. } => ErrorCategory::Configuration,
            ProvisionError::InvalidConfigValueError { .. }
            | ProvisionError::MissingConfigError { .. }
            | ProvisionError::InvalidProductData { .. } => ErrorCategory::Validation,
            ProvisionError::CodeFormatError { .. } | ProvisionError::RetryLimitExceeded { .. } => {
                ErrorCategory::Generation
            }
            ProvisionError::EncoderError { .. } => ErrorCategory::Encoding,
            ProvisionError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Encoding | ErrorCategory::Processing => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
            // 產生器邏輯錯誤，不應該發生
            ErrorCategory::Generation => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ProvisionError::IoError(_) => {
                "Check that the output directory is writable and has free space".to_string()
            }
            ProvisionError::ConfigParseError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            ProvisionError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of `{}` and run again", field)
            }
            ProvisionError::MissingConfigError { field } => {
                format!("Pass `--{}` or set it in the config file", field)
            }
            ProvisionError::InvalidProductData { .. } => {
                "Product data must end with up to 8 hexadecimal characters".to_string()
            }
            ProvisionError::CodeFormatError { .. } | ProvisionError::RetryLimitExceeded { .. } => {
                "This is a generator defect; please report it with the --seed used".to_string()
            }
            ProvisionError::EncoderError { .. } => {
                "Check the category id, setup id and transport passed to the encoder".to_string()
            }
            ProvisionError::ProcessingError { .. } => {
                "Re-run with --verbose to see which accessory failed".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Generation => format!("Setup info generation failed: {}", self),
            ErrorCategory::Encoding => format!("Could not create setup payload: {}", self),
            ErrorCategory::Io => format!("Could not write setup info: {}", self),
            ErrorCategory::Processing => format!("Batch aborted: {}", self),
        }
    }

    /// 對應 CLI 的結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
