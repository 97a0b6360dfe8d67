use crate::domain::error::CodecError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Exclusion file {path}, line {line}: {reason}")]
    ExclusionFileError {
        path: String,
        line: usize,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Generation,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// The caller may retry with a relaxed constraint.
    Medium,
    /// Deterministic failure; retrying the same input fails the same way.
    High,
    Critical,
}

impl ForgeError {
    /// Name of the error kind as printed by the command-line tools.
    pub fn kind(&self) -> &'static str {
        match self {
            ForgeError::Codec(e) => e.kind(),
            ForgeError::ZipError(_) => "ZipError",
            ForgeError::CsvError(_) => "CsvError",
            ForgeError::IoError(_) => "IoError",
            ForgeError::SerializationError(_) => "SerializationError",
            ForgeError::ConfigValidationError { .. } => "ConfigValidationError",
            ForgeError::InvalidConfigValueError { .. } => "InvalidConfigValueError",
            ForgeError::ExclusionFileError { .. } => "ExclusionFileError",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ForgeError::Codec(e) if e.is_retryable() => ErrorCategory::Generation,
            ForgeError::Codec(_) | ForgeError::ExclusionFileError { .. } => ErrorCategory::Input,
            ForgeError::ConfigValidationError { .. }
            | ForgeError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ForgeError::ZipError(_)
            | ForgeError::CsvError(_)
            | ForgeError::IoError(_)
            | ForgeError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Generation => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ForgeError::Codec(CodecError::InvalidDigit { .. }) => {
                "Supply exactly 12 payload digits or 13 code digits, each 0-9"
            }
            ForgeError::Codec(CodecError::ChecksumMismatch { .. }) => {
                "Check the code for a mistyped digit; the check digit is never corrected"
            }
            ForgeError::Codec(CodecError::MalformedPattern { .. }) => {
                "Supply all 95 modules as 0/1 with intact start, center and end guards"
            }
            ForgeError::Codec(CodecError::Exhausted { .. }) => {
                "Shorten the prefix, raise max_attempts, or prune the exclusion list"
            }
            ForgeError::ExclusionFileError { .. } => {
                "List one valid 13-digit code per line; '#' starts a comment"
            }
            ForgeError::ConfigValidationError { .. }
            | ForgeError::InvalidConfigValueError { .. } => {
                "Review the configuration file against the documented fields"
            }
            ForgeError::IoError(_) => "Check that paths exist and are writable",
            ForgeError::ZipError(_) | ForgeError::CsvError(_) | ForgeError::SerializationError(_) => {
                "Re-run with --verbose and report the failure"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
