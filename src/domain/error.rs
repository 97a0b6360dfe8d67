use thiserror::Error;

/// Failures of the pure codec and generation core.
///
/// Every core operation either succeeds or returns exactly one of these.
/// Only [`CodecError::Exhausted`] is worth retrying, and only with a relaxed
/// constraint; the other three are deterministic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid digit input: {reason}")]
    InvalidDigit { reason: String },

    #[error("checksum mismatch: expected check digit {expected}, found {found}")]
    ChecksumMismatch { expected: u8, found: u8 },

    #[error("malformed module pattern: {reason}")]
    MalformedPattern { reason: String },

    #[error("no free code found after {attempts} attempts")]
    Exhausted { attempts: u64 },
}

impl CodecError {
    pub(crate) fn invalid_digit(reason: impl Into<String>) -> Self {
        Self::InvalidDigit {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedPattern {
            reason: reason.into(),
        }
    }

    /// Stable name of the error kind, echoed by the command-line tools.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidDigit { .. } => "InvalidDigitError",
            Self::ChecksumMismatch { .. } => "ChecksumMismatchError",
            Self::MalformedPattern { .. } => "MalformedPatternError",
            Self::Exhausted { .. } => "ExhaustedError",
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Exhausted { .. })
    }
}
