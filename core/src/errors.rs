use thiserror::Error;

use crate::{Form, KeyId};

/// Result type for the scheme's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised when the inputs of an operation are inconsistent.
///
/// Noise exhaustion is never reported: a ciphertext whose noise outgrew
/// its precision simply decrypts to an unreliable bit.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Invalid parameters.
    #[error("{0}")]
    ParametersError(#[from] ParametersError),

    #[error("Dimension mismatch: found {found}, expected {expected}")]
    DimensionMismatch { found: usize, expected: usize },

    #[error("Precision mismatch: found {found}, expected {expected}")]
    PrecisionMismatch { found: usize, expected: usize },

    #[error("Key mismatch: found key {found}, expected key {expected}")]
    KeyMismatch { found: KeyId, expected: KeyId },

    #[error("Form mismatch: found {found:?}, expected {expected:?}")]
    FormMismatch { found: Form, expected: Form },

    #[error("Transit key mismatch: {0}")]
    TransitKeyMismatch(String),

    #[error("Bootstrapping key mismatch: {0}")]
    BootstrappingKeyMismatch(String),

    #[error("Value {value} does not fit in {width} bits")]
    ValueOverflow { value: u64, width: usize },

    #[error("Invalid bit width: {0}, expected an integer between 1 and 64")]
    InvalidWidth(usize),

    #[error("Too few values provided: {0} is below limit {1}")]
    TooFewValues(usize, usize),
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParametersError {
    #[error("Invalid dimension: {0}, expected at least {1}")]
    InvalidDimension(usize, usize),

    #[error("Invalid precision: {0}, expected an integer between {1} and {2}")]
    InvalidPrecision(usize, usize, usize),

    #[error("Invalid standard deviation: {0}")]
    InvalidSigma(String),

    #[error("Invalid secret distribution: {0}")]
    InvalidDistribution(String),
}

#[cfg(test)]
mod tests {
    use crate::{Error, Form, ParametersError};

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::DimensionMismatch { found: 3, expected: 5 }.to_string(),
            "Dimension mismatch: found 3, expected 5"
        );
        assert_eq!(
            Error::PrecisionMismatch { found: 12, expected: 48 }.to_string(),
            "Precision mismatch: found 12, expected 48"
        );
        assert_eq!(
            Error::FormMismatch {
                found: Form::Flattened,
                expected: Form::Compact
            }
            .to_string(),
            "Form mismatch: found Flattened, expected Compact"
        );
        assert_eq!(
            Error::TransitKeyMismatch("wrong key".to_string()).to_string(),
            "Transit key mismatch: wrong key"
        );
        assert_eq!(
            Error::BootstrappingKeyMismatch("wrong key".to_string()).to_string(),
            "Bootstrapping key mismatch: wrong key"
        );
        assert_eq!(
            Error::ValueOverflow { value: 300, width: 8 }.to_string(),
            "Value 300 does not fit in 8 bits"
        );
        assert_eq!(
            Error::InvalidWidth(65).to_string(),
            "Invalid bit width: 65, expected an integer between 1 and 64"
        );
        assert_eq!(
            Error::TooFewValues(0, 1).to_string(),
            "Too few values provided: 0 is below limit 1"
        );
    }

    #[test]
    fn parameters_error_strings() {
        assert_eq!(
            ParametersError::InvalidDimension(1, 2).to_string(),
            "Invalid dimension: 1, expected at least 2"
        );
        assert_eq!(
            ParametersError::InvalidPrecision(3, 4, 127).to_string(),
            "Invalid precision: 3, expected an integer between 4 and 127"
        );
        assert_eq!(
            ParametersError::InvalidSigma("-1".to_string()).to_string(),
            "Invalid standard deviation: -1"
        );
        assert_eq!(
            ParametersError::InvalidDistribution("TernaryProb(NaN)".to_string()).to_string(),
            "Invalid secret distribution: TernaryProb(NaN)"
        );
        assert_eq!(
            Error::from(ParametersError::InvalidDimension(0, 2)).to_string(),
            "Invalid dimension: 0, expected at least 2"
        );
    }
}
