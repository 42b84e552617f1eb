use thiserror::Error;

#[derive(Error, Debug)]
pub enum AbsorberError {
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("length mismatch: `{what}` has {actual} bins, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("scenario configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AbsorberError>;

/// Reject values that are not finite and strictly positive.
pub(crate) fn require_positive(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(AbsorberError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        });
    }
    if value <= 0.0 {
        return Err(AbsorberError::InvalidParameter {
            name,
            value,
            reason: "must be strictly positive",
        });
    }
    Ok(value)
}

/// Reject values that are not finite or negative.
pub(crate) fn require_non_negative(name: &'static str, value: f64) -> Result<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AbsorberError::InvalidParameter {
            name,
            value,
            reason: "must be finite and non-negative",
        });
    }
    Ok(value)
}

pub(crate) fn require_len(what: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(AbsorberError::LengthMismatch {
            what,
            expected,
            actual,
        });
    }
    Ok(())
}
