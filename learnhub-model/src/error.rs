use std::fmt::{self, Display};

/// Errors produced by model constructors and parsers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A string did not name a known variant of `kind`.
    UnknownVariant { kind: &'static str, value: String },
    /// A rating outside the supported range.
    RatingOutOfRange(String),
    /// A progress percentage outside 0..=100.
    PercentageOutOfRange(i64),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownVariant { kind, value } => {
                write!(f, "unknown {kind} '{value}'")
            }
            ModelError::RatingOutOfRange(raw) => {
                write!(f, "rating {raw} is outside 0.00..=5.00")
            }
            ModelError::PercentageOutOfRange(value) => {
                write!(f, "progress percentage {value} is outside 0..=100")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
