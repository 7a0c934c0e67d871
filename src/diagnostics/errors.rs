//! Analysis errors and permissive parse results
//!
//! Fatal conditions found by the structural and rhythm passes are reported as
//! [`HumdrumError`]. Lenient conversions (rational text, rhythm text) never fail;
//! they return a [`BestEffort`] carrying the fallback value and an exactness flag.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of an analysis failure
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Spine layout could not be reconstructed
    Structural,
    /// Timing information contradicts itself
    Consistency,
    /// Input could not be read
    Io,
}

/// Fatal error raised by an analysis pass.
///
/// Line numbers are 1-based, as a user would count them in an editor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HumdrumError {
    #[error("line {line}: data found before exclusive interpretation: {text}")]
    DataBeforeExclusive { line: usize, text: String },

    #[error("line {line}: expected {expected} fields, but found {found}: {text}")]
    FieldCountMismatch {
        line: usize,
        expected: usize,
        found: usize,
        text: String,
    },

    #[error("lines {line} and {next_line}: cannot link spines across manipulator line: {text}")]
    LinkAlignment {
        line: usize,
        next_line: usize,
        text: String,
    },

    #[error("line {line}: exchange manipulator in field {field} has no partner: {text}")]
    UnpairedExchange { line: usize, field: usize, text: String },

    #[error("line {line}: field {field} requires an exclusive interpretation after spine addition: {text}")]
    MissingExclusive { line: usize, field: usize, text: String },

    #[error("line {line}: exclusive interpretation with no preparation in field {field}: {text}")]
    UnpreparedExclusive { line: usize, field: usize, text: String },

    #[error("line {line}: inconsistent rhythm analysis, start time {found} conflicts with {expected}: {text}")]
    InconsistentRhythm {
        line: usize,
        expected: String,
        found: String,
        text: String,
    },

    #[error("line {line}: unexpected negative duration: {text}")]
    NegativeDuration { line: usize, text: String },

    #[error("line {line}: start time is too large to represent exactly: {text}")]
    TimingOverflow { line: usize, text: String },

    #[error("could not read input: {0}")]
    Io(String),
}

impl HumdrumError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HumdrumError::InconsistentRhythm { .. }
            | HumdrumError::NegativeDuration { .. }
            | HumdrumError::TimingOverflow { .. } => ErrorKind::Consistency,
            HumdrumError::Io(_) => ErrorKind::Io,
            _ => ErrorKind::Structural,
        }
    }
}

impl From<std::io::Error> for HumdrumError {
    fn from(err: std::io::Error) -> Self {
        HumdrumError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, HumdrumError>;

/// Value produced by a lenient conversion.
///
/// `exact` is false when the input did not fully match the expected grammar and
/// `value` holds the documented fallback instead.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct BestEffort<T> {
    value: T,
    exact: bool,
}

impl<T> BestEffort<T> {
    pub fn exact(value: T) -> Self {
        Self { value, exact: true }
    }

    pub fn fallback(value: T) -> Self {
        Self { value, exact: false }
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = HumdrumError::FieldCountMismatch {
            line: 3,
            expected: 2,
            found: 1,
            text: "4c".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Structural);
        assert_eq!(
            err.to_string(),
            "line 3: expected 2 fields, but found 1: 4c"
        );

        let err = HumdrumError::NegativeDuration {
            line: 4,
            text: "4c".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Consistency);

        let err = HumdrumError::TimingOverflow {
            line: 9,
            text: "67c".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Consistency);
        assert!(err.to_string().starts_with("line 9: start time is too large"));
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: HumdrumError = io.into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_best_effort() {
        let good = BestEffort::exact(5);
        assert!(good.is_exact());
        assert_eq!(*good.value(), 5);

        let bad = BestEffort::fallback(0);
        assert!(!bad.is_exact());
        assert_eq!(bad.into_value(), 0);
    }
}
