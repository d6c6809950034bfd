//! Success-or-failure container for calculated values.
//!
//! An [`Outcome`] is what a calculation hands back for one cell of a
//! results matrix. Failures are ordinary values, so one missing data
//! point does not invalidate the rest of a batch.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    /// Malformed arguments, out-of-range access, type mismatch, unknown key.
    InvalidInput,
    /// A structurally valid key has no value at calculation time.
    MissingData,
    /// Opaque failure from an upstream calculation.
    CalculationError,
    /// No FX rate path between the currencies involved.
    CurrencyConversion,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::InvalidInput => "InvalidInput",
            FailureKind::MissingData => "MissingData",
            FailureKind::CalculationError => "CalculationError",
            FailureKind::CurrencyConversion => "CurrencyConversion",
        };
        f.write_str(s)
    }
}

/// Why a calculation failed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct FailureReason {
    kind: FailureKind,
    message: String,
}

impl FailureReason {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(FailureKind::InvalidInput, message)
    }

    pub fn missing_data(message: impl Into<String>) -> Self {
        Self::new(FailureKind::MissingData, message)
    }

    pub fn calculation_error(message: impl Into<String>) -> Self {
        Self::new(FailureKind::CalculationError, message)
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The outcome of a calculation: a value or the reason there is none.
///
/// # Examples
///
/// ```
/// use scenario_results::core::outcome::{FailureKind, FailureReason, Outcome};
///
/// let ok: Outcome<i32> = Outcome::success(2);
/// assert_eq!(ok.map(|v| v * 10).value(), Some(&20));
///
/// let failed: Outcome<i32> = Outcome::failure(FailureReason::missing_data("no quote"));
/// let mapped: Outcome<String> = failed.map(|v| v.to_string());
/// assert_eq!(mapped.failure_reason().unwrap().kind(), FailureKind::MissingData);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome<T> {
    Success(T),
    Failure(FailureReason),
}

impl<T> Outcome<T> {
    pub fn success(value: T) -> Self {
        Outcome::Success(value)
    }

    pub fn failure(reason: FailureReason) -> Self {
        Outcome::Failure(reason)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(v) => Some(v),
            Outcome::Failure(_) => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(reason) => Some(reason),
        }
    }

    pub fn as_ref(&self) -> Outcome<&T> {
        match self {
            Outcome::Success(v) => Outcome::Success(v),
            Outcome::Failure(reason) => Outcome::Failure(reason.clone()),
        }
    }

    /// Apply `f` to a successful value. A failure passes through with its
    /// reason untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => Outcome::Success(f(v)),
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }

    /// Chain a step that may itself fail.
    pub fn flat_map<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(v) => f(v),
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }

    /// Re-wrap this outcome's failure as an outcome of another value type.
    ///
    /// Returns `None` for a success.
    pub fn propagate_failure<U>(&self) -> Option<Outcome<U>> {
        self.failure_reason().map(|r| Outcome::Failure(r.clone()))
    }

    /// Combine two outcomes. The first failure encountered wins.
    pub fn combine<U, R, F: FnOnce(T, U) -> R>(self, other: Outcome<U>, f: F) -> Outcome<R> {
        match (self, other) {
            (Outcome::Success(a), Outcome::Success(b)) => Outcome::Success(f(a, b)),
            (Outcome::Failure(reason), _) | (_, Outcome::Failure(reason)) => {
                Outcome::Failure(reason)
            }
        }
    }

    pub fn into_result(self) -> Result<T, FailureReason> {
        match self {
            Outcome::Success(v) => Ok(v),
            Outcome::Failure(reason) => Err(reason),
        }
    }
}

impl<T, E: Into<FailureReason>> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(v) => Outcome::Success(v),
            Err(e) => Outcome::Failure(e.into()),
        }
    }
}

impl<T> FromIterator<Outcome<T>> for Outcome<Vec<T>> {
    fn from_iter<I: IntoIterator<Item = Outcome<T>>>(iter: I) -> Self {
        let mut values = Vec::new();
        for outcome in iter {
            match outcome {
                Outcome::Success(v) => values.push(v),
                Outcome::Failure(reason) => return Outcome::Failure(reason),
            }
        }
        Outcome::Success(values)
    }
}

impl<T: fmt::Display> fmt::Display for Outcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success(v) => write!(f, "{}", v),
            Outcome::Failure(reason) => write!(f, "FAILED({})", reason.kind()),
        }
    }
}
