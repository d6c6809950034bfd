//! Runtime-typed values held by a results matrix.
//!
//! A matrix stores cells of different measures side by side, so each cell
//! carries a [`CalcValue`] whose [`ValueType`] tag is checked before the
//! value is narrowed to a concrete type through [`MeasureValue`].

use crate::core::currency::{CurrencyCode, FxError, FxRateProvider};
use crate::core::outcome::{FailureReason, Outcome};
use crate::money::amount::CurrencyAmount;
use crate::money::convertible::FxConvertible;
use crate::money::jump_to_default::JumpToDefault;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type tag of a [`CalcValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    Number,
    CurrencyAmount,
    JumpToDefault,
    Text,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueType::Number => "Number",
            ValueType::CurrencyAmount => "CurrencyAmount",
            ValueType::JumpToDefault => "JumpToDefault",
            ValueType::Text => "Text",
        };
        f.write_str(s)
    }
}

/// A calculated value of any supported type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalcValue {
    Number(Decimal),
    Amount(CurrencyAmount),
    JumpToDefault(JumpToDefault),
    Text(String),
}

impl CalcValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            CalcValue::Number(_) => ValueType::Number,
            CalcValue::Amount(_) => ValueType::CurrencyAmount,
            CalcValue::JumpToDefault(_) => ValueType::JumpToDefault,
            CalcValue::Text(_) => ValueType::Text,
        }
    }
}

impl fmt::Display for CalcValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcValue::Number(v) => write!(f, "{}", v),
            CalcValue::Amount(v) => write!(f, "{}", v),
            CalcValue::JumpToDefault(v) => write!(f, "{}", v),
            CalcValue::Text(v) => f.write_str(v),
        }
    }
}

impl FxConvertible for CalcValue {
    /// Monetary values are converted; numbers and text carry no currency
    /// and are returned unchanged.
    fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Result<Self, FxError> {
        Ok(match self {
            CalcValue::Amount(v) => CalcValue::Amount(v.converted_to(currency, provider)?),
            CalcValue::JumpToDefault(v) => {
                CalcValue::JumpToDefault(v.converted_to(currency, provider)?)
            }
            other => other.clone(),
        })
    }
}

/// A concrete type that a [`CalcValue`] can be narrowed to.
pub trait MeasureValue: Sized {
    const VALUE_TYPE: ValueType;

    /// Take the payload out of a value carrying the matching tag.
    fn from_value(value: CalcValue) -> Option<Self>;

    fn into_value(self) -> CalcValue;
}

impl MeasureValue for Decimal {
    const VALUE_TYPE: ValueType = ValueType::Number;

    fn from_value(value: CalcValue) -> Option<Self> {
        match value {
            CalcValue::Number(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> CalcValue {
        CalcValue::Number(self)
    }
}

impl MeasureValue for CurrencyAmount {
    const VALUE_TYPE: ValueType = ValueType::CurrencyAmount;

    fn from_value(value: CalcValue) -> Option<Self> {
        match value {
            CalcValue::Amount(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> CalcValue {
        CalcValue::Amount(self)
    }
}

impl MeasureValue for JumpToDefault {
    const VALUE_TYPE: ValueType = ValueType::JumpToDefault;

    fn from_value(value: CalcValue) -> Option<Self> {
        match value {
            CalcValue::JumpToDefault(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> CalcValue {
        CalcValue::JumpToDefault(self)
    }
}

impl MeasureValue for String {
    const VALUE_TYPE: ValueType = ValueType::Text;

    fn from_value(value: CalcValue) -> Option<Self> {
        match value {
            CalcValue::Text(v) => Some(v),
            _ => None,
        }
    }

    fn into_value(self) -> CalcValue {
        CalcValue::Text(self)
    }
}

pub(crate) fn type_mismatch_message(actual: ValueType, expected: ValueType) -> String {
    format!(
        "value type {} is not an instance of expected type {}",
        actual, expected
    )
}

impl Outcome<CalcValue> {
    /// Wrap a concrete value as a successful cell.
    pub fn of_value<T: MeasureValue>(value: T) -> Self {
        Outcome::Success(value.into_value())
    }

    /// Narrow to a concrete value type.
    ///
    /// A success of the wrong type becomes an `InvalidInput` failure; the
    /// tag is checked before the payload is touched.
    pub fn narrow<T: MeasureValue>(self) -> Outcome<T> {
        match self {
            Outcome::Success(value) => {
                let actual = value.value_type();
                if actual != T::VALUE_TYPE {
                    return Outcome::Failure(FailureReason::invalid_input(
                        type_mismatch_message(actual, T::VALUE_TYPE),
                    ));
                }
                match T::from_value(value) {
                    Some(v) => Outcome::Success(v),
                    None => Outcome::Failure(FailureReason::invalid_input(
                        type_mismatch_message(actual, T::VALUE_TYPE),
                    )),
                }
            }
            Outcome::Failure(reason) => Outcome::Failure(reason),
        }
    }
}
