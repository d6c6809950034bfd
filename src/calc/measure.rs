use crate::calc::value::ValueType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a column computes, and the type of value it produces.
///
/// Two columns may request the same measure with different configuration,
/// so a measure does not identify a column on its own.
///
/// # Examples
///
/// ```
/// use scenario_results::calc::measure::Measure;
/// use scenario_results::calc::value::ValueType;
///
/// let pv = Measure::present_value();
/// assert_eq!(pv.name(), "PresentValue");
/// assert_eq!(pv.value_type(), ValueType::CurrencyAmount);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Measure {
    name: String,
    value_type: ValueType,
}

impl Measure {
    pub fn new(name: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            value_type,
        }
    }

    /// Present value of a trade or position.
    pub fn present_value() -> Self {
        Self::new("PresentValue", ValueType::CurrencyAmount)
    }

    /// Per legal entity jump-to-default amounts.
    pub fn jump_to_default() -> Self {
        Self::new("JumpToDefault", ValueType::JumpToDefault)
    }

    /// Par rate, a plain number.
    pub fn par_rate() -> Self {
        Self::new("ParRate", ValueType::Number)
    }

    /// Look up one of the measures above by name.
    pub fn standard(name: &str) -> Option<Self> {
        match name {
            "PresentValue" => Some(Self::present_value()),
            "JumpToDefault" => Some(Self::jump_to_default()),
            "ParRate" => Some(Self::par_rate()),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
