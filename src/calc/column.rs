use crate::calc::measure::Measure;
use crate::core::currency::CurrencyCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One requested column: a measure plus its column-specific configuration.
///
/// Compared by value, so two definitions built from the same parts find
/// the same column in a results matrix.
///
/// # Examples
///
/// ```
/// use scenario_results::calc::column::ColumnDefinition;
/// use scenario_results::calc::measure::Measure;
/// use scenario_results::core::currency::CurrencyCode;
///
/// let pv_usd = ColumnDefinition::of(Measure::present_value())
///     .with_reporting_currency(CurrencyCode::new("USD"));
/// assert_eq!(pv_usd.name(), "PresentValue");
/// assert_eq!(pv_usd.reporting_currency().map(|c| c.as_str()), Some("USD"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnDefinition {
    /// Header shown for the column.
    name: String,
    measure: Measure,
    /// Currency monetary results are reported in, if not the natural one.
    reporting_currency: Option<CurrencyCode>,
}

impl ColumnDefinition {
    /// A column named after its measure.
    pub fn of(measure: Measure) -> Self {
        Self {
            name: measure.name().to_string(),
            measure,
            reporting_currency: None,
        }
    }

    pub fn named(name: impl Into<String>, measure: Measure) -> Self {
        Self {
            name: name.into(),
            measure,
            reporting_currency: None,
        }
    }

    pub fn with_reporting_currency(mut self, currency: CurrencyCode) -> Self {
        self.reporting_currency = Some(currency);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    pub fn reporting_currency(&self) -> Option<&CurrencyCode> {
        self.reporting_currency.as_ref()
    }
}

impl fmt::Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.measure)?;
        if let Some(ccy) = &self.reporting_currency {
            write!(f, " in {}", ccy)?;
        }
        Ok(())
    }
}
