use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// ISO 4217-style currency code.
///
/// # Examples
///
/// ```
/// use scenario_results::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("USD");
/// let eur = CurrencyCode::new("EUR");
/// assert_ne!(usd, eur);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Errors arising from FX rate operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("no FX rate available for {from} -> {to}")]
    RateNotFound {
        from: CurrencyCode,
        to: CurrencyCode,
    },
    #[error("FX rate must be positive, got {rate} for {from} -> {to}")]
    InvalidRate {
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    },
    #[error("invalid currency pair '{0}', expected the form 'EUR/USD'")]
    InvalidPair(String),
    #[error("converting {amount} {from} -> {to} overflows")]
    Overflow {
        amount: Decimal,
        from: CurrencyCode,
        to: CurrencyCode,
    },
}

/// An ordered pair of currencies, written `BASE/QUOTE`.
///
/// Used as the key for FX option volatilities. `EUR/USD` and `USD/EUR`
/// are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// The same pair quoted the other way round.
    pub fn inverse(&self) -> Self {
        Self::new(self.quote.clone(), self.base.clone())
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = FxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('/')
            .ok_or_else(|| FxError::InvalidPair(s.to_string()))?;
        let (base, quote) = (base.trim(), quote.trim());
        if base.is_empty() || quote.is_empty() || base == quote {
            return Err(FxError::InvalidPair(s.to_string()));
        }
        Ok(Self::new(CurrencyCode::new(base), CurrencyCode::new(quote)))
    }
}

impl Serialize for CurrencyPair {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CurrencyPair {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A source of FX rates used to re-express monetary values.
///
/// Implementations decide their own caching and thread-safety; callers
/// only see the rate or the reason there is none.
pub trait FxRateProvider {
    /// The rate such that 1 unit of `from` = `rate` units of `to`.
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError>;

    /// Convert an amount from one currency to another.
    ///
    /// A product outside the range of `Decimal` is an [`FxError::Overflow`].
    fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, FxError> {
        let rate = self.fx_rate(from, to)?;
        amount.checked_mul(rate).ok_or_else(|| FxError::Overflow {
            amount,
            from: from.clone(),
            to: to.clone(),
        })
    }
}

impl<P: FxRateProvider + ?Sized> FxRateProvider for &P {
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
        (**self).fx_rate(from, to)
    }

    fn convert(
        &self,
        amount: Decimal,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<Decimal, FxError> {
        (**self).convert(amount, from, to)
    }
}

/// FX rate table for converting between currencies.
///
/// Stores direct rates and their inverses.
///
/// # Examples
///
/// ```
/// use scenario_results::core::currency::{CurrencyCode, FxRateProvider, FxRateTable};
/// use rust_decimal_macros::dec;
///
/// let mut rates = FxRateTable::new();
/// rates.set_rate(
///     CurrencyCode::new("USD"),
///     CurrencyCode::new("EUR"),
///     dec!(0.9),
/// ).unwrap();
///
/// let converted = rates.convert(
///     dec!(100),
///     &CurrencyCode::new("USD"),
///     &CurrencyCode::new("EUR"),
/// ).unwrap();
/// assert_eq!(converted, dec!(90));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FxRateTable {
    /// Direct rates: (from, to) -> rate.
    rates: HashMap<(CurrencyCode, CurrencyCode), Decimal>,
}

impl FxRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a direct exchange rate: 1 unit of `from` = `rate` units of `to`.
    ///
    /// The inverse rate is stored alongside.
    pub fn set_rate(
        &mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { from, to, rate });
        }
        self.rates.insert((from.clone(), to.clone()), rate);
        self.rates.insert((to, from), Decimal::ONE / rate);
        Ok(())
    }

    /// Builder-style variant of [`FxRateTable::set_rate`].
    pub fn with_rate(
        mut self,
        from: CurrencyCode,
        to: CurrencyCode,
        rate: Decimal,
    ) -> Result<Self, FxError> {
        self.set_rate(from, to, rate)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FxRateProvider for FxRateTable {
    fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        self.rates
            .get(&(from.clone(), to.clone()))
            .copied()
            .ok_or_else(|| FxError::RateNotFound {
                from: from.clone(),
                to: to.clone(),
            })
    }
}
