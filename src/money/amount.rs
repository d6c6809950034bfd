use crate::core::currency::{CurrencyCode, FxError, FxRateProvider};
use crate::money::convertible::FxConvertible;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A signed amount of money in a single currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyAmount {
    currency: CurrencyCode,
    amount: Decimal,
}

impl CurrencyAmount {
    pub fn new(currency: CurrencyCode, amount: Decimal) -> Self {
        Self { currency, amount }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(currency, Decimal::ZERO)
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }
}

impl FxConvertible for CurrencyAmount {
    fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Result<Self, FxError> {
        let amount = provider.convert(self.amount, &self.currency, currency)?;
        Ok(Self::new(currency.clone(), amount))
    }
}

impl fmt::Display for CurrencyAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.currency, self.amount)
    }
}
