use crate::core::currency::{CurrencyCode, FxError, FxRateProvider};
use crate::core::entity::EntityId;
use crate::money::convertible::FxConvertible;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Jump-to-default result: the loss (or gain) on the immediate default of
/// each legal entity, all in one currency.
///
/// # Examples
///
/// ```
/// use scenario_results::core::currency::{CurrencyCode, FxRateTable};
/// use scenario_results::core::entity::EntityId;
/// use scenario_results::money::convertible::FxConvertible;
/// use scenario_results::money::jump_to_default::JumpToDefault;
/// use rust_decimal_macros::dec;
///
/// let jtd = JumpToDefault::of(
///     CurrencyCode::new("USD"),
///     [(EntityId::new("EntityA"), dec!(100)), (EntityId::new("EntityB"), dec!(-50))],
/// );
/// let rates = FxRateTable::new()
///     .with_rate(CurrencyCode::new("USD"), CurrencyCode::new("EUR"), dec!(0.9))
///     .unwrap();
///
/// let eur = jtd.converted_to(&CurrencyCode::new("EUR"), &rates).unwrap();
/// assert_eq!(eur.amount(&EntityId::new("EntityA")), Some(dec!(90)));
/// assert_eq!(eur.amount(&EntityId::new("EntityB")), Some(dec!(-45)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JumpToDefault {
    /// The currency of every amount.
    currency: CurrencyCode,
    /// Amounts keyed by legal entity.
    amounts: BTreeMap<EntityId, Decimal>,
}

impl JumpToDefault {
    pub fn of(
        currency: CurrencyCode,
        amounts: impl IntoIterator<Item = (EntityId, Decimal)>,
    ) -> Self {
        Self {
            currency,
            amounts: amounts.into_iter().collect(),
        }
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn amounts(&self) -> &BTreeMap<EntityId, Decimal> {
        &self.amounts
    }

    pub fn amount(&self, entity: &EntityId) -> Option<Decimal> {
        self.amounts.get(entity).copied()
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    /// Sum over all entities, or `None` if the sum does not fit in a
    /// `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.amounts
            .values()
            .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
    }
}

impl FxConvertible for JumpToDefault {
    fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Result<Self, FxError> {
        let mut converted = BTreeMap::new();
        for (entity, amount) in &self.amounts {
            let value = provider.convert(*amount, &self.currency, currency)?;
            converted.insert(entity.clone(), value);
        }
        Ok(Self {
            currency: currency.clone(),
            amounts: converted,
        })
    }
}

impl fmt::Display for JumpToDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JTD[{} x{}] ", self.currency, self.amounts.len())?;
        match self.total() {
            Some(total) => write!(f, "{}", total),
            None => f.write_str("overflow"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::currency::FxRateTable;
    use rust_decimal_macros::dec;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD")
    }

    fn eur() -> CurrencyCode {
        CurrencyCode::new("EUR")
    }

    fn sample() -> JumpToDefault {
        JumpToDefault::of(
            usd(),
            [
                (EntityId::new("EntityA"), dec!(100.0)),
                (EntityId::new("EntityB"), dec!(-50.0)),
            ],
        )
    }

    /// Fails on every request, including identity conversions.
    struct NoRates;

    impl FxRateProvider for NoRates {
        fn fx_rate(&self, from: &CurrencyCode, to: &CurrencyCode) -> Result<Decimal, FxError> {
            Err(FxError::RateNotFound {
                from: from.clone(),
                to: to.clone(),
            })
        }
    }

    #[test]
    fn test_convert_usd_to_eur() {
        let rates = FxRateTable::new().with_rate(usd(), eur(), dec!(0.9)).unwrap();
        let converted = sample().converted_to(&eur(), &rates).unwrap();

        assert_eq!(converted.currency(), &eur());
        assert_eq!(converted.amount(&EntityId::new("EntityA")), Some(dec!(90)));
        assert_eq!(converted.amount(&EntityId::new("EntityB")), Some(dec!(-45)));
    }

    #[test]
    fn test_convert_preserves_keys() {
        let rates = FxRateTable::new().with_rate(usd(), eur(), dec!(0.9)).unwrap();
        let source = sample();
        let converted = source.converted_to(&eur(), &rates).unwrap();
        let before: Vec<_> = source.amounts().keys().collect();
        let after: Vec<_> = converted.amounts().keys().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_identity_conversion_still_consults_provider() {
        let err = sample().converted_to(&usd(), &NoRates).unwrap_err();
        assert_eq!(err, FxError::RateNotFound { from: usd(), to: usd() });
    }

    #[test]
    fn test_empty_breakdown_converts() {
        let empty = JumpToDefault::of(usd(), []);
        let converted = empty.converted_to(&eur(), &NoRates).unwrap();
        assert!(converted.is_empty());
        assert_eq!(converted.currency(), &eur());
    }

    #[test]
    fn test_total() {
        assert_eq!(sample().total(), Some(dec!(50)));
        assert_eq!(JumpToDefault::of(usd(), []).total(), Some(Decimal::ZERO));
    }

    fn huge() -> JumpToDefault {
        JumpToDefault::of(
            usd(),
            [
                (EntityId::new("EntityA"), Decimal::MAX),
                (EntityId::new("EntityB"), Decimal::MAX),
            ],
        )
    }

    #[test]
    fn test_total_overflow() {
        assert_eq!(huge().total(), None);
        assert_eq!(huge().to_string(), "JTD[USD x2] overflow");
    }

    #[test]
    fn test_display() {
        assert_eq!(sample().to_string(), "JTD[USD x2] 50.0");
    }

    #[test]
    fn test_convert_overflow() {
        let jpy = CurrencyCode::new("JPY");
        let rates = FxRateTable::new().with_rate(usd(), jpy.clone(), dec!(150)).unwrap();
        let err = huge().converted_to(&jpy, &rates).unwrap_err();
        assert!(matches!(err, FxError::Overflow { .. }));
    }
}
