use crate::core::outcome::{FailureKind, FailureReason};
use crate::market::surface::{FxVolatilitySurface, VolatilitiesId};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;

/// Failure to find a value in a market data source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarketDataError {
    #[error("market data not found for identifier '{0}'")]
    NotFound(VolatilitiesId),
}

impl MarketDataError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::MissingData
    }
}

impl From<MarketDataError> for FailureReason {
    fn from(err: MarketDataError) -> Self {
        FailureReason::new(err.kind(), err.to_string())
    }
}

/// A source of market data for one calculation context.
///
/// An identifier that a lookup knows about may still have no value loaded
/// here; that is reported as [`MarketDataError::NotFound`].
pub trait MarketData: Send + Sync {
    /// The date the market data is valid for.
    fn valuation_date(&self) -> NaiveDate;

    fn contains(&self, id: &VolatilitiesId) -> bool;

    fn volatilities(&self, id: &VolatilitiesId) -> Result<FxVolatilitySurface, MarketDataError>;
}

/// Market data held in memory, fixed at construction.
#[derive(Debug, Clone)]
pub struct ImmutableMarketData {
    valuation_date: NaiveDate,
    surfaces: HashMap<VolatilitiesId, FxVolatilitySurface>,
}

impl ImmutableMarketData {
    pub fn new(valuation_date: NaiveDate) -> Self {
        Self {
            valuation_date,
            surfaces: HashMap::new(),
        }
    }

    /// Add a surface under its own identifier, replacing any previous one.
    pub fn with_surface(mut self, surface: FxVolatilitySurface) -> Self {
        self.surfaces.insert(surface.id().clone(), surface);
        self
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl MarketData for ImmutableMarketData {
    fn valuation_date(&self) -> NaiveDate {
        self.valuation_date
    }

    fn contains(&self, id: &VolatilitiesId) -> bool {
        self.surfaces.contains_key(id)
    }

    fn volatilities(&self, id: &VolatilitiesId) -> Result<FxVolatilitySurface, MarketDataError> {
        self.surfaces
            .get(id)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valuation_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 28).unwrap()
    }

    #[test]
    fn test_lookup_by_id() {
        let surface = FxVolatilitySurface::flat(
            VolatilitiesId::new("EUR-USD-VOLS"),
            "EUR/USD".parse().unwrap(),
            0.11,
        )
        .unwrap();
        let data = ImmutableMarketData::new(valuation_date()).with_surface(surface.clone());

        assert_eq!(data.valuation_date(), valuation_date());
        assert!(data.contains(&VolatilitiesId::new("EUR-USD-VOLS")));
        assert_eq!(
            data.volatilities(&VolatilitiesId::new("EUR-USD-VOLS")).unwrap(),
            surface
        );
    }

    #[test]
    fn test_missing_id() {
        let data = ImmutableMarketData::new(valuation_date());
        let err = data.volatilities(&VolatilitiesId::new("GBP-USD-VOLS")).unwrap_err();
        let reason: FailureReason = err.into();
        assert_eq!(reason.kind(), FailureKind::MissingData);
        assert!(reason.message().contains("GBP-USD-VOLS"));
    }
}
