//! Resolution of FX option volatilities for calculations.
//!
//! A lookup answers two different questions. Whether a currency pair is
//! known at all is a configuration matter, checked up front through
//! [`FxOptionLookup::requirements`] and reported as an error. Whether the
//! identifier it maps to has data loaded is only known at calculation
//! time, and is reported as a failed [`Outcome`] for that calculation.

use crate::core::currency::CurrencyPair;
use crate::core::outcome::{FailureKind, FailureReason, Outcome};
use crate::market::market_data::MarketData;
use crate::market::surface::{FxVolatilitySurface, VolatilitiesId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors from resolving currency pairs against a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("no market data defined for key '{0}'")]
    PairNotFound(CurrencyPair),
    #[error("no market data defined for keys {}", format_pairs(.0))]
    PairsNotFound(Vec<CurrencyPair>),
}

impl LookupError {
    pub fn kind(&self) -> FailureKind {
        FailureKind::MissingData
    }

    /// Every pair the lookup could not resolve.
    pub fn missing_pairs(&self) -> Vec<&CurrencyPair> {
        match self {
            LookupError::PairNotFound(pair) => vec![pair],
            LookupError::PairsNotFound(pairs) => pairs.iter().collect(),
        }
    }
}

fn format_pairs(pairs: &[CurrencyPair]) -> String {
    let quoted: Vec<String> = pairs.iter().map(|p| format!("'{}'", p)).collect();
    quoted.join(", ")
}

impl From<LookupError> for FailureReason {
    fn from(err: LookupError) -> Self {
        FailureReason::new(err.kind(), err.to_string())
    }
}

/// Market data a calculation needs before it can run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionRequirements {
    value_requirements: BTreeSet<VolatilitiesId>,
}

impl FunctionRequirements {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn of(ids: impl IntoIterator<Item = VolatilitiesId>) -> Self {
        Self {
            value_requirements: ids.into_iter().collect(),
        }
    }

    pub fn value_requirements(&self) -> &BTreeSet<VolatilitiesId> {
        &self.value_requirements
    }

    pub fn is_empty(&self) -> bool {
        self.value_requirements.is_empty()
    }

    /// Union with another function's requirements.
    pub fn combined_with(mut self, other: FunctionRequirements) -> Self {
        self.value_requirements.extend(other.value_requirements);
        self
    }

    /// Identifiers that `market_data` has no value for.
    pub fn unsatisfied(&self, market_data: &dyn MarketData) -> Vec<&VolatilitiesId> {
        self.value_requirements
            .iter()
            .filter(|id| !market_data.contains(id))
            .collect()
    }
}

/// Finds the FX option volatilities to use for a currency pair.
pub trait FxOptionLookup: Send + Sync {
    /// Every currency pair this lookup can provide volatilities for.
    fn volatility_currency_pairs(&self) -> BTreeSet<CurrencyPair>;

    /// The identifiers of the volatilities for `pair`.
    fn volatility_ids(&self, pair: &CurrencyPair) -> Result<BTreeSet<VolatilitiesId>, LookupError>;

    /// The market data needed to price instruments on `pairs`.
    ///
    /// Fails if any pair is unknown, naming all of them.
    fn requirements(
        &self,
        pairs: &BTreeSet<CurrencyPair>,
    ) -> Result<FunctionRequirements, LookupError>;

    /// The volatilities for `pair` in `market_data`.
    fn volatilities(
        &self,
        pair: &CurrencyPair,
        market_data: &dyn MarketData,
    ) -> Outcome<FxVolatilitySurface>;
}

/// Lookup backed by a fixed map from currency pair to identifier.
///
/// Pairs match exactly: a lookup holding `EUR/USD` does not answer for
/// `USD/EUR`.
///
/// # Examples
///
/// ```
/// use scenario_results::market::lookup::{DefaultFxOptionLookup, FxOptionLookup};
/// use scenario_results::market::surface::VolatilitiesId;
/// use std::collections::BTreeSet;
///
/// let lookup = DefaultFxOptionLookup::of("EUR/USD".parse().unwrap(), VolatilitiesId::new("EUR-USD-VOLS"));
///
/// let ids = lookup.volatility_ids(&"EUR/USD".parse().unwrap()).unwrap();
/// assert!(ids.contains(&VolatilitiesId::new("EUR-USD-VOLS")));
///
/// let pairs: BTreeSet<_> = ["GBP/USD".parse().unwrap()].into_iter().collect();
/// assert!(lookup.requirements(&pairs).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultFxOptionLookup {
    volatility_ids: BTreeMap<CurrencyPair, VolatilitiesId>,
}

impl DefaultFxOptionLookup {
    /// A lookup with a single mapping.
    pub fn of(pair: CurrencyPair, id: VolatilitiesId) -> Self {
        Self::from_map([(pair, id)])
    }

    /// A lookup from pair → identifier mappings. A pair given twice keeps
    /// the last identifier.
    pub fn from_map(ids: impl IntoIterator<Item = (CurrencyPair, VolatilitiesId)>) -> Self {
        let volatility_ids: BTreeMap<_, _> = ids.into_iter().collect();
        log::debug!("FX option lookup configured for {} pairs", volatility_ids.len());
        Self { volatility_ids }
    }

    fn id_for(&self, pair: &CurrencyPair) -> Result<&VolatilitiesId, LookupError> {
        self.volatility_ids
            .get(pair)
            .ok_or_else(|| LookupError::PairNotFound(pair.clone()))
    }
}

impl FxOptionLookup for DefaultFxOptionLookup {
    fn volatility_currency_pairs(&self) -> BTreeSet<CurrencyPair> {
        self.volatility_ids.keys().cloned().collect()
    }

    fn volatility_ids(&self, pair: &CurrencyPair) -> Result<BTreeSet<VolatilitiesId>, LookupError> {
        let id = self.id_for(pair)?;
        Ok(BTreeSet::from([id.clone()]))
    }

    fn requirements(
        &self,
        pairs: &BTreeSet<CurrencyPair>,
    ) -> Result<FunctionRequirements, LookupError> {
        let mut ids = BTreeSet::new();
        let mut missing = Vec::new();
        for pair in pairs {
            match self.volatility_ids.get(pair) {
                Some(id) => {
                    ids.insert(id.clone());
                }
                None => missing.push(pair.clone()),
            }
        }
        match missing.len() {
            0 => Ok(FunctionRequirements {
                value_requirements: ids,
            }),
            1 => Err(LookupError::PairNotFound(missing.remove(0))),
            _ => Err(LookupError::PairsNotFound(missing)),
        }
    }

    fn volatilities(
        &self,
        pair: &CurrencyPair,
        market_data: &dyn MarketData,
    ) -> Outcome<FxVolatilitySurface> {
        let id = match self.id_for(pair) {
            Ok(id) => id,
            Err(err) => return Outcome::failure(err.into()),
        };
        match market_data.volatilities(id) {
            Ok(surface) => {
                log::debug!("resolved volatilities {} for {}", id, pair);
                Outcome::success(surface)
            }
            Err(err) => Outcome::failure(FailureReason::missing_data(format!(
                "volatilities for currency pair '{}': {}",
                pair, err
            ))),
        }
    }
}
