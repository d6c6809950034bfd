use crate::core::currency::CurrencyPair;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of a set of FX option volatilities in a market data source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VolatilitiesId(String);

impl VolatilitiesId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VolatilitiesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VolatilitiesId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SurfaceError {
    #[error("volatility surface needs at least one point")]
    Empty,
    #[error("{expiries} expiries but {vols} volatilities")]
    LengthMismatch { expiries: usize, vols: usize },
    #[error("expiries must be strictly increasing and non-negative, found {0} out of order")]
    UnsortedExpiry(f64),
    #[error("volatility must be finite and non-negative, got {0}")]
    InvalidVolatility(f64),
}

/// ATM volatility term structure for one currency pair.
///
/// Volatilities are interpolated linearly in expiry and held flat beyond
/// the first and last points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxVolatilitySurface {
    id: VolatilitiesId,
    currency_pair: CurrencyPair,
    /// Year fractions, strictly increasing.
    expiries: Vec<f64>,
    vols: Vec<f64>,
}

impl FxVolatilitySurface {
    pub fn new(
        id: VolatilitiesId,
        currency_pair: CurrencyPair,
        expiries: Vec<f64>,
        vols: Vec<f64>,
    ) -> Result<Self, SurfaceError> {
        if expiries.is_empty() {
            return Err(SurfaceError::Empty);
        }
        if expiries.len() != vols.len() {
            return Err(SurfaceError::LengthMismatch {
                expiries: expiries.len(),
                vols: vols.len(),
            });
        }
        let mut previous = None;
        for &t in &expiries {
            let ordered = match previous {
                Some(p) => t > p,
                None => t >= 0.0,
            };
            if !ordered || !t.is_finite() {
                return Err(SurfaceError::UnsortedExpiry(t));
            }
            previous = Some(t);
        }
        if let Some(&bad) = vols.iter().find(|v| !v.is_finite() || **v < 0.0) {
            return Err(SurfaceError::InvalidVolatility(bad));
        }
        Ok(Self {
            id,
            currency_pair,
            expiries,
            vols,
        })
    }

    /// A surface with the same volatility at every expiry.
    pub fn flat(
        id: VolatilitiesId,
        currency_pair: CurrencyPair,
        vol: f64,
    ) -> Result<Self, SurfaceError> {
        Self::new(id, currency_pair, vec![0.0], vec![vol])
    }

    pub fn id(&self) -> &VolatilitiesId {
        &self.id
    }

    pub fn currency_pair(&self) -> &CurrencyPair {
        &self.currency_pair
    }

    pub fn expiries(&self) -> &[f64] {
        &self.expiries
    }

    /// Volatility at `expiry` (year fraction). NaN for a NaN expiry.
    pub fn volatility(&self, expiry: f64) -> f64 {
        if expiry.is_nan() {
            return f64::NAN;
        }
        let n = self.expiries.len();
        if expiry <= self.expiries[0] {
            return self.vols[0];
        }
        if expiry >= self.expiries[n - 1] {
            return self.vols[n - 1];
        }
        let i = self.expiries.partition_point(|&t| t <= expiry);
        let (t0, t1) = (self.expiries[i - 1], self.expiries[i]);
        let (v0, v1) = (self.vols[i - 1], self.vols[i]);
        v0 + (v1 - v0) * (expiry - t0) / (t1 - t0)
    }
}
