use crate::core::currency::{CurrencyCode, FxError, FxRateProvider};
use crate::core::outcome::{FailureKind, FailureReason, Outcome};

/// A value that can be re-expressed in another currency.
///
/// Conversion is a pure function of the value, the target currency and
/// the rate provider. The provider is always consulted, including when the
/// target equals the current currency.
pub trait FxConvertible: Sized {
    fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Result<Self, FxError>;
}

impl From<FxError> for FailureReason {
    fn from(err: FxError) -> Self {
        let kind = match err {
            FxError::InvalidPair(_) => FailureKind::InvalidInput,
            FxError::RateNotFound { .. }
            | FxError::InvalidRate { .. }
            | FxError::Overflow { .. } => FailureKind::CurrencyConversion,
        };
        FailureReason::new(kind, err.to_string())
    }
}

impl<T: FxConvertible> Outcome<T> {
    /// Re-express a successful value. A failed outcome is returned as is;
    /// a provider error becomes a `CurrencyConversion` failure.
    pub fn converted_to<P: FxRateProvider + ?Sized>(
        &self,
        currency: &CurrencyCode,
        provider: &P,
    ) -> Outcome<T> {
        match self {
            Outcome::Success(value) => match value.converted_to(currency, provider) {
                Ok(converted) => Outcome::Success(converted),
                Err(err) => {
                    log::warn!("re-expression into {} failed: {}", currency, err);
                    Outcome::Failure(err.into())
                }
            },
            Outcome::Failure(reason) => Outcome::Failure(reason.clone()),
        }
    }
}
