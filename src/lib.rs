//! # scenario-results
//!
//! Results of running a batch of risk calculations over a set of targets,
//! with the market data lookups those calculations depend on and the
//! re-expression of monetary results in other currencies.
//!
//! ## Architecture
//!
//! - **core** — Foundational types: currencies, FX rates, entities, outcomes
//! - **calc** — Measures, column definitions, runtime-typed values, the results matrix
//! - **market** — Volatility identifiers and surfaces, market data sources, lookups
//! - **money** — Currency amounts, jump-to-default breakdowns, FX conversion
//! - **io** — JSON input and output formats used by the CLI
//! - **simulation** — Random results generation for benchmarks and testing

pub mod calc;
pub mod core;
pub mod io;
pub mod market;
pub mod money;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::calc::column::ColumnDefinition;
    pub use crate::calc::measure::Measure;
    pub use crate::calc::results::{Results, ResultsError};
    pub use crate::calc::value::{CalcValue, MeasureValue, ValueType};
    pub use crate::core::currency::{CurrencyCode, CurrencyPair, FxRateProvider, FxRateTable};
    pub use crate::core::entity::EntityId;
    pub use crate::core::outcome::{FailureKind, FailureReason, Outcome};
    pub use crate::market::lookup::{DefaultFxOptionLookup, FunctionRequirements, FxOptionLookup};
    pub use crate::market::market_data::{ImmutableMarketData, MarketData};
    pub use crate::market::surface::{FxVolatilitySurface, VolatilitiesId};
    pub use crate::money::amount::CurrencyAmount;
    pub use crate::money::convertible::FxConvertible;
    pub use crate::money::jump_to_default::JumpToDefault;
}
