//! Market data identifiers, sources and lookups.

pub mod lookup;
pub mod market_data;
pub mod surface;
