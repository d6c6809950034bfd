//! Monetary values and their re-expression in other currencies.

pub mod amount;
pub mod convertible;
pub mod jump_to_default;
