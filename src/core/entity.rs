use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a legal entity that a monetary breakdown is keyed by.
///
/// Typically a scheme-qualified id such as `"OG-Ticker~ACME"`, but any
/// string is accepted.
///
/// # Examples
///
/// ```
/// use scenario_results::core::entity::EntityId;
///
/// let a = EntityId::new("EntityA");
/// let b = EntityId::new("EntityB");
/// assert_ne!(a, b);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this entity ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
