//! Identifier types for agents and goods.
//!
//! Households are numbered (`0`, `1`, ...), businesses carry a `B` prefix
//! (`B0`, `B1`, ...) and the single government is `GOV`. The textual form
//! is what exporters write and what the dashboard displays, so it is also
//! the serialized form.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Textual tag of the government agent.
const GOVERNMENT_TAG: &str = "GOV";

/// Prefix of business identifiers.
const BUSINESS_PREFIX: char = 'B';

/// Unique identifier of an agent in the economy.
///
/// Serialized through its textual form; records that embed it declare the
/// field as `string` for the `TypeScript` bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AgentId {
    /// A household, numbered in population order.
    Household(u32),
    /// A business, numbered in population order.
    Business(u32),
    /// The singleton government.
    Government,
}

impl AgentId {
    /// Return the role this identifier belongs to.
    pub const fn role(self) -> crate::enums::AgentRole {
        match self {
            Self::Household(_) => crate::enums::AgentRole::Household,
            Self::Business(_) => crate::enums::AgentRole::Business,
            Self::Government => crate::enums::AgentRole::Government,
        }
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Household(n) => write!(f, "{n}"),
            Self::Business(n) => write!(f, "{BUSINESS_PREFIX}{n}"),
            Self::Government => f.write_str(GOVERNMENT_TAG),
        }
    }
}

/// Error returned when a string is not a valid [`AgentId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAgentIdError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseAgentIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid agent id: {:?}", self.input)
    }
}

impl std::error::Error for ParseAgentIdError {}

impl FromStr for AgentId {
    type Err = ParseAgentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == GOVERNMENT_TAG {
            return Ok(Self::Government);
        }
        let invalid = || ParseAgentIdError {
            input: s.to_owned(),
        };
        s.strip_prefix(BUSINESS_PREFIX).map_or_else(
            || s.parse::<u32>().map(Self::Household).map_err(|_err| invalid()),
            |rest| rest.parse::<u32>().map(Self::Business).map_err(|_err| invalid()),
        )
    }
}

impl From<AgentId> for String {
    fn from(id: AgentId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for AgentId {
    type Error = ParseAgentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Name of a tradable good, unique within a market.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct GoodId(pub String);

impl GoodId {
    /// Create a good identifier from its name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow the good's name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GoodId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::enums::AgentRole;

    #[test]
    fn agent_ids_display_like_the_exports() {
        assert_eq!(AgentId::Household(7).to_string(), "7");
        assert_eq!(AgentId::Business(3).to_string(), "B3");
        assert_eq!(AgentId::Government.to_string(), "GOV");
    }

    #[test]
    fn agent_ids_parse_back() {
        for id in [AgentId::Household(12), AgentId::Business(0), AgentId::Government] {
            let parsed: AgentId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
        assert!("B".parse::<AgentId>().is_err());
        assert!("gov".parse::<AgentId>().is_err());
        assert!("-1".parse::<AgentId>().is_err());
    }

    #[test]
    fn agent_ids_serialize_as_strings() {
        let json = serde_json::to_string(&AgentId::Business(4)).unwrap();
        assert_eq!(json, "\"B4\"");
        let back: AgentId = serde_json::from_str("\"GOV\"").unwrap();
        assert_eq!(back, AgentId::Government);
    }

    #[test]
    fn roles_follow_ids() {
        assert_eq!(AgentId::Household(0).role(), AgentRole::Household);
        assert_eq!(AgentId::Business(0).role(), AgentRole::Business);
        assert_eq!(AgentId::Government.role(), AgentRole::Government);
    }

    #[test]
    fn households_sort_before_businesses() {
        let mut ids = vec![AgentId::Government, AgentId::Business(1), AgentId::Household(5)];
        ids.sort();
        assert_eq!(
            ids,
            vec![AgentId::Household(5), AgentId::Business(1), AgentId::Government]
        );
    }
}
