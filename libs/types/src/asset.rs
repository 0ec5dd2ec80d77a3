//! Asset identification and base-unit amounts
//!
//! Every balance and order field that names an asset uses [`Asset`]: either
//! the chain's native currency (the reserved sentinel) or the handle of a
//! fungible-token collaborator. The ledger never hard-codes which asset is
//! "the" currency beyond recognizing the sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ids::TokenId;

/// Amount in an asset's smallest unit.
///
/// Both deployed assets use 18 fractional decimal digits, so one whole unit
/// is `10^18` base units. Amounts are unsigned by construction; all
/// arithmetic on them must be checked, never wrapping.
pub type Amount = u128;

/// Base units per whole unit (18 fractional decimal digits).
pub const BASE_UNIT: Amount = 1_000_000_000_000_000_000;

/// Asset identifier: the native currency sentinel or a specific token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "token", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Asset {
    /// The chain's native currency (custody held directly by the exchange)
    Native,
    /// A fungible token managed by an external collaborator contract
    Token(TokenId),
}

impl Asset {
    /// Check whether this is the native-currency sentinel.
    pub fn is_native(&self) -> bool {
        matches!(self, Asset::Native)
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Asset::Native => write!(f, "native"),
            Asset::Token(id) => write!(f, "token:{id}"),
        }
    }
}

/// Convert whole units to base units (18 decimals).
///
/// Convenience for constructing human-scale amounts; `units(1)` is one
/// whole token or one whole unit of the native currency.
pub fn units(whole: u64) -> Amount {
    whole as Amount * BASE_UNIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_is_sentinel() {
        assert!(Asset::Native.is_native());
        assert!(!Asset::Token(TokenId::new()).is_native());
    }

    #[test]
    fn test_units_scale() {
        assert_eq!(units(1), BASE_UNIT);
        assert_eq!(units(100), 100 * BASE_UNIT);
    }

    #[test]
    fn test_asset_serialization_roundtrip() {
        let token = Asset::Token(TokenId::new());
        let json = serde_json::to_string(&token).unwrap();
        let deserialized: Asset = serde_json::from_str(&json).unwrap();
        assert_eq!(token, deserialized);

        let native_json = serde_json::to_string(&Asset::Native).unwrap();
        assert_eq!(native_json, r#"{"kind":"NATIVE"}"#);
    }

    #[test]
    fn test_display() {
        assert_eq!(Asset::Native.to_string(), "native");
        let id = TokenId::new();
        assert_eq!(Asset::Token(id).to_string(), format!("token:{id}"));
    }
}
