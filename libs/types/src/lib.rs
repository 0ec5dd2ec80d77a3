//! Core Type Definitions
//!
//! Shared primitives for the on-chain exchange:
//! - `ids`: unique identifiers for accounts, tokens, and orders
//! - `asset`: the asset identifier and the base-unit amount type
//!
//! These types carry no business logic; balance accounting and order
//! lifecycle rules live in the `exchange` crate.

pub mod asset;
pub mod ids;

pub use asset::{units, Amount, Asset, BASE_UNIT};
pub use ids::{AccountId, OrderId, TokenId};
