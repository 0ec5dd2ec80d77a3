//! Exchange Core — Ledger, Order Book & Settlement
//!
//! An on-chain decentralized exchange core: users deposit a native currency
//! or separately-issued tokens, post resting orders to swap one for the
//! other, fill each other's orders, and cancel what hasn't settled. Every
//! trade skims a fee to a designated account, and every ledger-affecting
//! action appends to an observable event log.
//!
//! # Modules
//! - `errors`: the exchange and token-collaborator error taxonomy
//! - `events`: event records and the append-only event log
//! - `token`: the token collaborator capability interface
//! - `ledger`: per-asset, per-user custodial balances
//! - `orderbook`: the set of orders ever created and their terminal status
//! - `engine`: the matching/settlement engine
//! - `exchange`: the facade owning the stores and the fee configuration
//!
//! Each public operation is its own transaction boundary: it either applies
//! fully or aborts with a distinct error and no observable effect.

pub mod engine;
pub mod errors;
pub mod events;
pub mod exchange;
pub mod ledger;
pub mod orderbook;
pub mod token;

pub use engine::{FeeConfig, MatchingEngine};
pub use errors::{ExchangeError, TokenError};
pub use events::{EventLog, ExchangeEvent};
pub use exchange::{Exchange, ExchangeConfig};
pub use ledger::BalanceLedger;
pub use orderbook::{Order, OrderBook, OrderStatus};
pub use token::{InMemoryToken, TokenContract};
