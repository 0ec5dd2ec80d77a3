//! Exchange events
//!
//! Events are the append-only, externally observable record of every
//! ledger-affecting action. Each is a flat record of the operation's final,
//! already-validated arguments plus derived values (resulting balance, fee,
//! timestamp), emitted exactly once per successful mutating call and never
//! on a failed one. Clients replay the log to reconstruct state.

use serde::{Deserialize, Serialize};
use types::{AccountId, Amount, Asset, OrderId};

/// Funds credited to a user's exchange balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub asset: Asset,
    pub user: AccountId,
    pub amount: Amount,
    pub resulting_balance: Amount,
}

/// Funds debited from a user's exchange balance and released
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdraw {
    pub asset: Asset,
    pub user: AccountId,
    pub amount: Amount,
    pub resulting_balance: Amount,
}

/// A new resting order was posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub maker: AccountId,
    pub asset_to_receive: Asset,
    pub amount_to_receive: Amount,
    pub asset_to_give: Asset,
    pub amount_to_give: Amount,
    pub timestamp: i64,
}

/// An open order was cancelled by its maker
///
/// Carries the order's original terms plus the cancellation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cancel {
    pub id: OrderId,
    pub maker: AccountId,
    pub asset_to_receive: Asset,
    pub amount_to_receive: Amount,
    pub asset_to_give: Asset,
    pub amount_to_give: Amount,
    pub timestamp: i64,
}

/// An open order was filled and settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: OrderId,
    pub maker: AccountId,
    pub asset_to_receive: Asset,
    pub amount_to_receive: Amount,
    pub asset_to_give: Asset,
    pub amount_to_give: Amount,
    pub filler: AccountId,
    pub timestamp: i64,
}

/// Enum wrapper for all exchange events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeEvent {
    Deposit(Deposit),
    Withdraw(Withdraw),
    Order(Order),
    Cancel(Cancel),
    Trade(Trade),
}

/// Append-only event log.
///
/// Write-only from the core's perspective: operations push, observers read
/// or drain. Nothing is ever rewritten in place.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<ExchangeEvent>,
}

impl EventLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append an event. Internal: only successful operations record.
    pub(crate) fn record(&mut self, event: ExchangeEvent) {
        self.entries.push(event);
    }

    /// Get all emitted events.
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.entries
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        std::mem::take(&mut self.entries)
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
