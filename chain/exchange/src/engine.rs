//! Matching engine — the single settlement path
//!
//! The engine owns no state of its own: it orchestrates one fill across the
//! balance ledger and the order book as an indivisible unit. Balance moves
//! accumulate in a staged view and are written back only once every leg has
//! validated, so a late failure (an under-collateralized maker, say) leaves
//! no partial state and the order stays open and fillable later.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ExchangeError;
use crate::events::{ExchangeEvent, Trade};
use crate::ledger::BalanceLedger;
use crate::orderbook::OrderBook;
use types::{AccountId, Amount, Asset, OrderId};

/// Fee configuration, fixed at initialization.
///
/// The rate is an integer percentage of the amount the filler gives up,
/// charged on top of the order's requested amount and credited to the fee
/// recipient in the same asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub fee_account: AccountId,
    pub fee_percent: u32,
}

/// Settlement coordinator over the order book and balance ledger.
#[derive(Debug, Clone, Copy)]
pub struct MatchingEngine {
    fee: FeeConfig,
}

impl MatchingEngine {
    pub fn new(fee: FeeConfig) -> Self {
        Self { fee }
    }

    pub fn fee_account(&self) -> &AccountId {
        &self.fee.fee_account
    }

    pub fn fee_percent(&self) -> u32 {
        self.fee.fee_percent
    }

    /// Fill an open order on behalf of `filler`.
    ///
    /// Validation order: unknown id, already filled, already cancelled.
    /// Self-fills are permitted. On success the order is terminally filled
    /// and a `Trade` event is returned.
    pub(crate) fn fill(
        &self,
        ledger: &mut BalanceLedger,
        book: &mut OrderBook,
        order_id: OrderId,
        filler: AccountId,
        current_time: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let order = book
            .order(order_id)
            .ok_or(ExchangeError::OrderNotFound { id: order_id })?
            .clone();

        if book.is_filled(order_id) {
            return Err(ExchangeError::AlreadyFilled { id: order_id });
        }
        if book.is_cancelled(order_id) {
            return Err(ExchangeError::AlreadyCancelled { id: order_id });
        }

        // Get leg: what the maker receives and the filler supplies.
        // Give leg: what the maker supplies and the filler receives.
        let maker = order.maker;
        let (asset_get, amount_get) = (order.asset_to_receive, order.amount_to_receive);
        let (asset_give, amount_give) = (order.asset_to_give, order.amount_to_give);

        // Integer floor; the filler pays the requested amount plus the fee.
        let fee = amount_get
            .checked_mul(self.fee.fee_percent as Amount)
            .ok_or(ExchangeError::Overflow)?
            / 100;
        let charge = amount_get.checked_add(fee).ok_or(ExchangeError::Overflow)?;

        // Each step observes the preceding steps' effects, which keeps
        // self-fills and orders quoting the same asset on both legs exact.
        let mut settlement = Settlement::new();
        settlement.debit(ledger, asset_get, &filler, charge)?;
        settlement.credit(ledger, asset_get, &maker, amount_get)?;
        settlement.credit(ledger, asset_get, &self.fee.fee_account, fee)?;
        settlement.debit(ledger, asset_give, &maker, amount_give)?;
        settlement.credit(ledger, asset_give, &filler, amount_give)?;
        settlement.commit(ledger);

        book.mark_filled(order_id);

        info!(%order_id, %maker, %filler, %fee, "order filled");

        Ok(ExchangeEvent::Trade(Trade {
            id: order.id,
            maker,
            asset_to_receive: asset_get,
            amount_to_receive: amount_get,
            asset_to_give: asset_give,
            amount_to_give: amount_give,
            filler,
            timestamp: current_time,
        }))
    }
}

/// Staged balance view over the ledger.
///
/// Reads fall through to the ledger until a key has been touched; writes
/// land in the scratch map. `commit` is the only thing that mutates the
/// ledger, and it cannot fail, so a settlement is all-or-nothing.
struct Settlement {
    staged: HashMap<(Asset, AccountId), Amount>,
}

impl Settlement {
    fn new() -> Self {
        Self {
            staged: HashMap::new(),
        }
    }

    fn balance(&self, ledger: &BalanceLedger, asset: Asset, user: &AccountId) -> Amount {
        self.staged
            .get(&(asset, *user))
            .copied()
            .unwrap_or_else(|| ledger.balance_of(asset, user))
    }

    fn credit(
        &mut self,
        ledger: &BalanceLedger,
        asset: Asset,
        user: &AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let balance = self.balance(ledger, asset, user);
        let new_balance = balance.checked_add(amount).ok_or(ExchangeError::Overflow)?;
        self.staged.insert((asset, *user), new_balance);
        Ok(())
    }

    fn debit(
        &mut self,
        ledger: &BalanceLedger,
        asset: Asset,
        user: &AccountId,
        amount: Amount,
    ) -> Result<(), ExchangeError> {
        let available = self.balance(ledger, asset, user);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                asset,
                required: amount,
                available,
            });
        }
        self.staged.insert((asset, *user), available - amount);
        Ok(())
    }

    fn commit(self, ledger: &mut BalanceLedger) {
        for ((asset, user), balance) in self.staged {
            ledger.set_balance(asset, &user, balance);
        }
    }
}
