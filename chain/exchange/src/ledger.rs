//! Balance ledger — per-asset, per-user custodial balances
//!
//! The ledger exclusively owns every balance entry. Entries are created
//! implicitly on first credit, mutated only through `credit`/`debit`, and
//! never deleted: a zero balance is a valid resting state, not an absence.
//! No operation may leave an entry negative; `Amount` is unsigned and
//! `debit` refuses to underflow.

use std::collections::HashMap;

use crate::errors::ExchangeError;
use types::{AccountId, Amount, Asset};

/// Custodial balance store keyed by (asset, user).
#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: HashMap<(Asset, AccountId), Amount>,
}

impl BalanceLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            balances: HashMap::new(),
        }
    }

    /// Tracked balance for (asset, user). Returns 0 for unknown keys.
    pub fn balance_of(&self, asset: Asset, user: &AccountId) -> Amount {
        self.balances.get(&(asset, *user)).copied().unwrap_or(0)
    }

    /// Credit with overflow protection.
    pub(crate) fn credit(
        &mut self,
        asset: Asset,
        user: &AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let entry = self.balances.entry((asset, *user)).or_insert(0);
        let new_balance = entry.checked_add(amount).ok_or(ExchangeError::Overflow)?;
        *entry = new_balance;
        Ok(new_balance)
    }

    /// Debit with underflow protection.
    ///
    /// Fails with `InsufficientBalance` rather than driving the entry
    /// negative. The entry is kept even when it reaches zero.
    pub(crate) fn debit(
        &mut self,
        asset: Asset,
        user: &AccountId,
        amount: Amount,
    ) -> Result<Amount, ExchangeError> {
        let available = self.balance_of(asset, user);
        if available < amount {
            return Err(ExchangeError::InsufficientBalance {
                asset,
                required: amount,
                available,
            });
        }
        let new_balance = available - amount;
        self.balances.insert((asset, *user), new_balance);
        Ok(new_balance)
    }

    /// Overwrite an entry. Used only by staged settlement commit, after
    /// every step of the settlement has already validated.
    pub(crate) fn set_balance(&mut self, asset: Asset, user: &AccountId, amount: Amount) {
        self.balances.insert((asset, *user), amount);
    }
}
