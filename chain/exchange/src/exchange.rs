//! Exchange facade — the public operation surface
//!
//! Owns the balance ledger, the order book, the event log, the registered
//! token collaborators, and the immutable fee configuration. Every public
//! operation runs to completion as one atomic unit: on failure nothing is
//! persisted and no event is recorded.
//!
//! Native-currency custody is held directly, so there is deliberately no
//! entry point that accepts native value other than [`Exchange::deposit_native`];
//! unsolicited transfers are unrepresentable rather than rejected at runtime.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::engine::{FeeConfig, MatchingEngine};
use crate::errors::ExchangeError;
use crate::events::{self, EventLog, ExchangeEvent};
use crate::ledger::BalanceLedger;
use crate::orderbook::{Order, OrderBook, OrderStatus};
use crate::token::TokenContract;
use types::{AccountId, Amount, Asset, OrderId, TokenId};

/// Configuration captured at initialization, immutable thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeConfig {
    /// Recipient of every trade fee
    pub fee_account: AccountId,
    /// Fee rate as an integer percentage of the filler's payment leg
    pub fee_percent: u32,
}

/// The exchange core.
#[derive(Debug)]
pub struct Exchange {
    ledger: BalanceLedger,
    book: OrderBook,
    engine: MatchingEngine,
    /// Registered token collaborators, keyed by their on-chain handle
    tokens: HashMap<TokenId, Box<dyn TokenContract>>,
    /// The exchange's own identity on token ledgers (custody account)
    custody: AccountId,
    events: EventLog,
}

impl Exchange {
    /// Initialize an exchange with its fee configuration.
    pub fn new(config: ExchangeConfig) -> Self {
        Self {
            ledger: BalanceLedger::new(),
            book: OrderBook::new(),
            engine: MatchingEngine::new(FeeConfig {
                fee_account: config.fee_account,
                fee_percent: config.fee_percent,
            }),
            tokens: HashMap::new(),
            custody: AccountId::new(),
            events: EventLog::new(),
        }
    }

    // ───────────────────────── Configuration ─────────────────────────

    /// The designated fee recipient.
    pub fn fee_account(&self) -> &AccountId {
        self.engine.fee_account()
    }

    /// The fee rate, in integer percent.
    pub fn fee_percent(&self) -> u32 {
        self.engine.fee_percent()
    }

    /// The exchange's custody identity on token ledgers.
    pub fn custody_account(&self) -> &AccountId {
        &self.custody
    }

    // ───────────────────────── Token registry ─────────────────────────

    /// Register a token collaborator under its handle.
    ///
    /// Deposits and withdrawals of `Asset::Token(id)` dispatch to the
    /// collaborator registered for `id`; unregistered handles are rejected.
    pub fn register_token(&mut self, id: TokenId, token: Box<dyn TokenContract>) {
        self.tokens.insert(id, token);
    }

    /// Read-only access to a registered collaborator.
    pub fn token(&self, id: &TokenId) -> Option<&dyn TokenContract> {
        self.tokens.get(id).map(|boxed| boxed.as_ref())
    }

    /// Mutable access to a registered collaborator.
    ///
    /// Users act on the token directly (e.g. to approve the exchange's
    /// custody account before depositing).
    pub fn token_mut(&mut self, id: &TokenId) -> Option<&mut (dyn TokenContract + 'static)> {
        self.tokens.get_mut(id).map(|boxed| boxed.as_mut())
    }

    // ───────────────────────── Deposits & withdrawals ─────────────────────────

    /// Deposit native currency.
    ///
    /// `value` is the amount attached to the call; custody of native value
    /// is held directly, so no external transfer is involved.
    pub fn deposit_native(
        &mut self,
        user: AccountId,
        value: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let balance = self.ledger.credit(Asset::Native, &user, value)?;

        debug!(%user, %value, "native deposit");

        let event = ExchangeEvent::Deposit(events::Deposit {
            asset: Asset::Native,
            user,
            amount: value,
            resulting_balance: balance,
        });
        self.events.record(event.clone());
        Ok(event)
    }

    /// Deposit a token, pulling custody through the collaborator.
    ///
    /// The user must have pre-authorized the exchange's custody account for
    /// at least `amount`. The external pull happens before the internal
    /// credit: funds are recognized only once actually received.
    pub fn deposit_token(
        &mut self,
        asset: Asset,
        user: AccountId,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let token_id = match asset {
            Asset::Native => return Err(ExchangeError::InvalidAsset),
            Asset::Token(id) => id,
        };
        let custody = self.custody;
        let token = self
            .tokens
            .get_mut(&token_id)
            .ok_or(ExchangeError::TokenNotRegistered { token: token_id })?;

        token.transfer_from(&custody, &user, &custody, amount)?;

        let balance = match self.ledger.credit(asset, &user, amount) {
            Ok(balance) => balance,
            Err(err) => {
                // Return the pulled funds; custody holds exactly this
                // amount from the transfer above, so the return cannot fail.
                if let Some(token) = self.tokens.get_mut(&token_id) {
                    let _ = token.transfer(&custody, &user, amount);
                }
                return Err(err);
            }
        };

        debug!(%user, %asset, %amount, "token deposit");

        let event = ExchangeEvent::Deposit(events::Deposit {
            asset,
            user,
            amount,
            resulting_balance: balance,
        });
        self.events.record(event.clone());
        Ok(event)
    }

    /// Withdraw a tracked balance back to the user.
    ///
    /// The debit is applied before the external release, so a collaborator
    /// that calls back in observes the already-reduced balance. A failed
    /// release restores the debit and aborts the call.
    pub fn withdraw(
        &mut self,
        asset: Asset,
        user: AccountId,
        amount: Amount,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let balance = self.ledger.debit(asset, &user, amount)?;

        if let Asset::Token(token_id) = asset {
            let custody = self.custody;
            let release = self
                .tokens
                .get_mut(&token_id)
                .ok_or(ExchangeError::TokenNotRegistered { token: token_id })
                .and_then(|token| {
                    token
                        .transfer(&custody, &user, amount)
                        .map_err(ExchangeError::from)
                });
            if let Err(err) = release {
                // Undo the debit: the amount was just subtracted, so the
                // re-credit cannot overflow.
                let _ = self.ledger.credit(asset, &user, amount);
                return Err(err);
            }
        }
        // Native custody is held directly: the debit is the release.

        debug!(%user, %asset, %amount, "withdrawal");

        let event = ExchangeEvent::Withdraw(events::Withdraw {
            asset,
            user,
            amount,
            resulting_balance: balance,
        });
        self.events.record(event.clone());
        Ok(event)
    }

    /// Tracked balance for (asset, user). Returns 0 for unknown keys.
    pub fn balance_of(&self, asset: Asset, user: &AccountId) -> Amount {
        self.ledger.balance_of(asset, user)
    }

    // ───────────────────────── Orders ─────────────────────────

    /// Post a resting order. Posting is free: the maker's balance is not
    /// checked until fill time.
    pub fn make_order(
        &mut self,
        maker: AccountId,
        asset_to_receive: Asset,
        amount_to_receive: Amount,
        asset_to_give: Asset,
        amount_to_give: Amount,
        current_time: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let event = self.book.create(
            maker,
            asset_to_receive,
            amount_to_receive,
            asset_to_give,
            amount_to_give,
            current_time,
        );
        self.events.record(event.clone());
        Ok(event)
    }

    /// Cancel an open order. Only the maker may cancel.
    pub fn cancel_order(
        &mut self,
        order_id: OrderId,
        requester: AccountId,
        current_time: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let event = self.book.cancel(order_id, &requester, current_time)?;
        self.events.record(event.clone());
        Ok(event)
    }

    /// Fill an open order, settling both legs and the fee atomically.
    pub fn fill_order(
        &mut self,
        order_id: OrderId,
        filler: AccountId,
        current_time: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let event = self
            .engine
            .fill(&mut self.ledger, &mut self.book, order_id, filler, current_time)?;
        self.events.record(event.clone());
        Ok(event)
    }

    /// Status facts for an order id.
    pub fn status_of(&self, order_id: OrderId) -> OrderStatus {
        self.book.status_of(order_id)
    }

    /// An order's immutable record.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.book.order(order_id)
    }

    /// Number of orders ever created.
    pub fn order_count(&self) -> u64 {
        self.book.order_count()
    }

    // ───────────────────────── Events ─────────────────────────

    /// All emitted events, in order.
    pub fn events(&self) -> &[ExchangeEvent] {
        self.events.events()
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<ExchangeEvent> {
        self.events.drain_events()
    }
}
