//! Order book — the set of orders ever created and their terminal status
//!
//! Core order fields are immutable once stored. Status is tracked out of
//! band as two disjoint facts per id, `filled` and `cancelled`: at most one
//! of them ever transitions to true, and once true it is permanent. Orders
//! are never removed; a settled order's terms stay queryable forever.
//!
//! Posting is free: no balance check happens at creation time. Sufficiency
//! is enforced only when an order is filled.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ExchangeError;
use crate::events::{self, ExchangeEvent};
use types::{AccountId, Amount, Asset, OrderId};

/// Immutable order record, fixed at creation.
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

/// Status read-model for a single order id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub exists: bool,
    pub filled: bool,
    pub cancelled: bool,
}

/// Store of all orders ever created.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: HashMap<OrderId, Order>,
    filled: HashSet<OrderId>,
    cancelled: HashSet<OrderId>,
    /// Next id to allocate; ids are dense, 1-based, never reused.
    next_id: u64,
}

impl OrderBook {
    /// Create an empty order book.
    pub fn new() -> Self {
        Self {
            orders: HashMap::new(),
            filled: HashSet::new(),
            cancelled: HashSet::new(),
            next_id: 1,
        }
    }

    /// Post a new order and emit its `Order` event.
    pub(crate) fn create(
        &mut self,
        maker: AccountId,
        asset_to_receive: Asset,
        amount_to_receive: Amount,
        asset_to_give: Asset,
        amount_to_give: Amount,
        current_time: i64,
    ) -> ExchangeEvent {
        let id = OrderId::new(self.next_id);
        self.next_id += 1;

        let order = Order {
            id,
            maker,
            asset_to_receive,
            amount_to_receive,
            asset_to_give,
            amount_to_give,
            timestamp: current_time,
        };
        self.orders.insert(id, order);

        info!(%id, %maker, "order created");

        ExchangeEvent::Order(events::Order {
            id,
            maker,
            asset_to_receive,
            amount_to_receive,
            asset_to_give,
            amount_to_give,
            timestamp: current_time,
        })
    }

    /// Cancel an open order.
    ///
    /// Only the maker may cancel, and only while the order is still open.
    pub(crate) fn cancel(
        &mut self,
        order_id: OrderId,
        requester: &AccountId,
        current_time: i64,
    ) -> Result<ExchangeEvent, ExchangeError> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or(ExchangeError::OrderNotFound { id: order_id })?;

        if order.maker != *requester {
            return Err(ExchangeError::Unauthorized);
        }
        if self.filled.contains(&order_id) {
            return Err(ExchangeError::AlreadyFilled { id: order_id });
        }
        if self.cancelled.contains(&order_id) {
            return Err(ExchangeError::AlreadyCancelled { id: order_id });
        }

        self.cancelled.insert(order_id);

        info!(%order_id, "order cancelled");

        Ok(ExchangeEvent::Cancel(events::Cancel {
            id: order.id,
            maker: order.maker,
            asset_to_receive: order.asset_to_receive,
            amount_to_receive: order.amount_to_receive,
            asset_to_give: order.asset_to_give,
            amount_to_give: order.amount_to_give,
            timestamp: current_time,
        }))
    }

    /// Look up an order's immutable record.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.get(&order_id)
    }

    /// Number of orders ever created.
    pub fn order_count(&self) -> u64 {
        self.orders.len() as u64
    }

    /// Status facts for an id. Never fails; unknown ids simply don't exist.
    pub fn status_of(&self, order_id: OrderId) -> OrderStatus {
        OrderStatus {
            exists: self.orders.contains_key(&order_id),
            filled: self.filled.contains(&order_id),
            cancelled: self.cancelled.contains(&order_id),
        }
    }

    pub(crate) fn is_filled(&self, order_id: OrderId) -> bool {
        self.filled.contains(&order_id)
    }

    pub(crate) fn is_cancelled(&self, order_id: OrderId) -> bool {
        self.cancelled.contains(&order_id)
    }

    /// Flip the `filled` fact. Called by the matching engine only after the
    /// whole settlement has committed.
    pub(crate) fn mark_filled(&mut self, order_id: OrderId) {
        self.filled.insert(order_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::units;

    fn token() -> Asset {
        Asset::Token(types::TokenId::new())
    }

    fn make(book: &mut OrderBook, maker: AccountId) -> OrderId {
        let event = book.create(maker, token(), units(1), Asset::Native, units(1), 1000);
        match event {
            ExchangeEvent::Order(o) => o.id,
            other => panic!("expected Order event, got {other:?}"),
        }
    }

    #[test]
    fn test_sequential_ids_from_one() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();

        for expected in 1..=5u64 {
            let id = make(&mut book, maker);
            assert_eq!(id, OrderId::new(expected));
        }
        assert_eq!(book.order_count(), 5);
    }

    #[test]
    fn test_create_stores_immutable_terms() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let want = token();

        book.create(maker, want, units(1), Asset::Native, units(2), 1234);

        let order = book.order(OrderId::new(1)).unwrap();
        assert_eq!(order.maker, maker);
        assert_eq!(order.asset_to_receive, want);
        assert_eq!(order.amount_to_receive, units(1));
        assert_eq!(order.asset_to_give, Asset::Native);
        assert_eq!(order.amount_to_give, units(2));
        assert_eq!(order.timestamp, 1234);
    }

    #[test]
    fn test_create_emits_order_event() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let want = token();

        let event = book.create(maker, want, units(1), Asset::Native, units(1), 99);
        let ExchangeEvent::Order(order) = event else {
            panic!("expected Order event");
        };
        assert_eq!(order.id, OrderId::new(1));
        assert_eq!(order.maker, maker);
        assert_eq!(order.timestamp, 99);
    }

    #[test]
    fn test_cancel_sets_terminal_flag() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = make(&mut book, maker);

        let event = book.cancel(id, &maker, 2000).unwrap();
        let ExchangeEvent::Cancel(cancel) = event else {
            panic!("expected Cancel event");
        };
        assert_eq!(cancel.id, id);
        assert_eq!(cancel.timestamp, 2000, "cancellation timestamp, not creation");

        let status = book.status_of(id);
        assert!(status.exists && status.cancelled && !status.filled);
    }

    #[test]
    fn test_cancel_unknown_order() {
        let mut book = OrderBook::new();
        let requester = AccountId::new();
        let result = book.cancel(OrderId::new(99999), &requester, 0);
        assert_eq!(
            result,
            Err(ExchangeError::OrderNotFound {
                id: OrderId::new(99999)
            })
        );
    }

    #[test]
    fn test_cancel_requires_maker() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let stranger = AccountId::new();
        let id = make(&mut book, maker);

        let result = book.cancel(id, &stranger, 0);
        assert_eq!(result, Err(ExchangeError::Unauthorized));

        // Order remains open
        let status = book.status_of(id);
        assert!(status.exists && !status.cancelled && !status.filled);
    }

    #[test]
    fn test_cancel_twice_rejected() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = make(&mut book, maker);

        book.cancel(id, &maker, 0).unwrap();
        let result = book.cancel(id, &maker, 0);
        assert_eq!(result, Err(ExchangeError::AlreadyCancelled { id }));
    }

    #[test]
    fn test_cancel_filled_order_rejected() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = make(&mut book, maker);

        book.mark_filled(id);
        let result = book.cancel(id, &maker, 0);
        assert_eq!(result, Err(ExchangeError::AlreadyFilled { id }));
    }

    #[test]
    fn test_terms_survive_cancellation() {
        let mut book = OrderBook::new();
        let maker = AccountId::new();
        let id = make(&mut book, maker);

        book.cancel(id, &maker, 0).unwrap();

        let order = book.order(id).unwrap();
        assert_eq!(order.maker, maker);
        assert_eq!(order.amount_to_receive, units(1));
    }

    #[test]
    fn test_status_of_unknown_id() {
        let book = OrderBook::new();
        let status = book.status_of(OrderId::new(1));
        assert_eq!(
            status,
            OrderStatus {
                exists: false,
                filled: false,
                cancelled: false,
            }
        );
    }
}
