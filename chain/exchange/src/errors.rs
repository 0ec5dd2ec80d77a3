//! Exchange error taxonomy
//!
//! Every failure aborts the entire call with no state change and no event;
//! each maps to a distinct, externally observable rejection reason.

use thiserror::Error;
use types::{Amount, Asset, OrderId, TokenId};

/// Failures reported by a token collaborator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token balance insufficient for transfer")]
    InsufficientBalance,

    #[error("Allowance insufficient: owner has not authorized this amount")]
    InsufficientAllowance,
}

/// Exchange-core errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    #[error("Invalid asset: native currency must use the native deposit call")]
    InvalidAsset,

    #[error("Insufficient balance for {asset}: required {required}, available {available}")]
    InsufficientBalance {
        asset: Asset,
        required: Amount,
        available: Amount,
    },

    #[error("Unauthorized: caller is not the order's maker")]
    Unauthorized,

    #[error("Order not found: {id}")]
    OrderNotFound { id: OrderId },

    #[error("Order already filled: {id}")]
    AlreadyFilled { id: OrderId },

    #[error("Order already cancelled: {id}")]
    AlreadyCancelled { id: OrderId },

    #[error("Token not registered: {token}")]
    TokenNotRegistered { token: TokenId },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,

    #[error("Token collaborator error: {0}")]
    Token(#[from] TokenError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_balance_display() {
        let err = ExchangeError::InsufficientBalance {
            asset: Asset::Native,
            required: 100,
            available: 7,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance for native: required 100, available 7"
        );
    }

    #[test]
    fn test_order_not_found_display() {
        let err = ExchangeError::OrderNotFound {
            id: OrderId::new(99999),
        };
        assert!(err.to_string().contains("99999"));
    }

    #[test]
    fn test_exchange_error_from_token() {
        let token_err = TokenError::InsufficientAllowance;
        let err: ExchangeError = token_err.into();
        assert_eq!(err, ExchangeError::Token(TokenError::InsufficientAllowance));
    }
}
