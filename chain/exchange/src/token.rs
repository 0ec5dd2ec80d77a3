//! Token collaborator interface
//!
//! The exchange never re-implements token accounting; it moves token custody
//! through this narrow capability interface. Any concrete implementation
//! with standard fungible-ledger semantics is substitutable, which is also
//! what makes settlement deterministic to test.
//!
//! `caller` parameters are the explicit rendering of the implicit
//! transaction sender: `transfer` spends from the caller, `approve` grants
//! from the caller, `transfer_from` spends the `owner → caller` allowance.

use std::collections::HashMap;
use std::fmt;

use crate::errors::TokenError;
use types::{AccountId, Amount};

/// Capability interface of a fungible-token collaborator.
pub trait TokenContract: fmt::Debug {
    /// Balance held by `holder` on the token's own ledger.
    fn balance_of(&self, holder: &AccountId) -> Amount;

    /// Move `amount` from the caller's balance to `to`.
    fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Authorize `spender` to move up to `amount` from the caller's balance.
    /// Overwrites any prior allowance.
    fn approve(
        &mut self,
        caller: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;

    /// Move `amount` from `owner` to `to`, spending the `owner → caller`
    /// allowance. The allowance is decremented by `amount` on success.
    fn transfer_from(
        &mut self,
        caller: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError>;
}

/// In-memory reference token.
///
/// A fixed supply is minted to the deployer at construction; thereafter the
/// ledger only moves value between holders. Doubles as the deterministic
/// collaborator in the exchange test suites.
#[derive(Debug, Clone)]
pub struct InMemoryToken {
    name: String,
    symbol: String,
    total_supply: Amount,
    balances: HashMap<AccountId, Amount>,
    /// (owner, spender) -> remaining allowance
    allowances: HashMap<(AccountId, AccountId), Amount>,
}

impl InMemoryToken {
    /// Deploy a token, minting `total_supply` to `deployer`.
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        deployer: AccountId,
        total_supply: Amount,
    ) -> Self {
        let mut balances = HashMap::new();
        balances.insert(deployer, total_supply);
        Self {
            name: name.into(),
            symbol: symbol.into(),
            total_supply,
            balances,
            allowances: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Fractional decimal digits per whole unit.
    pub fn decimals(&self) -> u32 {
        18
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Remaining `owner → spender` allowance.
    pub fn allowance(&self, owner: &AccountId, spender: &AccountId) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn move_balance(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let from_balance = self.balances.get(from).copied().unwrap_or(0);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance);
        }
        self.balances.insert(*from, from_balance - amount);
        let to_balance = self.balances.entry(*to).or_insert(0);
        // Total supply is fixed, so the credited side cannot overflow.
        *to_balance += amount;
        Ok(())
    }
}

impl TokenContract for InMemoryToken {
    fn balance_of(&self, holder: &AccountId) -> Amount {
        self.balances.get(holder).copied().unwrap_or(0)
    }

    fn transfer(
        &mut self,
        caller: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    fn approve(
        &mut self,
        caller: &AccountId,
        spender: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        self.allowances.insert((*caller, *spender), amount);
        Ok(())
    }

    fn transfer_from(
        &mut self,
        caller: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(owner, caller);
        if allowance < amount {
            return Err(TokenError::InsufficientAllowance);
        }
        self.move_balance(owner, to, amount)?;
        self.allowances.insert((*owner, *caller), allowance - amount);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::units;

    fn deploy() -> (InMemoryToken, AccountId) {
        let deployer = AccountId::new();
        let token = InMemoryToken::new("ChanCoin", "CHANC", deployer, units(1_000_000));
        (token, deployer)
    }

    #[test]
    fn test_deployment_mints_supply_to_deployer() {
        let (token, deployer) = deploy();
        assert_eq!(token.name(), "ChanCoin");
        assert_eq!(token.symbol(), "CHANC");
        assert_eq!(token.decimals(), 18);
        assert_eq!(token.total_supply(), units(1_000_000));
        assert_eq!(token.balance_of(&deployer), units(1_000_000));
    }

    #[test]
    fn test_transfer_moves_balances() {
        let (mut token, deployer) = deploy();
        let receiver = AccountId::new();

        token.transfer(&deployer, &receiver, units(100)).unwrap();

        assert_eq!(token.balance_of(&deployer), units(999_900));
        assert_eq!(token.balance_of(&receiver), units(100));
    }

    #[test]
    fn test_transfer_insufficient_balance() {
        let (mut token, deployer) = deploy();
        let receiver = AccountId::new();

        let result = token.transfer(&receiver, &deployer, units(1));
        assert_eq!(result, Err(TokenError::InsufficientBalance));
        assert_eq!(token.balance_of(&deployer), units(1_000_000));
    }

    #[test]
    fn test_approve_overwrites_allowance() {
        let (mut token, deployer) = deploy();
        let spender = AccountId::new();

        token.approve(&deployer, &spender, units(100)).unwrap();
        assert_eq!(token.allowance(&deployer, &spender), units(100));

        token.approve(&deployer, &spender, units(30)).unwrap();
        assert_eq!(token.allowance(&deployer, &spender), units(30));
    }

    #[test]
    fn test_transfer_from_decrements_allowance() {
        let (mut token, deployer) = deploy();
        let spender = AccountId::new();
        let receiver = AccountId::new();

        token.approve(&deployer, &spender, units(100)).unwrap();
        token
            .transfer_from(&spender, &deployer, &receiver, units(40))
            .unwrap();

        assert_eq!(token.balance_of(&receiver), units(40));
        assert_eq!(token.allowance(&deployer, &spender), units(60));
    }

    #[test]
    fn test_transfer_from_without_approval() {
        let (mut token, deployer) = deploy();
        let spender = AccountId::new();
        let receiver = AccountId::new();

        let result = token.transfer_from(&spender, &deployer, &receiver, units(1));
        assert_eq!(result, Err(TokenError::InsufficientAllowance));
    }

    #[test]
    fn test_transfer_from_exceeding_allowance() {
        let (mut token, deployer) = deploy();
        let spender = AccountId::new();
        let receiver = AccountId::new();

        token.approve(&deployer, &spender, units(10)).unwrap();
        let result = token.transfer_from(&spender, &deployer, &receiver, units(11));
        assert_eq!(result, Err(TokenError::InsufficientAllowance));

        // Failed call leaves token state untouched
        assert_eq!(token.allowance(&deployer, &spender), units(10));
        assert_eq!(token.balance_of(&receiver), 0);
    }

    #[test]
    fn test_transfer_from_owner_balance_short() {
        let (mut token, _deployer) = deploy();
        let poor_owner = AccountId::new();
        let spender = AccountId::new();
        let receiver = AccountId::new();

        token.approve(&poor_owner, &spender, units(5)).unwrap();
        let result = token.transfer_from(&spender, &poor_owner, &receiver, units(5));
        assert_eq!(result, Err(TokenError::InsufficientBalance));

        // Allowance is only spent on success
        assert_eq!(token.allowance(&poor_owner, &spender), units(5));
    }
}
