//! Journaled account state.
//!
//! Writes made while a unit of work is open record the value they replace.
//! Reverting to a checkpoint replays those records backwards, so a failed
//! unit leaves no trace. Units nest: committing an inner unit keeps its
//! records so the outer unit can still revert them.

use std::collections::HashMap;

use alloy::primitives::{Address, U256};

use super::error::HostError;
use crate::arb::token::{PoolId, TokenId};

/// A pool's reserves, ordered by token: `reserve0` belongs to the smaller token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reserves {
    /// Reserve of `token0`
    pub reserve0: U256,
    /// Reserve of `token1`
    pub reserve1: U256,
}

impl Reserves {
    /// Reserves from the `(reserve0, reserve1)` pair
    #[must_use]
    pub const fn new(reserve0: U256, reserve1: U256) -> Self {
        Self { reserve0, reserve1 }
    }
}

/// A write recorded with the value it replaced.
#[derive(Debug, Clone)]
enum Entry {
    /// Native balance of an account
    Native { account: Address, previous: U256 },
    /// Token balance of a holder
    Balance {
        token: TokenId,
        holder: Address,
        previous: U256,
    },
    /// Reserves of a pool
    Reserves { pool: PoolId, previous: Reserves },
}

/// Position in the journal a unit of work can revert to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct Checkpoint {
    /// Journal length when the unit was opened
    journal_len: usize,
}

/// Native balances, token balances and pool reserves of the host.
#[derive(Debug, Default)]
pub struct State {
    /// Native balance per account
    native: HashMap<Address, U256>,
    /// Token balance per (token, holder)
    balances: HashMap<(TokenId, Address), U256>,
    /// Reserves per pool
    reserves: HashMap<PoolId, Reserves>,
    /// Undo records of the open units
    journal: Vec<Entry>,
    /// Number of open units
    depth: usize,
}

impl State {
    /// Empty state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Native balance of `account`
    #[must_use]
    pub fn native_balance(&self, account: Address) -> U256 {
        self.native.get(&account).copied().unwrap_or_default()
    }

    /// Balance of `token` held by `holder`
    #[must_use]
    pub fn balance_of(&self, token: TokenId, holder: Address) -> U256 {
        self.balances
            .get(&(token, holder))
            .copied()
            .unwrap_or_default()
    }

    /// Recorded reserves of `pool`
    #[must_use]
    pub fn reserves(&self, pool: PoolId) -> Reserves {
        self.reserves.get(&pool).copied().unwrap_or_default()
    }

    /// Number of open units of work
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Overwrites the native balance of `account`.
    pub(crate) fn set_native_balance(&mut self, account: Address, value: U256) {
        let previous = self.native.insert(account, value).unwrap_or_default();
        self.record(Entry::Native { account, previous });
    }

    /// Overwrites the balance of `token` held by `holder`.
    pub fn set_balance(&mut self, token: TokenId, holder: Address, value: U256) {
        let previous = self
            .balances
            .insert((token, holder), value)
            .unwrap_or_default();
        self.record(Entry::Balance {
            token,
            holder,
            previous,
        });
    }

    /// Overwrites the reserves of `pool`.
    pub fn set_reserves(&mut self, pool: PoolId, reserves: Reserves) {
        let previous = self.reserves.insert(pool, reserves).unwrap_or_default();
        self.record(Entry::Reserves { pool, previous });
    }

    /// Credits native value to `account` out of thin air (genesis funding).
    ///
    /// # Errors
    /// * If the balance overflows
    pub fn mint_native(&mut self, account: Address, value: U256) -> Result<(), HostError> {
        let balance = self
            .native_balance(account)
            .checked_add(value)
            .ok_or(HostError::Overflow)?;
        self.set_native_balance(account, balance);
        Ok(())
    }

    /// Moves native value between accounts without running any receive hook.
    /// Plain transfers go through [`Chain::send_native`](super::Chain::send_native).
    ///
    /// # Errors
    /// * If `from` holds less than `value`
    /// * If the recipient's balance overflows
    pub(crate) fn transfer_native(
        &mut self,
        from: Address,
        to: Address,
        value: U256,
    ) -> Result<(), HostError> {
        let available = self.native_balance(from);
        if value > available {
            return Err(HostError::InsufficientNativeBalance {
                account: from,
                requested: value,
                available,
            });
        }
        self.set_native_balance(from, available - value);
        let credited = self
            .native_balance(to)
            .checked_add(value)
            .ok_or(HostError::Overflow)?;
        self.set_native_balance(to, credited);
        Ok(())
    }

    /// Creates `amount` of `token` for `to`.
    ///
    /// # Errors
    /// * If the balance overflows
    pub fn mint(&mut self, token: TokenId, to: Address, amount: U256) -> Result<(), HostError> {
        let balance = self
            .balance_of(token, to)
            .checked_add(amount)
            .ok_or(HostError::Overflow)?;
        self.set_balance(token, to, balance);
        Ok(())
    }

    /// Destroys `amount` of `token` held by `from`.
    ///
    /// # Errors
    /// * If `from` holds less than `amount`
    pub fn burn(&mut self, token: TokenId, from: Address, amount: U256) -> Result<(), HostError> {
        let available = self.balance_of(token, from);
        if amount > available {
            return Err(HostError::InsufficientBalance {
                token,
                holder: from,
                requested: amount,
                available,
            });
        }
        self.set_balance(token, from, available - amount);
        Ok(())
    }

    /// Moves `amount` of `token` between holders.
    ///
    /// # Errors
    /// * If `from` holds less than `amount`
    /// * If the recipient's balance overflows
    pub fn transfer(
        &mut self,
        token: TokenId,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        self.burn(token, from, amount)?;
        self.mint(token, to, amount)
    }

    /// Opens a unit of work.
    pub fn checkpoint(&mut self) -> Checkpoint {
        self.depth += 1;
        Checkpoint {
            journal_len: self.journal.len(),
        }
    }

    /// Closes a unit of work, keeping its writes.
    pub fn commit(&mut self, _checkpoint: Checkpoint) {
        self.close();
    }

    /// Closes a unit of work, undoing every write made since `checkpoint`.
    pub fn revert(&mut self, checkpoint: Checkpoint) {
        while self.journal.len() > checkpoint.journal_len {
            match self.journal.pop() {
                Some(Entry::Native { account, previous }) => {
                    self.native.insert(account, previous);
                }
                Some(Entry::Balance {
                    token,
                    holder,
                    previous,
                }) => {
                    self.balances.insert((token, holder), previous);
                }
                Some(Entry::Reserves { pool, previous }) => {
                    self.reserves.insert(pool, previous);
                }
                None => break,
            }
        }
        self.close();
    }

    /// Leaves the innermost unit; the journal is dropped once none is open.
    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.journal.clear();
        }
    }

    /// Journals a write if a unit of work is open.
    fn record(&mut self, entry: Entry) {
        if self.depth > 0 {
            self.journal.push(entry);
        }
    }
}
