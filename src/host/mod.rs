//! # Host Module
//!
//! In-process stand-in for the chain the vault runs on: journaled balances,
//! the wrapped-native settlement ledger and constant-product pools.
//! Every public vault operation runs as one unit of work through
//! [`Chain::transact`], which undoes all of its writes on failure.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use alloy::primitives::{Address, U256};

/// Host failures
pub mod error;
/// Liquidity pools
pub mod pair;
/// Journaled account state
pub mod state;
/// Wrapped native currency
pub mod wrapped;

pub use error::HostError;
pub use pair::{LiquidityPool, Pair};
pub use state::{Reserves, State};
pub use wrapped::WrappedNative;

use crate::arb::token::{PoolId, TokenId};

/// A contract's hook for plain native transfers.
///
/// Runs after the value has been credited and inside the sender's unit of
/// work, so rejecting it undoes the transfer.
pub trait NativeReceiver {
    /// Accepts or rejects `value` sent by `sender`.
    ///
    /// # Errors
    /// * If the contract refuses the transfer
    fn receive(&self, chain: &mut Chain, sender: Address, value: U256) -> Result<(), HostError>;
}

/// Chain state plus the registry of deployed contracts.
#[derive(Default)]
pub struct Chain {
    /// Balances and reserves
    state: State,
    /// Deployed pools by address
    pools: HashMap<PoolId, Arc<dyn LiquidityPool>>,
    /// Wrapped-native tokens, whose supply is backed by native value on the contract
    wrapped: HashSet<TokenId>,
    /// Receive hooks by contract account
    receivers: HashMap<Address, Arc<dyn NativeReceiver>>,
}

impl Chain {
    /// An empty chain
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to balances and reserves
    #[must_use]
    pub const fn state(&self) -> &State {
        &self.state
    }

    /// Write access to balances and reserves
    pub fn state_mut(&mut self) -> &mut State {
        &mut self.state
    }

    /// Runs `f` as one unit of work: its writes are kept on `Ok` and undone on `Err`.
    ///
    /// Units nest, so a call made from inside `f` can fail on its own without
    /// discarding the caller's writes.
    ///
    /// # Errors
    /// * Whatever `f` returns
    pub fn transact<T, E>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        let checkpoint = self.state.checkpoint();
        match f(self) {
            Ok(value) => {
                self.state.commit(checkpoint);
                Ok(value)
            }
            Err(e) => {
                self.state.revert(checkpoint);
                Err(e)
            }
        }
    }

    /// Deploys `pool` at its address.
    ///
    /// # Errors
    /// * If a pool is already registered at that address
    pub fn register_pool(&mut self, pool: Arc<dyn LiquidityPool>) -> Result<PoolId, HostError> {
        let id = pool.id();
        if self.pools.contains_key(&id) {
            return Err(HostError::PoolExists { pool: id });
        }
        self.pools.insert(id, pool);
        Ok(id)
    }

    /// Deploys a constant-product pair for `token_a`/`token_b` at `address`.
    ///
    /// # Errors
    /// * If both tokens are the same
    /// * If a pool is already registered at that address
    pub fn create_pair(
        &mut self,
        address: Address,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<PoolId, HostError> {
        let pair = Pair::new(PoolId(address), token_a, token_b)?;
        self.register_pool(Arc::new(pair))
    }

    /// The pool registered at `id`
    #[must_use]
    pub fn pool(&self, id: PoolId) -> Option<Arc<dyn LiquidityPool>> {
        self.pools.get(&id).cloned()
    }

    /// Deploys the wrapped-native contract at `address`.
    pub fn deploy_wrapped_native(&mut self, address: Address) -> WrappedNative {
        let wrapped = WrappedNative::new(address);
        self.wrapped.insert(wrapped.token());
        wrapped
    }

    /// Installs `receiver` as the receive hook of `account`, replacing any previous one.
    pub fn register_receiver(&mut self, account: Address, receiver: Arc<dyn NativeReceiver>) {
        self.receivers.insert(account, receiver);
    }

    /// Sends `value` native from `from` to `to`, running `to`'s receive hook if it has one.
    ///
    /// # Errors
    /// * If `from` holds less than `value`
    /// * If the recipient's hook rejects the transfer
    pub fn send_native(&mut self, from: Address, to: Address, value: U256) -> Result<(), HostError> {
        let receiver = self.receivers.get(&to).cloned();
        self.transact(|chain| {
            chain.state.transfer_native(from, to, value)?;
            match receiver {
                Some(receiver) => receiver.receive(chain, from, value),
                None => Ok(()),
            }
        })
    }

    /// Creates `amount` of `token` for `to`.
    ///
    /// Wrapped-native supply is created together with the native value that
    /// backs it, credited to the wrapped-native contract.
    ///
    /// # Errors
    /// * If a balance overflows
    pub fn mint(&mut self, token: TokenId, to: Address, amount: U256) -> Result<(), HostError> {
        let backed = self.wrapped.contains(&token);
        self.transact(|chain| {
            if backed {
                chain.state.mint_native(token.address(), amount)?;
            }
            chain.state.mint(token, to, amount)
        })
    }

    /// Mints both tokens into `pool` and syncs its reserves.
    ///
    /// # Errors
    /// * If the pool is not registered
    /// * If a balance overflows
    pub fn add_liquidity(
        &mut self,
        pool: PoolId,
        token_a: TokenId,
        amount_a: U256,
        token_b: TokenId,
        amount_b: U256,
    ) -> Result<Reserves, HostError> {
        let target = self.pool(pool).ok_or(HostError::UnknownPool { pool })?;
        self.transact(|chain| {
            chain.mint(token_a, pool.address(), amount_a)?;
            chain.mint(token_b, pool.address(), amount_b)?;
            target.sync(chain)?;
            Ok(target.get_reserves(chain))
        })
    }
}
