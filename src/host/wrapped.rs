use alloy::primitives::{Address, U256};

use super::error::HostError;
use super::state::State;
use super::Chain;
use crate::arb::token::TokenId;

/// The wrapped-native token contract: native value in, 1:1 token balance out.
///
/// The contract's own account holds the native value backing every wrapped unit.
/// Deploy it with [`Chain::deploy_wrapped_native`] so minted supply is backed too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedNative {
    /// Token id, which is also the contract account
    token: TokenId,
}

impl WrappedNative {
    /// Handle to the wrapped-native contract at `address`
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self {
            token: TokenId(address),
        }
    }

    /// The token id of the wrapped asset
    #[must_use]
    pub const fn token(&self) -> TokenId {
        self.token
    }

    /// The contract account
    #[must_use]
    pub const fn address(&self) -> Address {
        self.token.0
    }

    /// Wrapped balance of `holder`
    #[must_use]
    pub fn balance_of(&self, state: &State, holder: Address) -> U256 {
        state.balance_of(self.token, holder)
    }

    /// Wraps `value` of `holder`'s native balance.
    ///
    /// # Errors
    /// * If `holder` holds less than `value` native
    /// * If a balance overflows
    pub fn deposit(&self, chain: &mut Chain, holder: Address, value: U256) -> Result<(), HostError> {
        chain.transact(|chain| {
            chain.send_native(holder, self.address(), value)?;
            chain.state_mut().mint(self.token, holder, value)
        })
    }

    /// Unwraps `amount` of `holder`'s wrapped balance and sends the native value to `holder`.
    ///
    /// # Errors
    /// * If `holder` holds less than `amount` wrapped
    /// * If `holder`'s receive hook rejects the payout
    pub fn withdraw(&self, chain: &mut Chain, holder: Address, amount: U256) -> Result<(), HostError> {
        chain.transact(|chain| {
            chain.state_mut().burn(self.token, holder, amount)?;
            chain.send_native(self.address(), holder, amount)
        })
    }

    /// Moves wrapped balance between holders.
    ///
    /// # Errors
    /// * If `from` holds less than `amount`
    pub fn transfer(
        &self,
        state: &mut State,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        state.transfer(self.token, from, to, amount)
    }
}
