use alloy::primitives::{Address, U256};

use super::error::HostError;
use super::state::Reserves;
use super::Chain;
use crate::arb::swap::{FEE_DENOMINATOR, FEE_NUMERATOR};
use crate::arb::token::{PoolId, TokenId};

/// An external liquidity pool for a fixed token pair.
///
/// The vault only reads reserves and triggers swaps; it never owns pool state.
/// A swap receives the whole chain, so an implementation may call back into
/// other contracts (including the vault) before it returns.
pub trait LiquidityPool {
    /// Address of the pool
    fn id(&self) -> PoolId;

    /// The numerically smaller token of the pair
    fn token0(&self) -> TokenId;

    /// The numerically larger token of the pair
    fn token1(&self) -> TokenId;

    /// Reserves ordered as `(token0, token1)`
    fn get_reserves(&self, chain: &Chain) -> Reserves {
        chain.state().reserves(self.id())
    }

    /// Pays `amount0_out`/`amount1_out` to `to`, given input already transferred to the pool.
    ///
    /// # Errors
    /// * If the pool rejects the trade
    fn swap(
        &self,
        chain: &mut Chain,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) -> Result<(), HostError>;

    /// Sets the reserves to the pool's current token balances.
    ///
    /// # Errors
    /// * If the pool rejects the update
    fn sync(&self, chain: &mut Chain) -> Result<(), HostError>;
}

/// A constant-product pair with a 0.3% fee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pair {
    /// Address of the pair
    id: PoolId,
    /// The numerically smaller token
    token0: TokenId,
    /// The numerically larger token
    token1: TokenId,
}

impl Pair {
    /// Creates a pair for `token_a` and `token_b` in either order.
    ///
    /// # Errors
    /// * If both tokens are the same
    pub fn new(id: PoolId, token_a: TokenId, token_b: TokenId) -> Result<Self, HostError> {
        if token_a == token_b {
            return Err(HostError::IdenticalTokens { token: token_a });
        }
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        Ok(Self { id, token0, token1 })
    }

    /// The pair's balances of `(token0, token1)`
    fn balances(&self, chain: &Chain) -> (U256, U256) {
        let me = self.id.address();
        (
            chain.state().balance_of(self.token0, me),
            chain.state().balance_of(self.token1, me),
        )
    }

    /// The swap itself; `swap` wraps it in a unit of work.
    fn execute_swap(
        &self,
        chain: &mut Chain,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) -> Result<(), HostError> {
        let pool = self.id;
        if amount0_out.is_zero() && amount1_out.is_zero() {
            return Err(HostError::InsufficientOutputAmount { pool });
        }
        let Reserves { reserve0, reserve1 } = self.get_reserves(chain);
        if amount0_out >= reserve0 || amount1_out >= reserve1 {
            return Err(HostError::InsufficientLiquidity { pool });
        }
        if to == self.token0.address() || to == self.token1.address() {
            return Err(HostError::InvalidRecipient { pool, to });
        }

        let me = pool.address();
        if !amount0_out.is_zero() {
            chain
                .state_mut()
                .transfer(self.token0, me, to, amount0_out)?;
        }
        if !amount1_out.is_zero() {
            chain
                .state_mut()
                .transfer(self.token1, me, to, amount1_out)?;
        }

        let (balance0, balance1) = self.balances(chain);
        let amount0_in = amount_in(balance0, reserve0 - amount0_out);
        let amount1_in = amount_in(balance1, reserve1 - amount1_out);
        if amount0_in.is_zero() && amount1_in.is_zero() {
            return Err(HostError::InsufficientInputAmount { pool });
        }

        let adjusted0 = fee_adjusted(balance0, amount0_in).ok_or(HostError::Overflow)?;
        let adjusted1 = fee_adjusted(balance1, amount1_in).ok_or(HostError::Overflow)?;
        let product = adjusted0
            .checked_mul(adjusted1)
            .ok_or(HostError::Overflow)?;
        let scale = U256::from(FEE_DENOMINATOR * FEE_DENOMINATOR);
        let required = reserve0
            .checked_mul(reserve1)
            .and_then(|k| k.checked_mul(scale))
            .ok_or(HostError::Overflow)?;
        if product < required {
            return Err(HostError::ConstantProductViolated { pool });
        }

        chain
            .state_mut()
            .set_reserves(pool, Reserves::new(balance0, balance1));
        log::debug!(
            "pair::swap: {pool} paid {amount0_out}/{amount1_out} for {amount0_in}/{amount1_in}, reserves {balance0}/{balance1}"
        );
        Ok(())
    }
}

impl LiquidityPool for Pair {
    fn id(&self) -> PoolId {
        self.id
    }

    fn token0(&self) -> TokenId {
        self.token0
    }

    fn token1(&self) -> TokenId {
        self.token1
    }

    fn swap(
        &self,
        chain: &mut Chain,
        amount0_out: U256,
        amount1_out: U256,
        to: Address,
    ) -> Result<(), HostError> {
        chain.transact(|chain| self.execute_swap(chain, amount0_out, amount1_out, to))
    }

    fn sync(&self, chain: &mut Chain) -> Result<(), HostError> {
        let (balance0, balance1) = self.balances(chain);
        chain
            .state_mut()
            .set_reserves(self.id, Reserves::new(balance0, balance1));
        Ok(())
    }
}

/// The part of `balance` above what the pool should hold after paying out.
fn amount_in(balance: U256, expected: U256) -> U256 {
    balance.saturating_sub(expected)
}

/// `balance * 1000 - amount_in * 3`
fn fee_adjusted(balance: U256, amount_in: U256) -> Option<U256> {
    let fee = U256::from(FEE_DENOMINATOR - FEE_NUMERATOR);
    balance
        .checked_mul(U256::from(FEE_DENOMINATOR))?
        .checked_sub(amount_in.checked_mul(fee)?)
}
