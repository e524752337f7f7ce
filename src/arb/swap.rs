//! A hop is one leg of a swap path: a single pool traded in one direction.
//! The direction is fixed by token ordering: the numerically smaller token is `token0`.

use std::fmt::{self, Debug, Display};

use alloy::primitives::U256;

use super::token::{PoolId, TokenId};

/// Numerator of the pool fee factor (0.3% fee)
pub const FEE_NUMERATOR: u64 = 997;
/// Denominator of the pool fee factor
pub const FEE_DENOMINATOR: u64 = 1000;

/// The direction of a swap in a liquidity pool.
///
/// In a standard liquidity pool with two tokens (token0 and token1),
/// a swap can go in either direction: from token0 to token1 or from token1 to token0.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Direction {
    /// Swap from token0 to token1 in the pool
    ZeroForOne,
    /// Swap from token1 to token0 in the pool
    OneForZero,
}

impl Direction {
    /// The direction of a swap from `token_in` to `token_out`.
    #[must_use]
    pub fn of(token_in: TokenId, token_out: TokenId) -> Self {
        if token_in < token_out {
            Self::ZeroForOne
        } else {
            Self::OneForZero
        }
    }

    /// Orders a pool's `(reserve0, reserve1)` as `(reserve_in, reserve_out)`.
    #[must_use]
    pub const fn orient(self, reserve0: U256, reserve1: U256) -> (U256, U256) {
        match self {
            Self::ZeroForOne => (reserve0, reserve1),
            Self::OneForZero => (reserve1, reserve0),
        }
    }

    /// The `(amount0_out, amount1_out)` arguments of a pool swap paying `amount_out`.
    #[must_use]
    pub const fn amounts_out(self, amount_out: U256) -> (U256, U256) {
        match self {
            Self::ZeroForOne => (U256::ZERO, amount_out),
            Self::OneForZero => (amount_out, U256::ZERO),
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Debug for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroForOne => write!(f, "0>1"),
            Self::OneForZero => write!(f, "1>0"),
        }
    }
}

/// Output of a constant-product pool for `amount_in`, after the 0.3% fee.
///
/// Returns `None` when either reserve is empty or the arithmetic overflows.
#[must_use]
pub fn get_amount_out(amount_in: U256, reserve_in: U256, reserve_out: U256) -> Option<U256> {
    if reserve_in.is_zero() || reserve_out.is_zero() {
        return None;
    }
    let amount_in_with_fee = amount_in.checked_mul(U256::from(FEE_NUMERATOR))?;
    let numerator = amount_in_with_fee.checked_mul(reserve_out)?;
    let denominator = reserve_in
        .checked_mul(U256::from(FEE_DENOMINATOR))?
        .checked_add(amount_in_with_fee)?;
    Some(numerator / denominator)
}

/// One leg of a swap path, bound to the pool that serves it.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hop {
    /// The pool the hop trades against
    pub pool: PoolId,
    /// The token paid into the pool
    pub token_in: TokenId,
    /// The token received from the pool
    pub token_out: TokenId,
    /// Which side of the pool is paid in
    pub direction: Direction,
}

impl Hop {
    /// Binds `token_in -> token_out` to a pool serving `(token0, token1)`.
    ///
    /// Returns `None` if the pool does not serve exactly this pair.
    #[must_use]
    pub fn new(
        pool: PoolId,
        token0: TokenId,
        token1: TokenId,
        token_in: TokenId,
        token_out: TokenId,
    ) -> Option<Self> {
        let serves_pair = (token_in == token0 && token_out == token1)
            || (token_in == token1 && token_out == token0);
        serves_pair.then(|| Self {
            pool,
            token_in,
            token_out,
            direction: Direction::of(token_in, token_out),
        })
    }

    /// The hop's output for `amount_in` given the pool's `(reserve0, reserve1)`.
    #[must_use]
    pub fn amount_out(&self, amount_in: U256, reserve0: U256, reserve1: U256) -> Option<U256> {
        let (reserve_in, reserve_out) = self.direction.orient(reserve0, reserve1);
        get_amount_out(amount_in, reserve_in, reserve_out)
    }
}

impl Debug for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Hop({:?} {:?}, {:?} -> {:?})",
            self.pool, self.direction, self.token_in, self.token_out
        )
    }
}

impl Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} -> {})",
            self.pool, self.direction, self.token_in, self.token_out
        )
    }
}
