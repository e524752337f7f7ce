use alloy::primitives::{I256, U256};
use eyre::{bail, eyre, Result};
use itertools::Itertools;

use crate::arb::swap::Hop;
use crate::arb::token::{PoolId, TokenId};
use crate::host::{Chain, Reserves};

/// Basis points in one whole
pub const BPS: u64 = 10_000;

/// Simulates `amount_in` along `path` through `pools` against current reserves.
///
/// Returns the amount entering each hop followed by the final output, so the
/// result has `path.len()` entries. Reads state only.
///
/// # Errors
/// * If the path has fewer than two tokens or the pool count does not match
/// * If a pool is unknown or does not trade its hop's pair
/// * If a pool has no liquidity on either side
pub fn get_amounts_out(
    chain: &Chain,
    amount_in: U256,
    path: &[TokenId],
    pools: &[PoolId],
) -> Result<Vec<U256>> {
    if path.len() < 2 || pools.len() + 1 != path.len() {
        bail!(
            "quote: {} tokens need {} pools, got {}",
            path.len(),
            path.len().saturating_sub(1),
            pools.len()
        );
    }

    let mut amounts = Vec::with_capacity(path.len());
    let mut amount = amount_in;
    amounts.push(amount);

    for ((token_in, token_out), pool_id) in path.iter().tuple_windows().zip(pools) {
        let pool = chain
            .pool(*pool_id)
            .ok_or_else(|| eyre!("quote: unknown pool {pool_id}"))?;
        let hop = Hop::new(*pool_id, pool.token0(), pool.token1(), *token_in, *token_out)
            .ok_or_else(|| eyre!("quote: {pool_id} does not trade {token_in} -> {token_out}"))?;
        let Reserves { reserve0, reserve1 } = pool.get_reserves(chain);
        amount = hop
            .amount_out(amount, reserve0, reserve1)
            .ok_or_else(|| eyre!("quote: no liquidity in {hop}"))?;
        amounts.push(amount);
    }

    Ok(amounts)
}

/// The simulated outcome of an arbitrage path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathQuote {
    /// Amount entering each hop, then the final output
    amounts: Vec<U256>,
}

impl PathQuote {
    /// Quotes `amount_in` along `path` through `pools`.
    ///
    /// # Errors
    /// * See [`get_amounts_out`]
    pub fn new(chain: &Chain, amount_in: U256, path: &[TokenId], pools: &[PoolId]) -> Result<Self> {
        let amounts = get_amounts_out(chain, amount_in, path, pools)?;
        Ok(Self { amounts })
    }

    /// Amount entering each hop, then the final output
    #[must_use]
    pub fn amounts(&self) -> &[U256] {
        &self.amounts
    }

    /// The amount put into the first hop
    #[must_use]
    pub fn amount_in(&self) -> U256 {
        self.amounts.first().copied().unwrap_or_default()
    }

    /// The amount out of the last hop
    #[must_use]
    pub fn amount_out(&self) -> U256 {
        self.amounts.last().copied().unwrap_or_default()
    }

    /// Output minus input; negative for a losing path
    #[must_use]
    pub fn profit(&self) -> I256 {
        I256::from_raw(self.amount_out()).saturating_sub(I256::from_raw(self.amount_in()))
    }

    /// Profit relative to the input in basis points (10,000 = 100%)
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn profit_margin(&self) -> i32 {
        let profit = self.profit();
        let amount_in = self.amount_in();

        if amount_in.is_zero() {
            return 0;
        }

        let margin = profit.unsigned_abs().saturating_mul(U256::from(BPS)) / amount_in;
        let magnitude = if margin > U256::from(i32::MAX.unsigned_abs()) {
            i32::MAX
        } else {
            margin.as_limbs()[0] as i32
        };

        if profit.is_negative() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// Whether the path returns more than it takes
    #[must_use]
    pub fn is_profitable(&self) -> bool {
        self.profit().is_positive()
    }

    /// The quoted output less `slippage_bps` basis points, for use as an order's minimum.
    #[must_use]
    pub fn min_amount_out(&self, slippage_bps: u64) -> U256 {
        let keep = U256::from(BPS.saturating_sub(slippage_bps));
        self.amount_out().saturating_mul(keep) / U256::from(BPS)
    }
}
