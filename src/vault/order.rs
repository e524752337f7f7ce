//! An arbitrage order: a closed path through the settlement asset and one pool per hop.
//! It only lives for the duration of a single `arb` call.

use std::fmt::{self, Debug};

use alloy::primitives::U256;
use itertools::Itertools;

use super::error::PathError;
use crate::arb::token::{PoolId, TokenId};

/// Amounts, path and pools of one arbitrage attempt.
#[derive(Clone, PartialEq, Eq)]
pub struct ArbOrder {
    /// Settlement asset spent on the first hop
    pub amount_in: U256,
    /// Smallest acceptable settlement-asset output of the last hop
    pub min_amount_out: U256,
    /// Assets visited, starting and ending with the settlement asset
    pub path: Vec<TokenId>,
    /// One pool per consecutive pair in `path`
    pub pools: Vec<PoolId>,
}

impl ArbOrder {
    /// Bundles the arguments of an `arb` call
    #[must_use]
    pub const fn new(
        amount_in: U256,
        min_amount_out: U256,
        path: Vec<TokenId>,
        pools: Vec<PoolId>,
    ) -> Self {
        Self {
            amount_in,
            min_amount_out,
            path,
            pools,
        }
    }

    /// Runs the path checks against `settlement`.
    ///
    /// # Errors
    /// * The first [`PathError`] found, see [`validate_path`]
    pub fn validate(&self, settlement: TokenId) -> Result<(), PathError> {
        validate_path(settlement, &self.path, &self.pools)
    }

    /// `(pool, token_in, token_out)` for each hop, in order
    pub fn hops(&self) -> impl Iterator<Item = (PoolId, TokenId, TokenId)> + '_ {
        self.path
            .iter()
            .copied()
            .tuple_windows()
            .zip(self.pools.iter().copied())
            .map(|((token_in, token_out), pool)| (pool, token_in, token_out))
    }
}

impl Debug for ArbOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ArbOrder({} -> >={}, [{}] via [{}])",
            self.amount_in,
            self.min_amount_out,
            self.path.iter().join(", "),
            self.pools.iter().join(", ")
        )
    }
}

/// Structural checks on an arbitrage path, run before any swap.
///
/// The checks run in a fixed order and the first failure is reported:
/// start asset, end asset, pool count, then a minimum of one hop.
///
/// # Errors
/// * [`PathError::MustStartWithSettlementAsset`]
/// * [`PathError::MustEndWithSettlementAsset`]
/// * [`PathError::LengthMismatch`]
/// * [`PathError::TooShort`]
pub fn validate_path(
    settlement: TokenId,
    path: &[TokenId],
    pools: &[PoolId],
) -> Result<(), PathError> {
    if path.first() != Some(&settlement) {
        return Err(PathError::MustStartWithSettlementAsset);
    }
    if path.last() != Some(&settlement) {
        return Err(PathError::MustEndWithSettlementAsset);
    }
    if pools.len() + 1 != path.len() {
        return Err(PathError::LengthMismatch {
            tokens: path.len(),
            pools: pools.len(),
        });
    }
    if pools.is_empty() {
        return Err(PathError::TooShort);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arb::test_helpers::*;

    const W: u8 = 0x50;
    const A: u8 = 0x10;
    const B: u8 = 0x90;

    fn path(ids: &[u8]) -> Vec<TokenId> {
        ids.iter().map(|id| token(*id)).collect()
    }

    fn pools(count: u8) -> Vec<PoolId> {
        (0..count).map(|i| pool_id(0xf0 + i)).collect()
    }

    #[test]
    fn test_valid() {
        assert_eq!(validate_path(token(W), &path(&[W, A, B, W]), &pools(3)), Ok(()));
        assert_eq!(validate_path(token(W), &path(&[W, A, W]), &pools(2)), Ok(()));
    }

    #[test]
    fn test_must_start_with_settlement_asset() {
        assert_eq!(
            validate_path(token(W), &path(&[A, B, W]), &pools(2)),
            Err(PathError::MustStartWithSettlementAsset)
        );
        assert_eq!(
            validate_path(token(W), &[], &[]),
            Err(PathError::MustStartWithSettlementAsset)
        );
    }

    #[test]
    fn test_must_end_with_settlement_asset() {
        assert_eq!(
            validate_path(token(W), &path(&[W, B, A]), &pools(2)),
            Err(PathError::MustEndWithSettlementAsset)
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            validate_path(token(W), &path(&[W, A, B, W]), &pools(2)),
            Err(PathError::LengthMismatch {
                tokens: 4,
                pools: 2
            })
        );
        assert_eq!(
            validate_path(token(W), &path(&[W, A, W]), &pools(3)),
            Err(PathError::LengthMismatch {
                tokens: 3,
                pools: 3
            })
        );
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        // wrong start, wrong end and wrong length at once
        assert_eq!(
            validate_path(token(W), &path(&[A, B]), &pools(5)),
            Err(PathError::MustStartWithSettlementAsset)
        );
        // wrong end and wrong length
        assert_eq!(
            validate_path(token(W), &path(&[W, A]), &pools(5)),
            Err(PathError::MustEndWithSettlementAsset)
        );
    }

    #[test]
    fn test_single_token_path() {
        assert_eq!(
            validate_path(token(W), &path(&[W]), &[]),
            Err(PathError::TooShort)
        );
    }

    #[test]
    fn test_hops() {
        let order = ArbOrder::new(U256::from(1), U256::from(1), path(&[W, A, B, W]), pools(3));
        let hops: Vec<_> = order.hops().collect();
        assert_eq!(
            hops,
            vec![
                (pool_id(0xf0), token(W), token(A)),
                (pool_id(0xf1), token(A), token(B)),
                (pool_id(0xf2), token(B), token(W)),
            ]
        );
    }
}
