use std::sync::Arc;

use alloy::primitives::{Address, I256, U256};

use super::error::{BalanceError, PathError, SlippageError, VaultError};
use super::order::ArbOrder;
use super::roles::Role;
use super::Vault;
use crate::arb::swap::Hop;
use crate::host::{Chain, HostError, LiquidityPool, Reserves};

/// A hop bound to the pool contract that will execute it.
type RouteLeg = (Arc<dyn LiquidityPool>, Hop);

/// Outcome of a successful arbitrage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbReceipt {
    /// Settlement asset spent
    pub amount_in: U256,
    /// Settlement asset received from the last hop
    pub amount_out: U256,
    /// Amount held before each hop, then the final output
    pub amounts: Vec<U256>,
}

impl ArbReceipt {
    /// Change of the vault's settlement balance (negative for a loss)
    #[must_use]
    pub fn profit(&self) -> I256 {
        I256::from_raw(self.amount_out).saturating_sub(I256::from_raw(self.amount_in))
    }
}

impl Vault {
    /// Walks `order.path` through `order.pools`, starting with `order.amount_in` of the
    /// settlement asset, and keeps the result only if it returns at least `order.min_amount_out`.
    ///
    /// Authorization, path shape, pool pairs and holdings are all checked before the
    /// first transfer. On any failure every transfer and swap is undone.
    ///
    /// # Errors
    /// * [`VaultError::Unauthorized`] if `caller` is not an operator
    /// * [`VaultError::InvalidPath`] if the path or its pools are malformed
    /// * [`VaultError::InsufficientBalance`] if the vault holds less than `amount_in`
    /// * [`VaultError::SlippageExceeded`] if the output is below `min_amount_out`
    /// * [`VaultError::Host`] if a pool rejects a hop
    pub fn arb(
        &self,
        chain: &mut Chain,
        caller: Address,
        order: &ArbOrder,
    ) -> Result<ArbReceipt, VaultError> {
        let result = self
            .prepare_route(chain, caller, order)
            .and_then(|route| chain.transact(|chain| self.execute_route(chain, order, &route)));

        match &result {
            Ok(receipt) => log::info!(
                "vault::arb: {caller} turned {} into {} (profit {})",
                receipt.amount_in,
                receipt.amount_out,
                receipt.profit()
            ),
            Err(e) => log::warn!("vault::arb: {order:?} by {caller} failed: {e}"),
        }
        result
    }

    /// Every check that must pass before the vault touches a pool.
    fn prepare_route(
        &self,
        chain: &Chain,
        caller: Address,
        order: &ArbOrder,
    ) -> Result<Vec<RouteLeg>, VaultError> {
        self.roles.require(caller, Role::Operator)?;
        order.validate(self.settlement_asset())?;
        let route = resolve_route(chain, order)?;

        let available = self.balance(chain);
        if order.amount_in > available {
            return Err(VaultError::InsufficientBalance(
                BalanceError::ArbExceedsHoldings {
                    requested: order.amount_in,
                    available,
                },
            ));
        }
        Ok(route)
    }

    /// Runs the hops and applies the minimum-output guard.
    fn execute_route(
        &self,
        chain: &mut Chain,
        order: &ArbOrder,
        route: &[RouteLeg],
    ) -> Result<ArbReceipt, VaultError> {
        let mut amounts = Vec::with_capacity(route.len() + 1);
        let mut current = order.amount_in;
        amounts.push(current);

        for (index, (pool, hop)) in route.iter().enumerate() {
            current = self.swap_hop(chain, pool.as_ref(), hop, current)?;
            log::debug!("vault::arb: hop {index} {hop} -> {current}");
            amounts.push(current);
        }

        if current < order.min_amount_out {
            return Err(VaultError::SlippageExceeded(
                SlippageError::InsufficientOutput {
                    amount_out: current,
                    min_amount_out: order.min_amount_out,
                },
            ));
        }

        Ok(ArbReceipt {
            amount_in: order.amount_in,
            amount_out: current,
            amounts,
        })
    }

    /// Pays `amount_in` into the hop's pool and returns what the vault actually received.
    fn swap_hop(
        &self,
        chain: &mut Chain,
        pool: &dyn LiquidityPool,
        hop: &Hop,
        amount_in: U256,
    ) -> Result<U256, VaultError> {
        let me = self.address;
        let Reserves { reserve0, reserve1 } = pool.get_reserves(chain);
        let amount_out = hop
            .amount_out(amount_in, reserve0, reserve1)
            .ok_or(HostError::InsufficientLiquidity { pool: hop.pool })?;
        let (amount0_out, amount1_out) = hop.direction.amounts_out(amount_out);

        chain
            .state_mut()
            .transfer(hop.token_in, me, hop.pool.address(), amount_in)?;
        let before = chain.state().balance_of(hop.token_out, me);
        pool.swap(chain, amount0_out, amount1_out, me)?;
        let after = chain.state().balance_of(hop.token_out, me);

        Ok(after.saturating_sub(before))
    }
}

/// Binds each hop of `order` to its registered pool.
///
/// # Errors
/// * [`PathError::UnknownPool`] if a pool is not deployed
/// * [`PathError::PoolPairMismatch`] if a pool does not trade the hop's pair
fn resolve_route(chain: &Chain, order: &ArbOrder) -> Result<Vec<RouteLeg>, PathError> {
    order
        .hops()
        .enumerate()
        .map(|(index, (pool_id, token_in, token_out))| {
            let pool = chain.pool(pool_id).ok_or(PathError::UnknownPool {
                hop: index,
                pool: pool_id,
            })?;
            let hop = Hop::new(pool_id, pool.token0(), pool.token1(), token_in, token_out)
                .ok_or(PathError::PoolPairMismatch {
                    hop: index,
                    pool: pool_id,
                    token_in,
                    token_out,
                })?;
            Ok((pool, hop))
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Arc, Mutex};

    use alloy::primitives::{Address, I256, U256};

    use crate::arb::quote::get_amounts_out;
    use crate::arb::test_helpers::*;
    use crate::arb::token::{PoolId, TokenId};
    use crate::host::{Chain, HostError, LiquidityPool, Pair, Reserves};
    use crate::vault::{
        AccessError, ArbOrder, BalanceError, PathError, SlippageError, Vault, VaultError,
    };

    #[test]
    fn test_must_start_with_settlement_asset() {
        let mut f = Fixture::new();
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            vec![f.token_a, f.token_b, f.wavax()],
            vec![f.pair_ab, f.pair_bw],
        );
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InvalidPath(PathError::MustStartWithSettlementAsset))
        );
    }

    #[test]
    fn test_must_end_with_settlement_asset() {
        let mut f = Fixture::new();
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            vec![f.wavax(), f.token_b, f.token_a],
            vec![f.pair_bw, f.pair_ab],
        );
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InvalidPath(PathError::MustEndWithSettlementAsset))
        );
    }

    #[test]
    fn test_bad_param_lengths() {
        let mut f = Fixture::new();
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            f.triangle_path(),
            vec![f.pair_aw, f.pair_ab],
        );
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InvalidPath(PathError::LengthMismatch {
                tokens: 4,
                pools: 2
            }))
        );
    }

    #[test]
    fn test_requires_operator() {
        let mut f = Fixture::new();
        let order = f.triangle_order(kwei(), kwei());
        for caller in [f.anyone, f.admin] {
            assert_eq!(
                f.vault.arb(&mut f.chain, caller, &order),
                Err(VaultError::Unauthorized(AccessError::OperatorRequired))
            );
        }
    }

    #[test]
    fn test_unknown_pool() {
        let mut f = Fixture::new();
        let missing = pool_id(0xee);
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            f.triangle_path(),
            vec![f.pair_aw, missing, f.pair_bw],
        );
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InvalidPath(PathError::UnknownPool {
                hop: 1,
                pool: missing
            }))
        );
    }

    #[test]
    fn test_pool_pair_mismatch() {
        let mut f = Fixture::new();
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            f.triangle_path(),
            vec![f.pair_aw, f.pair_bw, f.pair_ab],
        );
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InvalidPath(PathError::PoolPairMismatch {
                hop: 1,
                pool: f.pair_bw,
                token_in: f.token_a,
                token_out: f.token_b,
            }))
        );
    }

    #[test]
    fn test_amount_in_above_holdings() {
        let mut f = Fixture::new();
        let available = f.vault.balance(&f.chain);
        let order = f.triangle_order(available + U256::from(1), U256::ZERO);
        assert_eq!(
            f.vault.arb(&mut f.chain, f.operator, &order),
            Err(VaultError::InsufficientBalance(
                BalanceError::ArbExceedsHoldings {
                    requested: available + U256::from(1),
                    available,
                }
            ))
        );
    }

    #[test]
    fn test_output_below_minimum_rolls_back() {
        let mut f = Fixture::new();
        f.seed_triangle(gwei(), gwei());

        let start = f.vault.balance(&f.chain);
        let reserves_before = f.triangle_reserves();
        let order = f.triangle_order(mwei(), mwei() * U256::from(2));

        let result = f.vault.arb(&mut f.chain, f.operator, &order);

        assert!(matches!(
            result,
            Err(VaultError::SlippageExceeded(
                SlippageError::InsufficientOutput { .. }
            ))
        ));
        assert_eq!(f.vault.balance(&f.chain), start);
        assert_eq!(f.triangle_reserves(), reserves_before);
        assert_eq!(f.token_balance(f.token_a, f.vault.address()), U256::ZERO);
        assert_eq!(f.token_balance(f.token_b, f.vault.address()), U256::ZERO);
        assert_eq!(f.chain.state().depth(), 0);
    }

    #[test]
    fn test_output_above_input_succeeds() {
        let mut f = Fixture::new();
        f.seed_triangle(mwei(), mwei() * U256::from(2));

        let start = f.vault.balance(&f.chain);
        let amount_in = kwei();
        let reserve_wavax = |f: &Fixture| {
            let pool = f.chain.pool(f.pair_bw).unwrap();
            let Reserves { reserve0, reserve1 } = pool.get_reserves(&f.chain);
            if f.wavax() < f.token_b {
                reserve0
            } else {
                reserve1
            }
        };
        let start_reserve_wavax = reserve_wavax(&f);

        let amounts = get_amounts_out(
            &f.chain,
            amount_in,
            &f.triangle_path(),
            &[f.pair_aw, f.pair_ab, f.pair_bw],
        )
        .unwrap();
        let amount_out = *amounts.last().unwrap();

        let order = f.triangle_order(amount_in, amount_in);
        let receipt = f.vault.arb(&mut f.chain, f.operator, &order).unwrap();

        assert_eq!(receipt.amount_out, amount_out);
        assert_eq!(receipt.amounts, amounts);
        assert_eq!(start_reserve_wavax - reserve_wavax(&f), amount_out);
        assert_eq!(f.vault.balance(&f.chain), start - amount_in + amount_out);
        assert_eq!(
            receipt.profit(),
            I256::from_raw(amount_out) - I256::from_raw(amount_in)
        );
        // no intermediate asset is left behind
        assert_eq!(f.token_balance(f.token_a, f.vault.address()), U256::ZERO);
        assert_eq!(f.token_balance(f.token_b, f.vault.address()), U256::ZERO);
        assert_eq!(f.native(f.vault.address()), U256::ZERO);
    }

    #[test]
    fn test_profit_can_be_withdrawn_in_full() {
        let mut f = Fixture::new();
        f.seed_triangle(mwei(), mwei() * U256::from(2));
        let wavax = f.wavax();

        let order = f.triangle_order(kwei(), kwei());
        let receipt = f.vault.arb(&mut f.chain, f.operator, &order).unwrap();
        assert!(receipt.profit().is_positive());

        let balance = f.vault.balance(&f.chain);
        let held = f.native(f.operator);
        f.vault.withdraw(&mut f.chain, f.operator, balance).unwrap();

        assert_eq!(f.vault.balance(&f.chain), U256::ZERO);
        assert_eq!(f.native(f.operator), held + balance);
        assert_eq!(f.native(f.vault.address()), U256::ZERO);
        // what is left wrapped sits in the pools and is still fully backed
        assert_eq!(
            f.native(wavax.address()),
            f.token_balance(wavax, f.pair_aw.address()) + f.token_balance(wavax, f.pair_bw.address())
        );
    }

    #[test]
    fn test_reversed_triangle() {
        let mut f = Fixture::new();
        f.seed_triangle(mwei(), mwei() * U256::from(2));
        let start = f.vault.balance(&f.chain);

        // W -> B -> A -> W trades every pool against its seeded rate
        let order = ArbOrder::new(
            kwei(),
            U256::ZERO,
            vec![f.wavax(), f.token_b, f.token_a, f.wavax()],
            vec![f.pair_bw, f.pair_ab, f.pair_aw],
        );
        let receipt = f.vault.arb(&mut f.chain, f.operator, &order).unwrap();

        assert!(receipt.profit().is_negative());
        assert_eq!(
            f.vault.balance(&f.chain),
            start - kwei() + receipt.amount_out
        );
    }

    #[test]
    fn test_zero_amount_in_is_rejected_by_pool() {
        let mut f = Fixture::new();
        f.seed_triangle(mwei(), mwei());
        let start = f.vault.balance(&f.chain);

        let order = f.triangle_order(U256::ZERO, U256::ZERO);
        let result = f.vault.arb(&mut f.chain, f.operator, &order);

        assert_eq!(
            result,
            Err(VaultError::Host(HostError::InsufficientOutputAmount {
                pool: f.pair_aw
            }))
        );
        assert_eq!(f.vault.balance(&f.chain), start);
    }

    /// Re-enters the vault from inside its swap, then delegates to a real pair.
    struct ReentrantPool {
        /// The pair doing the actual trade
        inner: Pair,
        /// The vault under attack
        vault: Arc<Vault>,
        /// Account attempting the reentrant withdraw
        attacker: Address,
        /// Vault balance seen during the swap and the reentrant withdraw's result
        observed: Mutex<Vec<(U256, Result<(), VaultError>)>>,
    }

    impl LiquidityPool for ReentrantPool {
        fn id(&self) -> PoolId {
            self.inner.id()
        }

        fn token0(&self) -> TokenId {
            self.inner.token0()
        }

        fn token1(&self) -> TokenId {
            self.inner.token1()
        }

        fn swap(
            &self,
            chain: &mut Chain,
            amount0_out: U256,
            amount1_out: U256,
            to: Address,
        ) -> Result<(), HostError> {
            let balance = self.vault.balance(chain);
            let withdrawn = self.vault.withdraw(chain, self.attacker, U256::from(1));
            self.observed.lock().unwrap().push((balance, withdrawn));
            self.inner.swap(chain, amount0_out, amount1_out, to)
        }

        fn sync(&self, chain: &mut Chain) -> Result<(), HostError> {
            self.inner.sync(chain)
        }
    }

    #[test]
    fn test_reentrant_withdraw_sees_consistent_state() {
        let f = Fixture::new();
        let Fixture {
            mut chain,
            vault,
            operator,
            anyone,
            token_a,
            token_b,
            pair_ab,
            pair_bw,
            ..
        } = f;
        let wavax = vault.settlement_asset();
        let vault = Arc::new(vault);

        let hostile_id = pool_id(0xe1);
        let hostile = Arc::new(ReentrantPool {
            inner: Pair::new(hostile_id, wavax, token_a).unwrap(),
            vault: Arc::clone(&vault),
            attacker: anyone,
            observed: Mutex::new(Vec::new()),
        });
        chain.register_pool(hostile.clone()).unwrap();
        for (pool, token_x, token_y) in [
            (hostile_id, wavax, token_a),
            (pair_ab, token_a, token_b),
            (pair_bw, token_b, wavax),
        ] {
            chain
                .add_liquidity(pool, token_x, mwei(), token_y, mwei() * U256::from(2))
                .unwrap();
        }

        let start = vault.balance(&chain);
        let order = ArbOrder::new(
            kwei(),
            kwei(),
            vec![wavax, token_a, token_b, wavax],
            vec![hostile_id, pair_ab, pair_bw],
        );
        let receipt = vault.arb(&mut chain, operator, &order).unwrap();

        let observed = hostile.observed.lock().unwrap();
        assert_eq!(observed.len(), 1);
        // the input is already paid in when the pool runs
        assert_eq!(observed[0].0, start - kwei());
        assert_eq!(
            observed[0].1,
            Err(VaultError::Unauthorized(AccessError::OperatorRequired))
        );
        assert_eq!(vault.balance(&chain), start - kwei() + receipt.amount_out);
    }

    #[test]
    fn test_reentrant_operator_withdraw_is_undone_with_the_arb() {
        let f = Fixture::new();
        let Fixture {
            mut chain,
            vault,
            operator,
            token_a,
            token_b,
            pair_ab,
            pair_bw,
            ..
        } = f;
        let wavax = vault.settlement_asset();
        let vault = Arc::new(vault);

        let hostile_id = pool_id(0xe1);
        let hostile = Arc::new(ReentrantPool {
            inner: Pair::new(hostile_id, wavax, token_a).unwrap(),
            vault: Arc::clone(&vault),
            attacker: operator,
            observed: Mutex::new(Vec::new()),
        });
        chain.register_pool(hostile.clone()).unwrap();
        for (pool, token_x, token_y) in [
            (hostile_id, wavax, token_a),
            (pair_ab, token_a, token_b),
            (pair_bw, token_b, wavax),
        ] {
            chain
                .add_liquidity(pool, token_x, gwei(), token_y, gwei())
                .unwrap();
        }

        let start = vault.balance(&chain);
        let operator_native = chain.state().native_balance(operator);
        let order = ArbOrder::new(
            mwei(),
            mwei() * U256::from(2),
            vec![wavax, token_a, token_b, wavax],
            vec![hostile_id, pair_ab, pair_bw],
        );

        assert!(matches!(
            vault.arb(&mut chain, operator, &order),
            Err(VaultError::SlippageExceeded(_))
        ));
        // the operator's reentrant withdraw succeeded inside the hop...
        assert_eq!(hostile.observed.lock().unwrap()[0].1, Ok(()));
        // ...and was discarded with everything else
        assert_eq!(vault.balance(&chain), start);
        assert_eq!(chain.state().native_balance(operator), operator_native);
    }
}
