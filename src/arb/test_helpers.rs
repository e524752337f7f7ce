use alloy::primitives::{Address, U256};

use super::token::{PoolId, TokenId};
use crate::host::{Chain, Reserves};
use crate::vault::{ArbOrder, Vault};

pub fn addr(n: u8) -> Address {
    Address::with_last_byte(n)
}

pub fn token(n: u8) -> TokenId {
    TokenId(addr(n))
}

pub fn pool_id(n: u8) -> PoolId {
    PoolId(addr(n))
}

pub fn kwei() -> U256 {
    U256::from(1_000_u64)
}

pub fn mwei() -> U256 {
    U256::from(1_000_000_u64)
}

pub fn gwei() -> U256 {
    U256::from(1_000_000_000_u64)
}

pub fn eth() -> U256 {
    U256::from(1_000_000_000_000_000_000_u64)
}

/// A deployed vault with one operator, 1 ETH of settlement asset and three
/// unseeded pairs forming the triangle W/A, A/B, B/W.
pub struct Fixture {
    pub chain: Chain,
    pub vault: Vault,
    pub admin: Address,
    pub operator: Address,
    pub anyone: Address,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub pair_aw: PoolId,
    pub pair_ab: PoolId,
    pub pair_bw: PoolId,
}

#[allow(dead_code)]
impl Fixture {
    pub fn new() -> Self {
        let (admin, operator, anyone) = (addr(0x01), addr(0x02), addr(0x03));
        let (token_a, token_b) = (token(0x10), token(0x90));

        let mut chain = Chain::new();
        let wavax = chain.deploy_wrapped_native(addr(0x50));
        for account in [admin, operator, anyone] {
            chain
                .state_mut()
                .mint_native(account, eth() * U256::from(10))
                .unwrap();
        }

        let mut vault = Vault::deploy(&mut chain, addr(0x99), wavax, admin);
        vault.add_operator(admin, operator).unwrap();
        vault.deposit(&mut chain, admin, eth()).unwrap();

        let pair_aw = chain
            .create_pair(addr(0xf1), wavax.token(), token_a)
            .unwrap();
        let pair_ab = chain.create_pair(addr(0xf2), token_a, token_b).unwrap();
        let pair_bw = chain
            .create_pair(addr(0xf3), token_b, wavax.token())
            .unwrap();

        Self {
            chain,
            vault,
            admin,
            operator,
            anyone,
            token_a,
            token_b,
            pair_aw,
            pair_ab,
            pair_bw,
        }
    }

    pub fn wavax(&self) -> TokenId {
        self.vault.settlement_asset()
    }

    pub fn native(&self, account: Address) -> U256 {
        self.chain.state().native_balance(account)
    }

    pub fn token_balance(&self, token: TokenId, holder: Address) -> U256 {
        self.chain.state().balance_of(token, holder)
    }

    /// Seeds every pair with `first` of the token entering it along W -> A -> B -> W
    /// and `second` of the token leaving it.
    pub fn seed_triangle(&mut self, first: U256, second: U256) {
        let wavax = self.wavax();
        for (pool, token_in, token_out) in [
            (self.pair_aw, wavax, self.token_a),
            (self.pair_ab, self.token_a, self.token_b),
            (self.pair_bw, self.token_b, wavax),
        ] {
            self.chain
                .add_liquidity(pool, token_in, first, token_out, second)
                .unwrap();
        }
    }

    pub fn triangle_path(&self) -> Vec<TokenId> {
        vec![self.wavax(), self.token_a, self.token_b, self.wavax()]
    }

    pub fn triangle_pools(&self) -> Vec<PoolId> {
        vec![self.pair_aw, self.pair_ab, self.pair_bw]
    }

    pub fn triangle_order(&self, amount_in: U256, min_amount_out: U256) -> ArbOrder {
        ArbOrder::new(
            amount_in,
            min_amount_out,
            self.triangle_path(),
            self.triangle_pools(),
        )
    }

    pub fn triangle_reserves(&self) -> Vec<Reserves> {
        self.triangle_pools()
            .into_iter()
            .map(|pool| self.chain.state().reserves(pool))
            .collect()
    }
}
