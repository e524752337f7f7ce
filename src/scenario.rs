//! JSON scenarios for the command line: the accounts, pools and vault to deploy
//! and the orders to run against them. Amounts are decimal strings in ether units.

use std::path::Path;

use alloy::primitives::utils::parse_ether;
use alloy::primitives::{Address, U256};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;

use crate::arb::quote::PathQuote;
use crate::arb::token::{PoolId, TokenId};
use crate::config::Config;
use crate::host::Chain;
use crate::vault::{ArbOrder, Vault};

/// A native balance granted at genesis.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountSpec {
    /// Account funded
    pub address: Address,
    /// Native balance in ether units
    pub native: String,
}

/// A deposit into the vault.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositSpec {
    /// Depositor
    pub from: Address,
    /// Native value wrapped into the vault, in ether units
    pub amount: String,
}

/// A constant-product pair and its initial liquidity.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSpec {
    /// Pair address
    pub address: Address,
    /// First token
    pub token_a: Address,
    /// Liquidity of `token_a` in ether units
    pub amount_a: String,
    /// Second token
    pub token_b: Address,
    /// Liquidity of `token_b` in ether units
    pub amount_b: String,
}

/// One `arb` call.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSpec {
    /// Account calling `arb`
    pub caller: Address,
    /// Settlement asset spent, in ether units
    pub amount_in: String,
    /// Smallest acceptable output in ether units; derived from a quote when absent
    #[serde(default)]
    pub min_amount_out: Option<String>,
    /// Assets visited
    pub path: Vec<Address>,
    /// One pool per hop
    pub pools: Vec<Address>,
}

impl OrderSpec {
    /// The path as asset identifiers
    #[must_use]
    pub fn path(&self) -> Vec<TokenId> {
        self.path.iter().copied().map(TokenId::from).collect()
    }

    /// The pools as pool identifiers
    #[must_use]
    pub fn pools(&self) -> Vec<PoolId> {
        self.pools.iter().copied().map(PoolId::from).collect()
    }

    /// Quotes the order against `chain`.
    ///
    /// # Errors
    /// * If `amount_in` is malformed or the path cannot be quoted
    pub fn quote(&self, chain: &Chain) -> Result<PathQuote> {
        PathQuote::new(chain, amount(&self.amount_in)?, &self.path(), &self.pools())
    }

    /// Builds the order, taking the minimum as given or from a quote less `slippage_bps`.
    ///
    /// # Errors
    /// * If an amount is malformed
    /// * If no minimum is given and the path cannot be quoted
    pub fn to_order(&self, chain: &Chain, slippage_bps: u64) -> Result<ArbOrder> {
        let min_amount_out = match &self.min_amount_out {
            Some(value) => amount(value)?,
            None => self.quote(chain)?.min_amount_out(slippage_bps),
        };
        Ok(ArbOrder::new(
            amount(&self.amount_in)?,
            min_amount_out,
            self.path(),
            self.pools(),
        ))
    }
}

/// Everything needed to replay a session against a fresh chain.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Settlement asset; the configured one when absent
    #[serde(default)]
    pub settlement_asset: Option<Address>,
    /// Vault account
    pub vault: Address,
    /// Vault administrator
    pub administrator: Address,
    /// Genesis native balances
    #[serde(default)]
    pub accounts: Vec<AccountSpec>,
    /// Operators granted by the administrator
    #[serde(default)]
    pub operators: Vec<Address>,
    /// Deposits made after the operators are set
    #[serde(default)]
    pub deposits: Vec<DepositSpec>,
    /// Pairs deployed and seeded
    #[serde(default)]
    pub pools: Vec<PoolSpec>,
    /// Orders to run, in order
    #[serde(default)]
    pub orders: Vec<OrderSpec>,
}

/// A chain with the scenario's vault deployed on it.
pub struct Deployment {
    /// The chain
    pub chain: Chain,
    /// The vault
    pub vault: Vault,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    ///
    /// # Errors
    /// * If the text is not a valid scenario
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).wrap_err("scenario: invalid JSON")
    }

    /// Reads and parses the scenario file at `path`.
    ///
    /// # Errors
    /// * If the file cannot be read or parsed
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .wrap_err_with(|| format!("scenario: cannot read {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Funds accounts, deploys pools and the vault, grants operators and makes the deposits.
    ///
    /// # Errors
    /// * If an amount is malformed
    /// * If any setup step is rejected by the chain or the vault
    pub fn deploy(&self, config: &Config) -> Result<Deployment> {
        let settlement = self.settlement_asset.unwrap_or(config.settlement_asset);
        let mut chain = Chain::new();
        let settlement = chain.deploy_wrapped_native(settlement);

        for account in &self.accounts {
            chain
                .state_mut()
                .mint_native(account.address, amount(&account.native)?)?;
        }

        for pool in &self.pools {
            let id = chain.create_pair(pool.address, pool.token_a.into(), pool.token_b.into())?;
            chain.add_liquidity(
                id,
                pool.token_a.into(),
                amount(&pool.amount_a)?,
                pool.token_b.into(),
                amount(&pool.amount_b)?,
            )?;
            log::debug!("scenario::deploy: pool {id} seeded");
        }

        let mut vault = Vault::deploy(&mut chain, self.vault, settlement, self.administrator);
        for operator in &self.operators {
            vault.add_operator(self.administrator, *operator)?;
        }
        for deposit in &self.deposits {
            vault.deposit(&mut chain, deposit.from, amount(&deposit.amount)?)?;
        }

        log::info!(
            "scenario::deploy: {} pools, {} operators, vault holds {}",
            self.pools.len(),
            self.operators.len(),
            vault.balance(&chain)
        );
        Ok(Deployment { chain, vault })
    }
}

/// Parses a decimal ether-unit amount into wei.
fn amount(value: &str) -> Result<U256> {
    parse_ether(value.trim()).map_err(|e| eyre!("invalid amount {value:?}: {e}"))
}
