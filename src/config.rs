use std::str::FromStr;

use alloy::primitives::Address;
use derive_more::Display;
use eyre::{eyre, Result};

use crate::utils::constants::{DEFAULT_SLIPPAGE_BPS, WAVAX_MAINNET, WAVAX_TESTNET};

/// Network the settlement asset is deployed on.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Default)]
pub enum Network {
    /// Avalanche C-Chain
    #[display("mainnet")]
    Mainnet,
    /// Fuji
    #[default]
    #[display("testnet")]
    Testnet,
}

impl Network {
    /// The known wrapped-native address on this network
    #[must_use]
    pub const fn wrapped_native(self) -> Address {
        match self {
            Self::Mainnet => WAVAX_MAINNET,
            Self::Testnet => WAVAX_TESTNET,
        }
    }
}

impl FromStr for Network {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            other => Err(eyre!("unknown network {other:?}, expected mainnet or testnet")),
        }
    }
}

/// Runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Selected network
    pub network: Network,
    /// Wrapped-native address the vault settles in
    pub settlement_asset: Address,
    /// Tolerance applied to quotes for orders without an explicit minimum
    pub slippage_bps: u64,
}

impl Config {
    /// Loads `.env` if present, then reads `ICICLE_NETWORK`, `ICICLE_SETTLEMENT_ASSET`
    /// and `ICICLE_SLIPPAGE_BPS` from the environment.
    ///
    /// # Errors
    /// * If a variable is set but cannot be parsed
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let network = lookup("ICICLE_NETWORK")
            .map(|value| value.parse::<Network>())
            .transpose()?
            .unwrap_or_default();

        let settlement_asset = lookup("ICICLE_SETTLEMENT_ASSET")
            .map(|value| {
                value
                    .trim()
                    .parse::<Address>()
                    .map_err(|e| eyre!("ICICLE_SETTLEMENT_ASSET: {e}"))
            })
            .transpose()?
            .unwrap_or_else(|| network.wrapped_native());

        let slippage_bps = lookup("ICICLE_SLIPPAGE_BPS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| eyre!("ICICLE_SLIPPAGE_BPS: {e}"))
            })
            .transpose()?
            .unwrap_or(DEFAULT_SLIPPAGE_BPS);
        if slippage_bps > 10_000 {
            return Err(eyre!("ICICLE_SLIPPAGE_BPS: {slippage_bps} exceeds 10000"));
        }

        log::debug!("config: {network}, settling in {settlement_asset}, slippage {slippage_bps} bps");
        Ok(Self {
            network,
            settlement_asset,
            slippage_bps,
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: Network::default(),
            settlement_asset: Network::default().wrapped_native(),
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
        }
    }
}
