use alloy::primitives::{address, Address};

/// WAVAX on Avalanche C-Chain
pub const WAVAX_MAINNET: Address = address!("0xB31f66AA3C1e785363F0875A1B74E27b85FD66c7");
/// WAVAX on the Fuji testnet
pub const WAVAX_TESTNET: Address = address!("0xd00ae08403B9bbb9124bB305C09058E32C39A48c");
/// Slippage shaved off a quote when an order gives no minimum output
pub const DEFAULT_SLIPPAGE_BPS: u64 = 50;
