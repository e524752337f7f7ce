use alloy::primitives::{Address, U256};
use derive_more::Display;

use crate::arb::token::{PoolId, TokenId};

/// Failures raised by the host's ledgers and pools.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum HostError {
    /// A token transfer or burn exceeds the holder's balance
    #[display("{holder} holds {available} of {token}, needs {requested}")]
    InsufficientBalance {
        /// The token being moved
        token: TokenId,
        /// The account being debited
        holder: Address,
        /// The amount requested
        requested: U256,
        /// The holder's balance
        available: U256,
    },
    /// A native transfer exceeds the sender's balance
    #[display("{account} holds {available} native, needs {requested}")]
    InsufficientNativeBalance {
        /// The account being debited
        account: Address,
        /// The amount requested
        requested: U256,
        /// The account's native balance
        available: U256,
    },
    /// A contract's receive hook refused a plain native transfer
    #[display("{contract} does not accept native value from {sender}")]
    NativeRejected {
        /// The refusing contract
        contract: Address,
        /// The sender
        sender: Address,
    },
    /// A swap asked for no output
    #[display("pool {pool}: insufficient output amount")]
    InsufficientOutputAmount {
        /// The pool that rejected the swap
        pool: PoolId,
    },
    /// Nothing was paid into the pool before a swap
    #[display("pool {pool}: insufficient input amount")]
    InsufficientInputAmount {
        /// The pool that rejected the swap
        pool: PoolId,
    },
    /// A swap asked for at least the whole reserve, or the pool is empty
    #[display("pool {pool}: insufficient liquidity")]
    InsufficientLiquidity {
        /// The pool that rejected the swap
        pool: PoolId,
    },
    /// A swap tried to pay out to one of the pool's own tokens
    #[display("pool {pool}: invalid recipient {to}")]
    InvalidRecipient {
        /// The pool that rejected the swap
        pool: PoolId,
        /// The rejected recipient
        to: Address,
    },
    /// The fee-adjusted reserve product decreased
    #[display("pool {pool}: constant product violated")]
    ConstantProductViolated {
        /// The pool that rejected the swap
        pool: PoolId,
    },
    /// A pair was created with the same token on both sides
    #[display("pair tokens must be different: {token}")]
    IdenticalTokens {
        /// The duplicated token
        token: TokenId,
    },
    /// A pool address is already registered
    #[display("pool {pool} already exists")]
    PoolExists {
        /// The duplicated pool
        pool: PoolId,
    },
    /// A pool address is not registered
    #[display("pool {pool} does not exist")]
    UnknownPool {
        /// The missing pool
        pool: PoolId,
    },
    /// A balance or reserve computation overflowed 256 bits
    #[display("arithmetic overflow")]
    Overflow,
}

impl std::error::Error for HostError {}
