use alloy::primitives::U256;
use derive_more::Display;

use crate::arb::token::{PoolId, TokenId};
use crate::host::HostError;

/// The role a rejected caller was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum AccessError {
    /// Only the Administrator may manage operators
    #[display("administrator role required")]
    AdministratorRequired,
    /// Only operators may withdraw and arbitrage
    #[display("operator role required")]
    OperatorRequired,
}

/// Why an arbitrage path was rejected before any swap.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum PathError {
    /// `path[0]` is not the settlement asset
    #[display("path must start with the settlement asset")]
    MustStartWithSettlementAsset,
    /// `path[last]` is not the settlement asset
    #[display("path must end with the settlement asset")]
    MustEndWithSettlementAsset,
    /// The pool list is not one shorter than the path
    #[display("expected one pool per hop: {tokens} tokens, {pools} pools")]
    LengthMismatch {
        /// Path length
        tokens: usize,
        /// Pool list length
        pools: usize,
    },
    /// The path has no hop
    #[display("path must contain at least one hop")]
    TooShort,
    /// No pool is deployed at the given address
    #[display("hop {hop}: no pool at {pool}")]
    UnknownPool {
        /// Index of the hop
        hop: usize,
        /// The missing pool
        pool: PoolId,
    },
    /// The pool does not serve the hop's token pair
    #[display("hop {hop}: pool {pool} does not trade {token_in} for {token_out}")]
    PoolPairMismatch {
        /// Index of the hop
        hop: usize,
        /// The pool
        pool: PoolId,
        /// Token paid in
        token_in: TokenId,
        /// Token expected out
        token_out: TokenId,
    },
}

/// The realized output fell short of the caller's bound.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SlippageError {
    /// Final amount below `min_amount_out`
    #[display("insufficient output amount: {amount_out} < {min_amount_out}")]
    InsufficientOutput {
        /// Realized output
        amount_out: U256,
        /// Caller's bound
        min_amount_out: U256,
    },
}

/// The vault does not hold enough of the settlement asset.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum BalanceError {
    /// `withdraw` asked for more than the vault holds
    #[display("withdrawing {requested}, vault holds {available}")]
    WithdrawExceedsHoldings {
        /// Amount asked for
        requested: U256,
        /// Vault balance
        available: U256,
    },
    /// `arb` starts with more than the vault holds
    #[display("arbitrage needs {requested}, vault holds {available}")]
    ArbExceedsHoldings {
        /// Amount asked for
        requested: U256,
        /// Vault balance
        available: U256,
    },
}

/// Every way a vault operation can fail. Any failure discards the whole operation.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum VaultError {
    /// The caller lacks the required role
    #[display("unauthorized: {_0}")]
    Unauthorized(AccessError),
    /// The arbitrage path is malformed
    #[display("invalid path: {_0}")]
    InvalidPath(PathError),
    /// The arbitrage returned less than the caller's bound
    #[display("slippage exceeded: {_0}")]
    SlippageExceeded(SlippageError),
    /// The vault holds too little of the settlement asset
    #[display("insufficient balance: {_0}")]
    InsufficientBalance(BalanceError),
    /// Native value was sent outside of `deposit`
    #[display("native value must be sent through deposit")]
    DirectTransferRejected,
    /// A ledger or pool rejected a step
    #[display("{_0}")]
    Host(HostError),
}

impl std::error::Error for VaultError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AccessError> for VaultError {
    fn from(e: AccessError) -> Self {
        Self::Unauthorized(e)
    }
}

impl From<PathError> for VaultError {
    fn from(e: PathError) -> Self {
        Self::InvalidPath(e)
    }
}

impl From<HostError> for VaultError {
    fn from(e: HostError) -> Self {
        Self::Host(e)
    }
}
