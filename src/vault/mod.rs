//! # Vault Module
//!
//! The custodial vault: it holds the settlement asset (wrapped native currency)
//! and runs multi-hop arbitrage for a set of operators managed by one administrator.
//!
//! - `roles`: Administrator/Operator assignment and the admin rule table
//! - `custody`: deposit, withdraw and the rejection of plain native transfers
//! - `order`: the arbitrage order and its path checks
//! - `executor`: hop-by-hop execution with the minimum-output guard
//!
//! Every operation resolves its authorization and balance checks before touching
//! any external contract, and runs as a single unit of work on the [`Chain`]:
//! a failure anywhere leaves no trace.

use std::sync::Arc;

use alloy::primitives::{Address, U256};

/// Deposit and withdrawal
mod custody;
/// Error taxonomy
pub mod error;
/// Arbitrage execution
mod executor;
/// Arbitrage orders and path checks
pub mod order;
/// Role assignment
pub mod roles;

pub use error::{AccessError, BalanceError, PathError, SlippageError, VaultError};
pub use executor::ArbReceipt;
pub use order::{validate_path, ArbOrder};
pub use roles::{Role, RoleAssignment};

use crate::arb::token::TokenId;
use crate::host::{Chain, WrappedNative};
use custody::PayoutOnly;

/// The vault contract.
///
/// Role changes need `&mut self`, every other operation only `&self`. A pool
/// re-entering the vault during an arbitrage hop holds a shared reference and
/// so can never change who is authorized mid-operation.
#[derive(Debug, Clone)]
pub struct Vault {
    /// The vault's own account
    address: Address,
    /// The settlement-asset ledger
    settlement: WrappedNative,
    /// Who may do what
    roles: RoleAssignment,
}

impl Vault {
    /// Deploys a vault at `address` settling in `settlement`, administered by `administrator`.
    ///
    /// Installs the vault's receive hook on `chain`: from then on the only plain native
    /// transfer the vault accepts is the settlement asset's unwrap payout.
    pub fn deploy(
        chain: &mut Chain,
        address: Address,
        settlement: WrappedNative,
        administrator: Address,
    ) -> Self {
        chain.register_receiver(address, Arc::new(PayoutOnly::new(address, settlement)));
        log::info!(
            "vault::deploy: {address} settling in {} administered by {administrator}",
            settlement.address()
        );
        Self {
            address,
            settlement,
            roles: RoleAssignment::new(administrator),
        }
    }

    /// The vault's account
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The settlement asset
    #[must_use]
    pub const fn settlement_asset(&self) -> TokenId {
        self.settlement.token()
    }

    /// The Administrator
    #[must_use]
    pub const fn administrator(&self) -> Address {
        self.roles.administrator()
    }

    /// The role assignment
    #[must_use]
    pub const fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    /// The vault's settlement-asset balance as reported by the ledger
    #[must_use]
    pub fn balance(&self, chain: &Chain) -> U256 {
        self.settlement.balance_of(chain.state(), self.address)
    }

    /// Whether `account` holds `role`
    #[must_use]
    pub fn has_role(&self, account: Address, role: Role) -> bool {
        self.roles.has_role(account, role)
    }

    /// The role that grants and revokes `role`
    #[must_use]
    pub fn role_admin(role: Role) -> Role {
        role.admin()
    }

    /// Whether `account` is an operator
    #[must_use]
    pub fn is_operator(&self, account: Address) -> bool {
        self.roles.has_role(account, Role::Operator)
    }

    /// Grants the Operator role to `account`. Re-adding an operator is a no-op.
    ///
    /// # Errors
    /// * [`VaultError::Unauthorized`] if `caller` is not the Administrator
    pub fn add_operator(&mut self, caller: Address, account: Address) -> Result<(), VaultError> {
        match self.roles.add_operator(caller, account) {
            Ok(true) => log::info!("vault::add_operator: {account} is now an operator"),
            Ok(false) => log::debug!("vault::add_operator: {account} already an operator"),
            Err(e) => {
                log::warn!("vault::add_operator: rejected {caller}: {e}");
                return Err(e.into());
            }
        }
        Ok(())
    }

    /// Revokes the Operator role from `account`. Removing a non-operator is a no-op.
    ///
    /// # Errors
    /// * [`VaultError::Unauthorized`] if `caller` is not the Administrator
    pub fn remove_operator(&mut self, caller: Address, account: Address) -> Result<(), VaultError> {
        match self.roles.remove_operator(caller, account) {
            Ok(true) => log::info!("vault::remove_operator: {account} is no longer an operator"),
            Ok(false) => log::debug!("vault::remove_operator: {account} was not an operator"),
            Err(e) => {
                log::warn!("vault::remove_operator: rejected {caller}: {e}");
                return Err(e.into());
            }
        }
        Ok(())
    }
}
