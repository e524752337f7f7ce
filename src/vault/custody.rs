use alloy::primitives::{Address, U256};

use super::error::{BalanceError, VaultError};
use super::roles::Role;
use super::Vault;
use crate::host::{Chain, HostError, NativeReceiver, WrappedNative};

/// The vault's receive hook: admits the settlement asset's unwrap payout, nothing else.
#[derive(Debug, Clone, Copy)]
pub(super) struct PayoutOnly {
    /// The vault's account
    vault: Address,
    /// The only accepted sender
    settlement: Address,
}

impl PayoutOnly {
    pub(super) const fn new(vault: Address, settlement: WrappedNative) -> Self {
        Self {
            vault,
            settlement: settlement.address(),
        }
    }
}

impl NativeReceiver for PayoutOnly {
    fn receive(&self, _chain: &mut Chain, sender: Address, value: U256) -> Result<(), HostError> {
        if sender == self.settlement {
            return Ok(());
        }
        log::warn!("vault::receive: rejected {value} sent directly by {sender}");
        Err(HostError::NativeRejected {
            contract: self.vault,
            sender,
        })
    }
}

impl Vault {
    /// Wraps `value` native attached by `caller` into the vault's settlement balance.
    ///
    /// Open to any caller. The vault's native balance is zero again before this returns.
    ///
    /// # Errors
    /// * [`VaultError::Host`] if `caller` cannot pay `value`
    pub fn deposit(&self, chain: &mut Chain, caller: Address, value: U256) -> Result<(), VaultError> {
        chain.transact(|chain| {
            // call value, not a plain transfer: the receive hook does not run
            chain
                .state_mut()
                .transfer_native(caller, self.address, value)?;
            self.settlement.deposit(chain, self.address, value)?;
            Ok::<_, VaultError>(())
        })?;
        log::info!("vault::deposit: {caller} deposited {value}");
        Ok(())
    }

    /// Unwraps `amount` of the settlement balance and pays it to `caller` as native value.
    ///
    /// # Errors
    /// * [`VaultError::Unauthorized`] if `caller` is not an operator
    /// * [`VaultError::InsufficientBalance`] if the vault holds less than `amount`
    /// * [`VaultError::Host`] if `caller` refuses the payout
    pub fn withdraw(&self, chain: &mut Chain, caller: Address, amount: U256) -> Result<(), VaultError> {
        if let Err(e) = self.check_withdraw(chain, caller, amount) {
            log::warn!("vault::withdraw: rejected {caller}: {e}");
            return Err(e);
        }
        chain.transact(|chain| {
            self.settlement.withdraw(chain, self.address, amount)?;
            chain.send_native(self.address, caller, amount)?;
            Ok::<_, VaultError>(())
        })?;
        log::info!("vault::withdraw: {caller} withdrew {amount}");
        Ok(())
    }

    /// Sends `value` native from `sender` to the vault as a plain transfer.
    ///
    /// Only the settlement asset's unwrap payout is accepted; anyone else is
    /// refused and the transfer is undone.
    ///
    /// # Errors
    /// * [`VaultError::DirectTransferRejected`] if `sender` is not the settlement asset
    /// * [`VaultError::Host`] if `sender` cannot pay `value`
    pub fn receive(&self, chain: &mut Chain, sender: Address, value: U256) -> Result<(), VaultError> {
        chain
            .transact(|chain| chain.send_native(sender, self.address, value))
            .map_err(|e| match e {
                HostError::NativeRejected { contract, .. } if contract == self.address => {
                    VaultError::DirectTransferRejected
                }
                other => VaultError::Host(other),
            })
    }

    /// Role first, then holdings.
    fn check_withdraw(&self, chain: &Chain, caller: Address, amount: U256) -> Result<(), VaultError> {
        self.roles.require(caller, Role::Operator)?;
        let available = self.balance(chain);
        if amount > available {
            return Err(VaultError::InsufficientBalance(
                BalanceError::WithdrawExceedsHoldings {
                    requested: amount,
                    available,
                },
            ));
        }
        Ok(())
    }
}
