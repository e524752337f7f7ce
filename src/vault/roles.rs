use std::collections::HashSet;

use alloy::primitives::Address;
use derive_more::Display;

use super::error::AccessError;

/// An authorization tag granting a fixed set of vault capabilities.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Manages operators. Exactly one, fixed at construction.
    Administrator,
    /// Withdraws and runs arbitrage.
    Operator,
}

/// `(role, admin)`: holders of `admin` may grant and revoke `role`.
pub const ROLE_ADMINS: [(Role, Role); 2] = [
    (Role::Administrator, Role::Administrator),
    (Role::Operator, Role::Administrator),
];

impl Role {
    /// The role allowed to grant and revoke this one.
    #[must_use]
    pub fn admin(self) -> Self {
        ROLE_ADMINS
            .iter()
            .find(|(role, _)| *role == self)
            .map_or(Self::Administrator, |(_, admin)| *admin)
    }

    /// The failure reported to a caller lacking this role
    #[must_use]
    pub const fn missing(self) -> AccessError {
        match self {
            Self::Administrator => AccessError::AdministratorRequired,
            Self::Operator => AccessError::OperatorRequired,
        }
    }
}

/// Who holds which role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    /// The single Administrator
    administrator: Address,
    /// Operator set
    operators: HashSet<Address>,
}

impl RoleAssignment {
    /// `administrator` holds the Administrator role; no operators yet.
    #[must_use]
    pub fn new(administrator: Address) -> Self {
        Self {
            administrator,
            operators: HashSet::new(),
        }
    }

    /// The Administrator
    #[must_use]
    pub const fn administrator(&self) -> Address {
        self.administrator
    }

    /// Current operators, in no particular order
    pub fn operators(&self) -> impl Iterator<Item = &Address> {
        self.operators.iter()
    }

    /// Whether `account` holds `role`
    #[must_use]
    pub fn has_role(&self, account: Address, role: Role) -> bool {
        match role {
            Role::Administrator => account == self.administrator,
            Role::Operator => self.operators.contains(&account),
        }
    }

    /// Fails unless `account` holds `role`.
    ///
    /// # Errors
    /// * [`AccessError`] naming the missing role
    pub fn require(&self, account: Address, role: Role) -> Result<(), AccessError> {
        if self.has_role(account, role) {
            Ok(())
        } else {
            Err(role.missing())
        }
    }

    /// Adds `account` to the operators. Returns whether it was newly added.
    ///
    /// # Errors
    /// * If `caller` does not hold the Operator role's admin role
    pub fn add_operator(&mut self, caller: Address, account: Address) -> Result<bool, AccessError> {
        self.require(caller, Role::Operator.admin())?;
        Ok(self.operators.insert(account))
    }

    /// Removes `account` from the operators. Returns whether it was present.
    ///
    /// # Errors
    /// * If `caller` does not hold the Operator role's admin role
    pub fn remove_operator(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<bool, AccessError> {
        self.require(caller, Role::Operator.admin())?;
        Ok(self.operators.remove(&account))
    }
}
