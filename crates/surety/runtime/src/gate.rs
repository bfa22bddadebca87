//! Operational Gate — process-wide enable/disable switch
//!
//! When the gate is closed every mutating operation in every other
//! component fails with `NotOperational`. Only the designated owner may
//! toggle it; toggling works regardless of the current state, otherwise a
//! closed gate could never be reopened.

use surety_types::{AccountId, SuretyError, SuretyResult};
use tracing::{info, warn};

pub struct OperationalGate {
    owner: AccountId,
    operational: bool,
}

impl OperationalGate {
    /// A new gate starts open.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            operational: true,
        }
    }

    pub fn is_operational(&self) -> bool {
        self.operational
    }

    pub fn owner(&self) -> &AccountId {
        &self.owner
    }

    /// Guard for mutating operations.
    pub fn ensure_operational(&self) -> SuretyResult<()> {
        if self.operational {
            Ok(())
        } else {
            Err(SuretyError::NotOperational)
        }
    }

    /// Owner-only toggle. Idempotent.
    pub fn set_operating_status(
        &mut self,
        caller: &AccountId,
        operational: bool,
    ) -> SuretyResult<()> {
        if caller != &self.owner {
            return Err(SuretyError::Unauthorized {
                account: caller.clone(),
                action: "set operating status",
            });
        }
        if operational {
            info!(caller = %caller, "operational gate opened");
        } else {
            warn!(caller = %caller, "operational gate closed");
        }
        self.operational = operational;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_operational() {
        let gate = OperationalGate::new(AccountId::new("owner"));
        assert!(gate.is_operational());
        assert!(gate.ensure_operational().is_ok());
    }

    #[test]
    fn test_owner_toggles() {
        let owner = AccountId::new("owner");
        let mut gate = OperationalGate::new(owner.clone());

        gate.set_operating_status(&owner, false).unwrap();
        assert!(!gate.is_operational());
        assert!(matches!(
            gate.ensure_operational(),
            Err(SuretyError::NotOperational)
        ));

        gate.set_operating_status(&owner, true).unwrap();
        assert!(gate.is_operational());
    }

    #[test]
    fn test_non_owner_rejected() {
        let mut gate = OperationalGate::new(AccountId::new("owner"));
        let result = gate.set_operating_status(&AccountId::new("intruder"), false);
        assert!(matches!(result, Err(SuretyError::Unauthorized { .. })));
        assert!(gate.is_operational());
    }

    #[test]
    fn test_toggle_is_idempotent() {
        let owner = AccountId::new("owner");
        let mut gate = OperationalGate::new(owner.clone());
        gate.set_operating_status(&owner, false).unwrap();
        gate.set_operating_status(&owner, false).unwrap();
        assert!(!gate.is_operational());
    }
}
