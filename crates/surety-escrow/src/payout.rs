//! # Pull-Safe Payout Ledger
//!
//! Settlement paths never transfer value outward. They finish their state
//! mutation, then credit this ledger; beneficiaries pull their balance
//! when they choose. A credit is a checked integer addition — it cannot
//! call out, so nothing can re-enter the state machine mid-transition.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use surety_core::{AccountAddress, Amount, ArithmeticError};

/// Credit-and-withdraw balances owed to external accounts.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PayoutLedger {
    balances: HashMap<AccountAddress, Amount>,
    /// Cumulative credits, for conservation audits.
    total_credited: u128,
    /// Cumulative withdrawals.
    total_withdrawn: u128,
}

impl PayoutLedger {
    /// Create an empty payout ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit `amount` to `recipient`.
    ///
    /// Zero credits are accepted and do nothing: distribution shares can
    /// legitimately round to zero for small slashes.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the recipient balance
    /// would exceed `u64::MAX`. The caller treats this as fatal to its
    /// whole transition.
    pub fn credit(
        &mut self,
        recipient: AccountAddress,
        amount: Amount,
        operation: &str,
    ) -> Result<(), ArithmeticError> {
        if amount.is_zero() {
            return Ok(());
        }
        let current = self.balances.get(&recipient).copied().unwrap_or(Amount::ZERO);
        let updated = current.checked_add(amount, operation)?;
        self.balances.insert(recipient, updated);
        self.total_credited += amount.base_units() as u128;
        tracing::debug!(recipient = %recipient, amount = %amount, operation, "payout credited");
        Ok(())
    }

    /// Withdraw the full balance owed to `account`, zeroing it.
    ///
    /// Returns [`Amount::ZERO`] when nothing is owed; withdrawal is not
    /// an error path.
    pub fn withdraw(&mut self, account: &AccountAddress) -> Amount {
        let owed = self.balances.remove(account).unwrap_or(Amount::ZERO);
        self.total_withdrawn += owed.base_units() as u128;
        if !owed.is_zero() {
            tracing::info!(account = %account, amount = %owed, "payout withdrawn");
        }
        owed
    }

    /// The balance currently owed to `account`.
    pub fn balance(&self, account: &AccountAddress) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Sum of all outstanding balances, in base units.
    pub fn total_outstanding(&self) -> u128 {
        self.total_credited - self.total_withdrawn
    }
}
