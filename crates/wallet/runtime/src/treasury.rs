//! Treasury: the custodied balance and its inbound records
//!
//! Deposits are accepted unconditionally and recorded individually.
//! Payments are deposits with a named purpose and must carry value.
//! Outbound transfers happen only through the consensus engine's
//! execute transition.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use wallet_types::{Address, Amount, WalletError, WalletResult};

/// One accepted deposit
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DepositRecord {
    /// Who sent the funds
    pub from: Address,
    /// Amount received
    pub amount: Amount,
    /// When the deposit was accepted
    pub received_at: DateTime<Utc>,
}

/// One accepted purpose-tagged payment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentRecord {
    /// Who paid
    pub payer: Address,
    /// What the payment is for
    pub target: String,
    /// Routing topic for observers
    pub topic: String,
    /// Free-form description
    pub description: String,
    /// Amount received
    pub amount: Amount,
    /// When the payment was accepted
    pub received_at: DateTime<Utc>,
}

/// The wallet's custody balance with inbound records
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Treasury {
    balance: Amount,
    deposits: Vec<DepositRecord>,
    payments: Vec<PaymentRecord>,
}

impl Treasury {
    /// Create an empty treasury
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept a plain deposit; never fails, zero allowed
    pub fn deposit(&mut self, from: Address, amount: Amount) {
        self.balance = self.balance.saturating_add(amount);
        debug!(from = %from, amount = %amount, "Deposit accepted");
        self.deposits.push(DepositRecord {
            from,
            amount,
            received_at: Utc::now(),
        });
    }

    /// Accept a purpose-tagged payment; the amount must be nonzero
    pub fn record_payment(
        &mut self,
        payer: Address,
        target: impl Into<String>,
        topic: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
    ) -> WalletResult<()> {
        if amount.is_zero() {
            return Err(WalletError::ZeroAmount);
        }
        self.balance = self.balance.saturating_add(amount);
        debug!(payer = %payer, amount = %amount, "Payment accepted");
        self.payments.push(PaymentRecord {
            payer,
            target: target.into(),
            topic: topic.into(),
            description: description.into(),
            amount,
            received_at: Utc::now(),
        });
        Ok(())
    }

    /// Pay out custodied funds (consensus engine only)
    pub(crate) fn withdraw(&mut self, amount: Amount) -> WalletResult<()> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(WalletError::InsufficientBalance {
                requested: amount,
                available: self.balance,
            })?;
        Ok(())
    }

    // --- Query methods ---

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn deposits(&self) -> &[DepositRecord] {
        &self.deposits
    }

    pub fn payments(&self) -> &[PaymentRecord] {
        &self.payments
    }

    /// Sum of every recorded deposit and payment
    pub fn total_received(&self) -> Amount {
        let deposited = self
            .deposits
            .iter()
            .fold(Amount::zero(), |acc, d| acc.saturating_add(d.amount));
        self.payments
            .iter()
            .fold(deposited, |acc, p| acc.saturating_add(p.amount))
    }
}
