use crate::{LedgerError, LedgerResult};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many changes an account remembers.
pub const HISTORY_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl From<u64> for AccountId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<AccountId> for u64 {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Change {
    pub amount: i64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Account {
    pub balance: i64,
    /// The UTC day the daily reward was last claimed.
    pub last_daily: Option<NaiveDate>,
    pub last_work: Option<DateTime<Utc>>,
    /// Creation sequence number, earlier accounts sort first on ties.
    pub opened: u64,
    /// Most recent changes, oldest first.
    pub changes: Vec<Change>,
}

impl Account {
    pub fn new(balance: i64, opened: u64) -> Self {
        Self {
            balance,
            last_daily: None,
            last_work: None,
            opened,
            changes: Vec::new(),
        }
    }

    /// Adds coins, returns the new balance.
    pub fn credit(&mut self, amount: i64) -> LedgerResult<i64> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow {
                balance: self.balance,
                amount,
            })?;
        Ok(self.balance)
    }

    /// Takes up to `amount` coins without going below zero.
    ///
    /// Returns how much was actually taken.
    pub fn debit_clamped(&mut self, amount: i64) -> i64 {
        let taken = amount.clamp(0, self.balance.max(0));
        self.balance -= taken;
        taken
    }

    /// Applies a signed change, negative changes stop at zero.
    pub fn apply(&mut self, delta: i64) -> LedgerResult<i64> {
        if delta < 0 {
            self.debit_clamped(delta.saturating_neg());
            Ok(self.balance)
        } else {
            self.credit(delta)
        }
    }

    pub(crate) fn record(&mut self, amount: i64, reason: &str) {
        if amount == 0 {
            return;
        }

        self.changes.push(Change {
            amount,
            reason: reason.to_owned(),
        });

        if self.changes.len() > HISTORY_LENGTH {
            let overflow = self.changes.len() - HISTORY_LENGTH;
            self.changes.drain(..overflow);
        }
    }
}
