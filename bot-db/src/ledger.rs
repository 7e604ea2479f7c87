use crate::{
    Account, AccountId, Change, CoalDb, LedgerError, LedgerResult, ReadWriteTransaction,
    ReadWriteTree,
};
use chrono::{DateTime, NaiveDate, Utc};
use itertools::Itertools;
use serde::Deserialize;
use sled::{
    Tree,
    transaction::{
        ConflictableTransactionError, ConflictableTransactionResult, TransactionError,
        TransactionResult, TransactionalTree,
    },
};
use std::cmp::Reverse;

pub const DEFAULT_STARTING_BALANCE: i64 = 1000;

/// The leading fields of an [`Account`], in the same order.
///
/// bincode stops reading once these are filled, so ranking never decodes
/// the change history.
#[derive(Deserialize)]
struct Standing {
    balance: i64,
    #[allow(dead_code)]
    last_daily: Option<NaiveDate>,
    #[allow(dead_code)]
    last_work: Option<DateTime<Utc>>,
    opened: u64,
}

/// The balance table.
///
/// Every mutation is a single sled transaction. A transaction that conflicts
/// with another one touching the same account is retried by sled, so
/// concurrent read-modify-write calls never lose an update, and an aborted
/// transaction writes nothing.
#[derive(Debug, Clone)]
pub struct Ledger {
    db: CoalDb,
    accounts: Tree,
    starting_balance: i64,
}

fn finish<T, E: From<LedgerError>>(result: TransactionResult<T, E>) -> Result<T, E> {
    result.map_err(|err| match err {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => E::from(LedgerError::Storage(err)),
    })
}

impl Ledger {
    pub fn new(db: &CoalDb, starting_balance: i64) -> LedgerResult<Self> {
        Ok(Self {
            db: db.clone(),
            accounts: db.open_tree("accounts")?,
            starting_balance,
        })
    }

    pub fn starting_balance(&self) -> i64 {
        self.starting_balance
    }

    /// `opened` is only used when the account doesn't exist yet.
    fn open_in<E: From<LedgerError>>(
        &self,
        tx: &TransactionalTree,
        id: AccountId,
        opened: u64,
    ) -> ConflictableTransactionResult<Account, E> {
        if let Some(account) = tx.typed_get::<AccountId, Account, E>(&id)? {
            return Ok(account);
        }

        tracing::debug!("Opening account {id} with {}", self.starting_balance);

        Ok(Account::new(self.starting_balance, opened))
    }

    /// Runs `f` against one account inside a transaction, creating the account if needed.
    ///
    /// If `f` fails nothing is written. Otherwise the balance difference is
    /// recorded in the account history under `reason`.
    pub fn update<T, E>(
        &self,
        id: AccountId,
        reason: &str,
        f: impl Fn(&mut Account) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<LedgerError>,
    {
        // sled blocks if an id is generated while a transaction is open
        let opened = self.db.generate_id().map_err(E::from)?;

        finish(
            self.accounts
                .transaction(|tx| -> ConflictableTransactionResult<T, E> {
                    let mut account = self.open_in::<E>(tx, id, opened)?;
                    let before = account.balance;

                    let value = f(&mut account).map_err(ConflictableTransactionError::Abort)?;

                    account.record(account.balance - before, reason);
                    tx.typed_insert::<AccountId, Account, E>(&id, &account)?;

                    Ok(value)
                }),
        )
    }

    /// Same as [`Ledger::update`], but both accounts commit together or not at all.
    pub fn update_pair<T, E>(
        &self,
        first: AccountId,
        second: AccountId,
        reason: &str,
        f: impl Fn(&mut Account, &mut Account) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<LedgerError>,
    {
        if first == second {
            return Err(E::from(LedgerError::SameAccount));
        }

        let left_opened = self.db.generate_id().map_err(E::from)?;
        let right_opened = self.db.generate_id().map_err(E::from)?;

        finish(
            self.accounts
                .transaction(|tx| -> ConflictableTransactionResult<T, E> {
                    let mut left = self.open_in::<E>(tx, first, left_opened)?;
                    let mut right = self.open_in::<E>(tx, second, right_opened)?;
                    let (left_before, right_before) = (left.balance, right.balance);

                    let value =
                        f(&mut left, &mut right).map_err(ConflictableTransactionError::Abort)?;

                    left.record(left.balance - left_before, reason);
                    right.record(right.balance - right_before, reason);
                    tx.typed_insert::<AccountId, Account, E>(&first, &left)?;
                    tx.typed_insert::<AccountId, Account, E>(&second, &right)?;

                    Ok(value)
                }),
        )
    }

    /// Fetches an account, opening it with the starting balance if it doesn't exist.
    pub fn account(&self, id: AccountId) -> LedgerResult<Account> {
        if let Some(account) = self.accounts.typed_get::<AccountId, Account>(&id)? {
            return Ok(account);
        }

        self.update(id, "Opened account", |account| {
            Ok::<_, LedgerError>(account.clone())
        })
    }

    pub fn get_balance(&self, id: AccountId) -> LedgerResult<i64> {
        Ok(self.account(id)?.balance)
    }

    /// Applies `delta` and returns the new balance. Negative deltas stop at zero.
    pub fn add_balance(&self, id: AccountId, delta: i64, reason: &str) -> LedgerResult<i64> {
        self.update(id, reason, |account| account.apply(delta))
    }

    /// Takes exactly `amount`, or fails without touching the account.
    pub fn debit(&self, id: AccountId, amount: i64, reason: &str) -> LedgerResult<i64> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        self.update(id, reason, |account| {
            if account.balance < amount {
                return Err(LedgerError::InsufficientFunds {
                    balance: account.balance,
                    needed: amount,
                });
            }

            account.balance -= amount;
            Ok(account.balance)
        })
    }

    pub fn transfer(&self, from: AccountId, to: AccountId, amount: i64) -> LedgerResult<()> {
        if amount <= 0 {
            return Err(LedgerError::InvalidAmount(amount));
        }

        let reason = format!("Transfer from {from} to {to}");

        self.update_pair(from, to, &reason, |source, destination| {
            if source.balance < amount {
                return Err(LedgerError::InsufficientFunds {
                    balance: source.balance,
                    needed: amount,
                });
            }

            destination.credit(amount)?;
            source.balance -= amount;
            Ok(())
        })
    }

    /// Richest first, ties go to whoever opened their account first.
    pub fn leaderboard(&self, limit: usize) -> LedgerResult<Vec<(AccountId, i64)>> {
        let standings = self
            .accounts
            .typed_iter::<AccountId, Standing>()
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(standings
            .into_iter()
            .sorted_by_key(|(_, standing)| (Reverse(standing.balance), standing.opened))
            .take(limit)
            .map(|(id, standing)| (id, standing.balance))
            .collect())
    }

    /// Recent changes, oldest first. Does not open the account.
    pub fn history(&self, id: AccountId) -> LedgerResult<Vec<Change>> {
        Ok(self
            .accounts
            .typed_get::<AccountId, Account>(&id)?
            .map(|account| account.changes)
            .unwrap_or_default())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn flush(&self) -> LedgerResult<()> {
        self.db.flush()
    }
}
