pub mod account;
pub mod error;
pub mod ledger;

use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};
use sled::{
    Db, Tree,
    transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree},
};

pub use account::{Account, AccountId, Change};
pub use error::LedgerError;
pub use ledger::Ledger;

pub type LedgerResult<T> = Result<T, LedgerError>;

pub trait ReadWriteTree {
    fn typed_insert<K: Serialize, V: Serialize>(&self, key: &K, value: &V) -> LedgerResult<()>;

    fn typed_get<K: Serialize, V: DeserializeOwned>(&self, key: &K) -> LedgerResult<Option<V>>;

    fn typed_iter<K: DeserializeOwned, V: DeserializeOwned>(
        &self,
    ) -> impl Iterator<Item = LedgerResult<(K, V)>>;
}

impl ReadWriteTree for Tree {
    fn typed_insert<K: Serialize, V: Serialize>(&self, key: &K, value: &V) -> LedgerResult<()> {
        let key = bincode::serialize::<K>(key)?;
        let value = bincode::serialize::<V>(value)?;
        self.insert(key, value)?;
        Ok(())
    }

    fn typed_get<K: Serialize, V: DeserializeOwned>(&self, key: &K) -> LedgerResult<Option<V>> {
        Ok(self
            .get(bincode::serialize::<K>(key)?)?
            .map(|value| bincode::deserialize::<V>(&value))
            .transpose()?)
    }

    fn typed_iter<K: DeserializeOwned, V: DeserializeOwned>(
        &self,
    ) -> impl Iterator<Item = LedgerResult<(K, V)>> {
        self.iter().map(|entry| -> LedgerResult<(K, V)> {
            let (key, value) = entry?;
            Ok((
                bincode::deserialize::<K>(&key)?,
                bincode::deserialize::<V>(&value)?,
            ))
        })
    }
}

/// The same typed access, but from inside a transaction.
///
/// Failures abort the transaction with whatever error the caller's
/// transaction uses, as long as it can hold a [`LedgerError`].
pub trait ReadWriteTransaction {
    fn typed_insert<K: Serialize, V: Serialize, E: From<LedgerError>>(
        &self,
        key: &K,
        value: &V,
    ) -> ConflictableTransactionResult<(), E>;

    fn typed_get<K: Serialize, V: DeserializeOwned, E: From<LedgerError>>(
        &self,
        key: &K,
    ) -> ConflictableTransactionResult<Option<V>, E>;
}

pub(crate) fn abort<E: From<LedgerError>>(err: impl Into<LedgerError>) -> ConflictableTransactionError<E> {
    ConflictableTransactionError::Abort(E::from(err.into()))
}

impl ReadWriteTransaction for TransactionalTree {
    fn typed_insert<K: Serialize, V: Serialize, E: From<LedgerError>>(
        &self,
        key: &K,
        value: &V,
    ) -> ConflictableTransactionResult<(), E> {
        let key = bincode::serialize::<K>(key).map_err(abort)?;
        let value = bincode::serialize::<V>(value).map_err(abort)?;
        self.insert(key, value)?;
        Ok(())
    }

    fn typed_get<K: Serialize, V: DeserializeOwned, E: From<LedgerError>>(
        &self,
        key: &K,
    ) -> ConflictableTransactionResult<Option<V>, E> {
        let key = bincode::serialize::<K>(key).map_err(abort)?;
        self.get(key)?
            .map(|value| bincode::deserialize::<V>(&value))
            .transpose()
            .map_err(abort)
    }
}

#[derive(Debug, Clone)]
pub struct CoalDb(Db);

impl CoalDb {
    pub fn open(path: impl AsRef<Path>) -> LedgerResult<Self> {
        let path = path.as_ref();
        tracing::info!("Opening database at {}", path.display());
        Ok(Self(sled::open(path)?))
    }

    /// A database that is deleted when dropped.
    pub fn temporary() -> LedgerResult<Self> {
        Ok(Self(sled::Config::new().temporary(true).open()?))
    }

    pub(crate) fn open_tree(&self, name: impl AsRef<[u8]>) -> LedgerResult<Tree> {
        Ok(self.0.open_tree(name)?)
    }

    pub(crate) fn generate_id(&self) -> LedgerResult<u64> {
        Ok(self.0.generate_id()?)
    }

    pub fn flush(&self) -> LedgerResult<()> {
        self.0.flush()?;
        Ok(())
    }
}
