mod sqlite;
mod transient;

#[cfg(test)]
mod tests;

pub mod config;
pub mod factory;

use std::sync::Mutex;

use anyhow::{bail, Result};
use log::warn;
use sqlite::{Sqlite, SqliteTransaction};
use transient::{Transient, TransientTransaction};

/// Database connection trait that can create transactions
pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    fn transaction(&'a mut self) -> Result<T>;
}

/// Operations on the `bar` store, scoped to a single transaction.
pub trait Transaction {
    /// Stores a bar and returns it with its final id. A zero id asks the
    /// backend to assign one.
    fn add_bar(&self, bar: BarRecord) -> Result<BarRecord>;
    /// Returns `None` when no bar with this id is stored.
    fn find_bar(&self, id: i64) -> Result<Option<BarRecord>>;
    fn is_bar_exists(&self, id: i64) -> Result<bool>;
    fn count_bars(&self) -> Result<usize>;

    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarRecord {
    pub id: i64,
}

pub struct Database {
    conn: Mutex<UnionConnection>,
}

pub enum UnionConnection {
    Sqlite(Sqlite),
    Transient(Transient),
}

enum UnionTransaction<'a> {
    Sqlite(SqliteTransaction<'a>),
    Transient(TransientTransaction),
}

impl Database {
    pub fn new(conn: UnionConnection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    #[cfg(test)]
    pub fn new_test() -> Self {
        let sqlite = Sqlite::memory().unwrap();
        Self::new(UnionConnection::Sqlite(sqlite))
    }

    #[cfg(test)]
    pub fn new_test_transient() -> Self {
        Self::new(UnionConnection::Transient(Transient::new()))
    }

    /// Runs `f` inside a transaction. The transaction is committed when `f`
    /// returns `Ok` and rolled back when it returns `Err`; a failing commit or
    /// rollback is reported in place of the result.
    ///
    /// The connection stays locked until the transaction ends, so calls are
    /// serialized.
    pub fn with_transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&dyn Transaction) -> Result<T>,
    {
        let mut conn = match self.conn.lock() {
            Ok(conn) => conn,
            Err(e) => bail!("failed to lock database: {e:#}"),
        };
        let tx = conn.transaction()?;

        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                // sqlite may already have rolled back on its own
                if let Err(rollback_err) = tx.rollback() {
                    warn!("Rollback failed: {rollback_err:#}");
                }
                Err(e)
            }
        }
    }
}

impl<'a> Connection<'a, UnionTransaction<'a>> for UnionConnection {
    fn transaction(&'a mut self) -> Result<UnionTransaction<'a>> {
        match self {
            UnionConnection::Sqlite(sqlite) => sqlite.transaction().map(UnionTransaction::Sqlite),
            UnionConnection::Transient(transient) => {
                transient.transaction().map(UnionTransaction::Transient)
            }
        }
    }
}

impl Transaction for UnionTransaction<'_> {
    fn add_bar(&self, bar: BarRecord) -> Result<BarRecord> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.add_bar(bar),
            UnionTransaction::Transient(tx) => tx.add_bar(bar),
        }
    }

    fn find_bar(&self, id: i64) -> Result<Option<BarRecord>> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.find_bar(id),
            UnionTransaction::Transient(tx) => tx.find_bar(id),
        }
    }

    fn is_bar_exists(&self, id: i64) -> Result<bool> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.is_bar_exists(id),
            UnionTransaction::Transient(tx) => tx.is_bar_exists(id),
        }
    }

    fn count_bars(&self) -> Result<usize> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.count_bars(),
            UnionTransaction::Transient(tx) => tx.count_bars(),
        }
    }

    fn commit(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.commit(),
            UnionTransaction::Transient(tx) => tx.commit(),
        }
    }

    fn rollback(self) -> Result<()> {
        match self {
            UnionTransaction::Sqlite(tx) => tx.rollback(),
            UnionTransaction::Transient(tx) => tx.rollback(),
        }
    }
}
