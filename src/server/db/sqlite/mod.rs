mod bar;

pub mod config;
pub mod factory;

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;

use super::{BarRecord, Connection, Transaction};

/// SQLite-based store. Supports both file-based and in-memory databases.
pub struct Sqlite {
    conn: RawConnection,
}

pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens a SQLite database file, creating it if it doesn't exist, and
    /// creates the tables.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)
            .with_context(|| format!("open sqlite database: {}", path.display()))?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// Creates a new in-memory database. Its content is lost when the process
    /// exits.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory().context("open in-memory sqlite database")?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(conn: &RawConnection) -> Result<()> {
        bar::create_bar_tables(conn).context("create bar tables")?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for Sqlite {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn add_bar(&self, bar: BarRecord) -> Result<BarRecord> {
        bar::add_bar(&self.tx, bar)
    }

    fn find_bar(&self, id: i64) -> Result<Option<BarRecord>> {
        bar::find_bar(&self.tx, id)
    }

    fn is_bar_exists(&self, id: i64) -> Result<bool> {
        bar::is_bar_exists(&self.tx, id)
    }

    fn count_bars(&self) -> Result<usize> {
        bar::count_bars(&self.tx)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}
