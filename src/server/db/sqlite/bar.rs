use anyhow::{bail, Result};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Transaction};

use crate::server::db::BarRecord;

const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS bar (
    id INTEGER PRIMARY KEY AUTOINCREMENT
);
"#;

pub fn create_bar_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLES)?;
    Ok(())
}

pub fn add_bar(tx: &Transaction, bar: BarRecord) -> Result<BarRecord> {
    if bar.id == 0 {
        if let Err(e) = tx.execute("INSERT INTO bar DEFAULT VALUES", []) {
            if e.sqlite_error_code() == Some(ErrorCode::DiskFull) && is_id_exhausted(tx)? {
                bail!("bar id sequence exhausted, largest id {} is already taken", i64::MAX);
            }
            return Err(e.into());
        }
    } else {
        tx.execute("INSERT INTO bar (id) VALUES (?)", params![bar.id])?;
    }
    let id = tx.last_insert_rowid();
    Ok(BarRecord { id })
}

fn is_id_exhausted(tx: &Transaction) -> Result<bool> {
    let mut stmt = tx.prepare("SELECT MAX(id) FROM bar")?;
    let max: Option<i64> = stmt.query_row([], |row| row.get(0))?;
    Ok(max == Some(i64::MAX))
}

pub fn find_bar(tx: &Transaction, id: i64) -> Result<Option<BarRecord>> {
    let mut stmt = tx.prepare("SELECT id FROM bar WHERE id = ?")?;
    let bar = stmt
        .query_row(params![id], |row| Ok(BarRecord { id: row.get(0)? }))
        .optional()?;
    Ok(bar)
}

pub fn is_bar_exists(tx: &Transaction, id: i64) -> Result<bool> {
    let mut stmt = tx.prepare("SELECT COUNT(*) FROM bar WHERE id = ?")?;
    let count: i64 = stmt.query_row(params![id], |row| row.get(0))?;
    Ok(count > 0)
}

pub fn count_bars(tx: &Transaction) -> Result<usize> {
    let mut stmt = tx.prepare("SELECT COUNT(*) FROM bar")?;
    let count: i64 = stmt.query_row([], |row| row.get(0))?;
    Ok(count as usize)
}
