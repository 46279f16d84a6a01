use std::sync::Arc;

use anyhow::Result;
use log::warn;

use super::config::{DbConfig, DbType};
use super::sqlite::factory::SqliteFactory;
use super::transient::Transient;
use super::{Database, UnionConnection};

pub struct DbFactory;

impl DbFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_db(&self, cfg: &DbConfig) -> Result<Arc<Database>> {
        let conn = match cfg.name {
            DbType::Sqlite => {
                let sqlite_factory = SqliteFactory::new();
                let sqlite = sqlite_factory.build_sqlite(&cfg.sqlite)?;
                UnionConnection::Sqlite(sqlite)
            }
            DbType::Transient => {
                warn!("Using transient database, posted bars are not stored");
                UnionConnection::Transient(Transient::new())
            }
        };

        let db = Database::new(conn);
        Ok(Arc::new(db))
    }
}
