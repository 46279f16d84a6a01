use anyhow::Result;

use super::{BarRecord, Connection, Transaction};

/// A backend that stores nothing. Every lookup succeeds with a bar carrying
/// the requested id, and added bars are accepted and dropped.
pub struct Transient;

pub struct TransientTransaction;

impl Transient {
    pub fn new() -> Self {
        Self
    }
}

impl<'a> Connection<'a, TransientTransaction> for Transient {
    fn transaction(&'a mut self) -> Result<TransientTransaction> {
        Ok(TransientTransaction)
    }
}

impl Transaction for TransientTransaction {
    fn add_bar(&self, bar: BarRecord) -> Result<BarRecord> {
        Ok(bar)
    }

    fn find_bar(&self, id: i64) -> Result<Option<BarRecord>> {
        Ok(Some(BarRecord { id }))
    }

    fn is_bar_exists(&self, _id: i64) -> Result<bool> {
        Ok(false)
    }

    fn count_bars(&self) -> Result<usize> {
        Ok(0)
    }

    fn commit(self) -> Result<()> {
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        Ok(())
    }
}
