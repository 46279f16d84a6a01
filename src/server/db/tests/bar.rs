use anyhow::bail;

use crate::server::db::{BarRecord, Database};

pub fn run_bar_tests(db: &Database) {
    let count = db.with_transaction(|tx| tx.count_bars()).unwrap();
    assert_eq!(count, 0);

    db.with_transaction(|tx| {
        assert_eq!(tx.find_bar(1)?, None);
        assert!(!tx.is_bar_exists(1)?);

        let bar = tx.add_bar(BarRecord { id: 1 })?;
        assert_eq!(bar.id, 1);

        // Visible inside the same transaction
        assert_eq!(tx.find_bar(1)?, Some(BarRecord { id: 1 }));
        Ok(())
    })
    .unwrap();

    // Explicit ids are kept as given
    let bar = db
        .with_transaction(|tx| tx.add_bar(BarRecord { id: 10 }))
        .unwrap();
    assert_eq!(bar.id, 10);

    // Zero asks for the next identity value
    let bar = db
        .with_transaction(|tx| tx.add_bar(BarRecord { id: 0 }))
        .unwrap();
    assert_eq!(bar.id, 11);
    let bar = db
        .with_transaction(|tx| tx.add_bar(BarRecord { id: 0 }))
        .unwrap();
    assert_eq!(bar.id, 12);

    // Duplicate explicit id violates the primary key
    let result = db.with_transaction(|tx| tx.add_bar(BarRecord { id: 10 }));
    assert!(result.is_err());

    db.with_transaction(|tx| {
        for id in [1, 10, 11, 12] {
            assert!(tx.is_bar_exists(id)?);
            assert_eq!(tx.find_bar(id)?, Some(BarRecord { id }));
        }
        assert_eq!(tx.find_bar(2)?, None);
        assert_eq!(tx.count_bars()?, 4);
        Ok(())
    })
    .unwrap();
}

pub fn run_rollback_tests(db: &Database) {
    let before = db.with_transaction(|tx| tx.count_bars()).unwrap();

    let result: anyhow::Result<()> = db.with_transaction(|tx| {
        tx.add_bar(BarRecord { id: 100 })?;
        tx.add_bar(BarRecord { id: 0 })?;
        bail!("handler failed after storing");
    });
    assert!(result.is_err());

    db.with_transaction(|tx| {
        assert_eq!(tx.count_bars()?, before);
        assert_eq!(tx.find_bar(100)?, None);
        Ok(())
    })
    .unwrap();

    // The failed transaction leaves the connection usable
    let bar = db
        .with_transaction(|tx| tx.add_bar(BarRecord { id: 100 }))
        .unwrap();
    assert_eq!(bar.id, 100);
}
