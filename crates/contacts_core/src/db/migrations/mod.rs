//! Contact store schema migrations.
//!
//! Each step is an embedded SQL script tagged with the `user_version` it
//! brings the store to. Pending steps run inside one transaction, so a
//! store is either fully upgraded or left at its previous version.
//!
//! A store stamped with a version above [`latest_version`] belongs to a
//! newer build and is refused rather than downgraded.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::{Connection, Transaction};

/// One schema step: target `user_version`, script name and SQL.
type Step = (u32, &'static str, &'static str);

const STEPS: &[Step] = &[
    (1, "0001_init", include_str!("0001_init.sql")),
    (2, "0002_contact_tags", include_str!("0002_contact_tags.sql")),
];

/// Returns the schema version this build writes.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |(version, _, _)| *version)
}

/// Brings the store on `conn` up to [`latest_version`].
///
/// # Errors
/// - `SchemaTooNew` when the store is ahead of this build.
/// - `Sqlite` when a script fails; earlier steps of the same run roll back.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = stored_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    let pending = STEPS
        .iter()
        .filter(|(version, _, _)| *version > found)
        .collect::<Vec<_>>();
    if pending.is_empty() {
        debug!("event=db_migrate module=db status=skip version={found}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        run_step(&tx, step)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from={found} to={supported} steps={}",
        pending.len()
    );
    Ok(())
}

fn run_step(tx: &Transaction<'_>, step: &Step) -> DbResult<()> {
    let (version, name, sql) = *step;
    tx.execute_batch(sql)?;
    tx.pragma_update(None, "user_version", version)?;
    debug!("event=db_migrate module=db status=step version={version} script={name}");
    Ok(())
}

fn stored_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?)
}
