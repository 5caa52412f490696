//! Database schema migrations for steprush.
//!
//! Migrations are versioned and applied automatically when opening the
//! database. The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Apply all pending migrations.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Current schema version, 0 for a fresh database.
fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or(0)
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: initial schema.
///
/// - `kv`: string key-value store; the reconciler's persisted pair lives
///   here under `total_steps` / `last_daily_steps` / `last_update_date`.
/// - `daily_steps`: one row per local calendar day, upserted on refresh.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS daily_steps (
            day        TEXT PRIMARY KEY,
            steps      INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;

    tx.commit()
}

/// Migration v2: record which source reported each day.
///
/// Adds `daily_steps.source` plus an index for history queries ordered by
/// recency.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE daily_steps ADD COLUMN source TEXT NOT NULL DEFAULT '';
         CREATE INDEX IF NOT EXISTS idx_daily_steps_updated_at ON daily_steps(updated_at);",
    )?;

    set_schema_version(&tx, 2)?;

    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), 2);

        // All columns exist, including the v2 addition.
        conn.execute(
            "INSERT INTO daily_steps (day, steps, updated_at, source)
             VALUES ('2026-08-25', 1234, '2026-08-25T12:00:00+00:00', 'export')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO kv (key, value) VALUES ('total_steps', '1234')",
            [],
        )
        .unwrap();
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);
    }

    #[test]
    fn migrate_upgrades_v1_database() {
        let conn = Connection::open_in_memory().unwrap();

        // A database created before the source column existed.
        conn.execute_batch(
            "CREATE TABLE schema_version (version INTEGER PRIMARY KEY);
             INSERT INTO schema_version (version) VALUES (1);
             CREATE TABLE kv (key TEXT PRIMARY KEY, value TEXT NOT NULL);
             CREATE TABLE daily_steps (
                 day        TEXT PRIMARY KEY,
                 steps      INTEGER NOT NULL,
                 updated_at TEXT NOT NULL
             );
             INSERT INTO daily_steps (day, steps, updated_at)
             VALUES ('2026-08-24', 9000, '2026-08-24T23:00:00+00:00');",
        )
        .unwrap();

        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), 2);

        // Existing rows pick up the default source.
        let source: String = conn
            .query_row(
                "SELECT source FROM daily_steps WHERE day = '2026-08-24'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(source, "");
    }
}
