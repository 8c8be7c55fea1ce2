//! Database schema migrations for pantry.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{params, Connection, Result as SqliteResult};

use crate::model::normalize_legacy_fields;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
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

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

/// Migration v1: profiles, meal logs and journal entries.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS profiles (
            user_id     TEXT PRIMARY KEY,
            document    TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            updated_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS meal_logs (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            caption     TEXT NOT NULL DEFAULT '',
            photo_ref   TEXT,
            logged_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS journal_entries (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            body        TEXT NOT NULL,
            entry_date  TEXT NOT NULL,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_meal_logs_user_logged_at ON meal_logs(user_id, logged_at);
        CREATE INDEX IF NOT EXISTS idx_journal_entries_user_date ON journal_entries(user_id, entry_date);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: fold the legacy `streak` key into `streakCount` in stored
/// profile documents.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    let documents: Vec<(String, String)> = {
        let mut stmt = tx.prepare("SELECT user_id, document FROM profiles")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        let documents = rows.collect::<SqliteResult<Vec<_>>>()?;
        documents
    };

    let mut rewritten = 0usize;
    for (user_id, document) in documents {
        let mut doc: serde_json::Value = match serde_json::from_str(&document) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(%user_id, error = %e, "skipping unreadable profile document");
                continue;
            }
        };
        if normalize_legacy_fields(&mut doc) {
            tx.execute(
                "UPDATE profiles SET document = ?1 WHERE user_id = ?2",
                params![doc.to_string(), user_id],
            )?;
            rewritten += 1;
        }
    }
    if rewritten > 0 {
        tracing::info!(rewritten, "migrated legacy streak field");
    }

    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);

        // idempotent
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn v2_rewrites_legacy_streak_key() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO profiles (user_id, document, created_at, updated_at)
             VALUES ('u1', '{\"userId\":\"u1\",\"streak\":4}', '', '')",
            [],
        )
        .unwrap();

        migrate(&conn).unwrap();

        let document: String = conn
            .query_row("SELECT document FROM profiles WHERE user_id = 'u1'", [], |row| {
                row.get(0)
            })
            .unwrap();
        let doc: serde_json::Value = serde_json::from_str(&document).unwrap();
        assert_eq!(doc["streakCount"], 4);
        assert!(doc.get("streak").is_none());
    }
}
