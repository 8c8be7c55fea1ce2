//! SQLite-backed profile store.
//!
//! Provides persistent storage for:
//! - User profile documents (counters, badges, goal fields) as JSON
//! - Meal log and journal entry history
//!
//! Profile documents keep the field names of the mobile client's schema so
//! they can be exchanged with it unchanged.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use super::data_dir;
use super::migrations;
use super::store::{ActivityRecord, JournalRecord, MealRecord, ProfileStore};
use crate::error::{CoreError, DatabaseError, Result};
use crate::model::UserProfile;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
fn timestamp(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// SQLite database holding profiles and activity history.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/pantry/pantry.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pantry.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::init(conn)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    fn read_profile(conn: &Connection, user_id: &str) -> Result<UserProfile> {
        let document: Option<String> = conn
            .query_row(
                "SELECT document FROM profiles WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;
        let document = document.ok_or_else(|| CoreError::ProfileNotFound(user_id.to_string()))?;
        Ok(UserProfile::from_document(serde_json::from_str(&document)?)?)
    }

    fn write_profile(conn: &Connection, profile: &UserProfile) -> Result<()> {
        let document = serde_json::to_string(profile)?;
        conn.execute(
            "UPDATE profiles SET document = ?1, updated_at = ?2 WHERE user_id = ?3",
            params![document, timestamp(&profile.updated_at), profile.user_id],
        )?;
        Ok(())
    }

    fn insert_activity(conn: &Connection, record: &ActivityRecord) -> Result<()> {
        match record {
            ActivityRecord::Meal(meal) => {
                conn.execute(
                    "INSERT INTO meal_logs (id, user_id, caption, photo_ref, logged_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        meal.id.to_string(),
                        meal.user_id,
                        meal.caption,
                        meal.photo_ref,
                        timestamp(&meal.logged_at),
                    ],
                )?;
            }
            ActivityRecord::Journal(entry) => {
                conn.execute(
                    "INSERT INTO journal_entries (id, user_id, body, entry_date, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        entry.id.to_string(),
                        entry.user_id,
                        entry.body,
                        entry.entry_date.format("%Y-%m-%d").to_string(),
                        timestamp(&entry.created_at),
                    ],
                )?;
            }
        }
        Ok(())
    }

    /// Read-modify-write under an immediate transaction so concurrent
    /// writers on the same file serialize.
    fn modify<T, F>(
        &mut self,
        user_id: &str,
        record: Option<&ActivityRecord>,
        update: F,
    ) -> Result<T>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut profile = Self::read_profile(&tx, user_id)?;
        if let Some(record) = record {
            Self::insert_activity(&tx, record)?;
        }
        let out = update(&mut profile)?;
        profile.updated_at = Utc::now();
        Self::write_profile(&tx, &profile)?;

        tx.commit()?;
        Ok(out)
    }
}

fn parse_uuid(idx: usize, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_date(idx: usize, raw: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

impl ProfileStore for Database {
    fn create_profile(&mut self, profile: &UserProfile) -> Result<()> {
        let document = serde_json::to_string(profile)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO profiles (user_id, document, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                profile.user_id,
                document,
                timestamp(&profile.created_at),
                timestamp(&profile.updated_at),
            ],
        )?;
        if inserted == 0 {
            return Err(CoreError::ProfileExists(profile.user_id.clone()));
        }
        tracing::debug!(user_id = %profile.user_id, "profile created");
        Ok(())
    }

    fn load_profile(&self, user_id: &str) -> Result<UserProfile> {
        Self::read_profile(&self.conn, user_id)
    }

    fn update_profile<T, F>(&mut self, user_id: &str, update: F) -> Result<T>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>,
    {
        self.modify(user_id, None, update)
    }

    fn commit_activity<T, F>(&mut self, record: &ActivityRecord, update: F) -> Result<T>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>,
    {
        self.modify(record.user_id(), Some(record), update)
    }

    fn list_meals(&self, user_id: &str, limit: usize) -> Result<Vec<MealRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, caption, photo_ref, logged_at
             FROM meal_logs
             WHERE user_id = ?1
             ORDER BY logged_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            Ok(MealRecord {
                id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                user_id: row.get(1)?,
                caption: row.get(2)?,
                photo_ref: row.get(3)?,
                logged_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
            })
        })?;
        let meals = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(meals)
    }

    fn list_journal(&self, user_id: &str, limit: usize) -> Result<Vec<JournalRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, body, entry_date, created_at
             FROM journal_entries
             WHERE user_id = ?1
             ORDER BY entry_date DESC, created_at DESC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![user_id, limit as i64], |row| {
            Ok(JournalRecord {
                id: parse_uuid(0, &row.get::<_, String>(0)?)?,
                user_id: row.get(1)?,
                body: row.get(2)?,
                entry_date: parse_date(3, &row.get::<_, String>(3)?)?,
                created_at: parse_timestamp(4, &row.get::<_, String>(4)?)?,
            })
        })?;
        let entries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserCounters;

    fn db_with_user(user_id: &str) -> Database {
        let mut db = Database::open_memory().unwrap();
        db.create_profile(&UserProfile::new(user_id, "Test Cook")).unwrap();
        db
    }

    #[test]
    fn create_and_load_profile() {
        let db = db_with_user("u1");
        let profile = db.load_profile("u1").unwrap();
        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.display_name, "Test Cook");
        assert_eq!(profile.counters, UserCounters::default());
    }

    #[test]
    fn duplicate_profile_is_rejected() {
        let mut db = db_with_user("u1");
        let err = db.create_profile(&UserProfile::new("u1", "Again")).unwrap_err();
        assert!(matches!(err, CoreError::ProfileExists(id) if id == "u1"));
    }

    #[test]
    fn missing_profile_is_not_found() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.load_profile("nobody"),
            Err(CoreError::ProfileNotFound(id)) if id == "nobody"
        ));
    }

    #[test]
    fn update_profile_persists_changes() {
        let mut db = db_with_user("u1");
        let count = db
            .update_profile("u1", |p| {
                p.counters.photo_count += 2;
                Ok(p.counters.photo_count)
            })
            .unwrap();
        assert_eq!(count, 2);
        assert_eq!(db.load_profile("u1").unwrap().counters.photo_count, 2);
    }

    #[test]
    fn failed_update_writes_nothing() {
        let mut db = db_with_user("u1");
        let result: Result<()> = db.update_profile("u1", |p| {
            p.counters.photo_count = 99;
            Err(CoreError::ProfileNotFound("simulated".into()))
        });
        assert!(result.is_err());
        assert_eq!(db.load_profile("u1").unwrap().counters.photo_count, 0);
    }

    #[test]
    fn failed_activity_commit_drops_record() {
        let mut db = db_with_user("u1");
        let meal = MealRecord::new("u1", "Toast", None, Utc::now());
        let result: Result<()> = db.commit_activity(&ActivityRecord::Meal(meal), |_| {
            Err(CoreError::ProfileNotFound("simulated".into()))
        });
        assert!(result.is_err());
        assert!(db.list_meals("u1", 10).unwrap().is_empty());
    }

    #[test]
    fn activity_history_is_newest_first() {
        let mut db = db_with_user("u1");
        let base = Utc::now();
        for (i, caption) in ["Soup", "Curry", "Pie"].into_iter().enumerate() {
            let logged_at = base + chrono::Duration::minutes(i as i64);
            let meal = MealRecord::new("u1", caption, None, logged_at);
            db.commit_activity(&ActivityRecord::Meal(meal), |_| Ok(())).unwrap();
        }
        let meals = db.list_meals("u1", 2).unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].caption, "Pie");
        assert_eq!(meals[1].caption, "Curry");

        let day = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let entry = JournalRecord::new("u1", "Tried a new spice", day);
        db.commit_activity(&ActivityRecord::Journal(entry.clone()), |_| Ok(()))
            .unwrap();
        let entries = db.list_journal("u1", 10).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, entry.id);
        assert_eq!(entries[0].entry_date, day);
    }

    #[test]
    fn legacy_document_loads_with_canonical_streak() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now().to_rfc3339();
        let doc = serde_json::json!({
            "userId": "legacy",
            "streak": 3,
            "photoCount": 1,
            "createdAt": now,
            "updatedAt": now,
        });
        db.conn()
            .execute(
                "INSERT INTO profiles (user_id, document, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?3)",
                params!["legacy", doc.to_string(), now],
            )
            .unwrap();

        let profile = db.load_profile("legacy").unwrap();
        assert_eq!(profile.counters.streak_count, 3);
        assert_eq!(profile.counters.photo_count, 1);
    }

    #[test]
    fn on_disk_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pantry.db");
        {
            let mut db = Database::open_at(&path).unwrap();
            db.create_profile(&UserProfile::new("u1", "Disk")).unwrap();
            db.update_profile("u1", |p| {
                p.counters.journal_count = 4;
                Ok(())
            })
            .unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.load_profile("u1").unwrap().counters.journal_count, 4);
    }
}
