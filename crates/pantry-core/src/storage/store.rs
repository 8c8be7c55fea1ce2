//! Profile store abstraction.
//!
//! Every counter update is a read-modify-write cycle on a profile document.
//! Implementations must run each cycle atomically per user so that two
//! concurrent saves cannot overwrite each other's counters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::model::UserProfile;

/// A logged meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecord {
    pub id: Uuid,
    pub user_id: String,
    pub caption: String,
    /// Reference to the uploaded photo; upload itself happens elsewhere.
    pub photo_ref: Option<String>,
    pub logged_at: DateTime<Utc>,
}

impl MealRecord {
    pub fn new(
        user_id: impl Into<String>,
        caption: impl Into<String>,
        photo_ref: Option<String>,
        logged_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            caption: caption.into(),
            photo_ref,
            logged_at,
        }
    }
}

/// A saved journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalRecord {
    pub id: Uuid,
    pub user_id: String,
    pub body: String,
    /// Calendar day the entry counts toward.
    pub entry_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl JournalRecord {
    pub fn new(user_id: impl Into<String>, body: impl Into<String>, entry_date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            body: body.into(),
            entry_date,
            created_at: Utc::now(),
        }
    }
}

/// Activity appended alongside a counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityRecord {
    Meal(MealRecord),
    Journal(JournalRecord),
}

impl ActivityRecord {
    pub fn user_id(&self) -> &str {
        match self {
            ActivityRecord::Meal(meal) => &meal.user_id,
            ActivityRecord::Journal(entry) => &entry.user_id,
        }
    }
}

/// Persistence for user profiles and their activity history.
pub trait ProfileStore {
    /// Insert a new profile.
    ///
    /// # Errors
    /// Fails with [`crate::CoreError::ProfileExists`] if the user already has one.
    fn create_profile(&mut self, profile: &UserProfile) -> Result<()>;

    /// Load a profile.
    ///
    /// # Errors
    /// Fails with [`crate::CoreError::ProfileNotFound`] for unknown users.
    fn load_profile(&self, user_id: &str) -> Result<UserProfile>;

    /// Apply `update` to the stored profile and write it back atomically.
    ///
    /// Nothing is written if `update` returns an error.
    fn update_profile<T, F>(&mut self, user_id: &str, update: F) -> Result<T>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>;

    /// Append `record` and apply `update` to its owner's profile in the
    /// same atomic step.
    fn commit_activity<T, F>(&mut self, record: &ActivityRecord, update: F) -> Result<T>
    where
        F: FnOnce(&mut UserProfile) -> Result<T>;

    /// Meals logged by a user, newest first.
    fn list_meals(&self, user_id: &str, limit: usize) -> Result<Vec<MealRecord>>;

    /// Journal entries of a user, newest first.
    fn list_journal(&self, user_id: &str, limit: usize) -> Result<Vec<JournalRecord>>;
}
