//! User profile data model.
//!
//! Field names follow the persisted document schema (`photoCount`,
//! `streakCount`, `badges`, ...), so a profile serialized here is
//! interchangeable with the documents the mobile client writes.
//!
//! Counters and the badge map default to empty both when the key is
//! missing and when it is stored as `null`; the evaluators never deal
//! with absent counters.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// Legacy key written by an older profile-creation path.
pub const LEGACY_STREAK_KEY: &str = "streak";
/// Canonical key for the journaling streak.
pub const STREAK_KEY: &str = "streakCount";

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Set of earned badges, persisted as a map of badge id to `true`.
///
/// Entries are only ever added. Keys that are not part of the current
/// catalogue are kept as-is so that older documents survive a round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeSet(BTreeMap<String, bool>);

impl BadgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the badge is recorded as earned (`true`).
    pub fn is_earned(&self, id: &str) -> bool {
        self.0.get(id).copied().unwrap_or(false)
    }

    /// Mark a badge as earned. Returns `true` if it was not earned before.
    pub fn unlock(&mut self, id: &str) -> bool {
        if self.is_earned(id) {
            return false;
        }
        self.0.insert(id.to_string(), true);
        true
    }

    /// Earned badge ids in key order.
    pub fn earned(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, earned)| **earned)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.earned().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<S: Into<String>> FromIterator<S> for BadgeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(|id| (id.into(), true)).collect())
    }
}

/// Activity counters that drive badge, streak and weekly goal logic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCounters {
    /// Total meals logged (photos posted).
    #[serde(default, deserialize_with = "null_as_default")]
    pub photo_count: u32,

    /// Total journal entries saved.
    #[serde(default, deserialize_with = "null_as_default")]
    pub journal_count: u32,

    /// Consecutive-day journaling streak.
    #[serde(default, deserialize_with = "null_as_default", alias = "streak")]
    pub streak_count: u32,

    /// Last calendar day a journal entry was saved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_journal_date: Option<NaiveDate>,

    /// Meals the user aims to log in the tracked week.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_goal: Option<u32>,

    /// Sunday of the week the weekly goal was set for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak_start_date: Option<NaiveDate>,

    /// Meals logged within the tracked week.
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_week_posts: u32,

    #[serde(default, deserialize_with = "null_as_default")]
    pub badges: BadgeSet,
}

impl UserCounters {
    /// Deserialize counters from a stored document, folding the legacy
    /// `streak` key into `streakCount`.
    ///
    /// When both keys are present the canonical one wins.
    pub fn from_document(mut doc: serde_json::Value) -> serde_json::Result<Self> {
        normalize_legacy_fields(&mut doc);
        serde_json::from_value(doc)
    }
}

/// Rewrite a stored profile document in place so it only uses canonical
/// field names. Returns `true` if anything changed.
pub fn normalize_legacy_fields(doc: &mut serde_json::Value) -> bool {
    let Some(obj) = doc.as_object_mut() else {
        return false;
    };
    let Some(legacy) = obj.remove(LEGACY_STREAK_KEY) else {
        return false;
    };
    obj.entry(STREAK_KEY).or_insert(legacy);
    true
}

/// A user's profile document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(flatten)]
    pub counters: UserCounters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// New profile with zeroed counters and no weekly goal.
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            counters: UserCounters::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Deserialize a stored document, folding legacy field names.
    pub fn from_document(mut doc: serde_json::Value) -> serde_json::Result<Self> {
        normalize_legacy_fields(&mut doc);
        serde_json::from_value(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_and_null_counters_default_to_zero() {
        let counters: UserCounters =
            serde_json::from_value(json!({ "photoCount": null, "journalCount": 4, "badges": null }))
                .unwrap();
        assert_eq!(counters.photo_count, 0);
        assert_eq!(counters.journal_count, 4);
        assert_eq!(counters.streak_count, 0);
        assert_eq!(counters.weekly_goal, None);
        assert!(counters.badges.is_empty());
    }

    #[test]
    fn legacy_streak_key_is_read_as_streak_count() {
        let counters = UserCounters::from_document(json!({ "streak": 6 })).unwrap();
        assert_eq!(counters.streak_count, 6);
    }

    #[test]
    fn canonical_streak_key_wins_over_legacy() {
        let counters =
            UserCounters::from_document(json!({ "streak": 2, "streakCount": 9 })).unwrap();
        assert_eq!(counters.streak_count, 9);
    }

    #[test]
    fn serializes_persisted_field_names() {
        let counters = UserCounters {
            photo_count: 3,
            streak_count: 2,
            last_journal_date: NaiveDate::from_ymd_opt(2024, 6, 10),
            weekly_goal: Some(4),
            streak_start_date: NaiveDate::from_ymd_opt(2024, 6, 9),
            badges: ["cook_first"].into_iter().collect(),
            ..Default::default()
        };
        let value = serde_json::to_value(&counters).unwrap();
        assert_eq!(value["photoCount"], 3);
        assert_eq!(value["streakCount"], 2);
        assert_eq!(value["lastJournalDate"], "2024-06-10");
        assert_eq!(value["weeklyGoal"], 4);
        assert_eq!(value["streakStartDate"], "2024-06-09");
        assert_eq!(value["currentWeekPosts"], 0);
        assert_eq!(value["badges"], json!({ "cook_first": true }));
        assert!(value.get("streak").is_none());
    }

    #[test]
    fn unset_goal_fields_are_omitted() {
        let value = serde_json::to_value(UserCounters::default()).unwrap();
        assert!(value.get("weeklyGoal").is_none());
        assert!(value.get("streakStartDate").is_none());
        assert!(value.get("lastJournalDate").is_none());
    }

    #[test]
    fn badge_set_unlock_is_append_only() {
        let mut badges = BadgeSet::new();
        assert!(badges.unlock("meal_10"));
        assert!(!badges.unlock("meal_10"));
        assert!(badges.is_earned("meal_10"));
        assert_eq!(badges.len(), 1);
    }

    #[test]
    fn badge_set_keeps_unknown_and_false_entries() {
        let badges: BadgeSet =
            serde_json::from_value(json!({ "meal_50": true, "streak_3": false })).unwrap();
        assert!(badges.is_earned("meal_50"));
        assert!(!badges.is_earned("streak_3"));
        assert_eq!(badges.earned().collect::<Vec<_>>(), vec!["meal_50"]);

        let back = serde_json::to_value(&badges).unwrap();
        assert_eq!(back, json!({ "meal_50": true, "streak_3": false }));
    }

    #[test]
    fn profile_document_is_flat() {
        let mut profile = UserProfile::new("u1", "Ada");
        profile.counters.photo_count = 1;
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["displayName"], "Ada");
        assert_eq!(value["photoCount"], 1);

        let parsed = UserProfile::from_document(value).unwrap();
        assert_eq!(parsed, profile);
    }
}
