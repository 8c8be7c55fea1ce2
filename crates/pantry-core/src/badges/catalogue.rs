//! Badge catalogue: identifiers, unlock thresholds and display metadata.
//!
//! The identifiers are written verbatim into stored profile documents and
//! must not change.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::model::UserCounters;

/// Counter a badge threshold is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeMetric {
    PhotoCount,
    StreakCount,
    JournalCount,
}

impl BadgeMetric {
    /// Read this metric from a user's counters.
    pub fn read(self, counters: &UserCounters) -> u32 {
        match self {
            BadgeMetric::PhotoCount => counters.photo_count,
            BadgeMetric::StreakCount => counters.streak_count,
            BadgeMetric::JournalCount => counters.journal_count,
        }
    }

    /// Persisted field name of the counter.
    pub fn field_name(self) -> &'static str {
        match self {
            BadgeMetric::PhotoCount => "photoCount",
            BadgeMetric::StreakCount => "streakCount",
            BadgeMetric::JournalCount => "journalCount",
        }
    }
}

/// Achievement badges in catalogue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeId {
    CookFirst,
    #[serde(rename = "meal_10")]
    Meal10,
    #[serde(rename = "meal_20")]
    Meal20,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    Streak30,
    #[serde(rename = "journal_5")]
    Journal5,
    #[serde(rename = "journal_10")]
    Journal10,
    #[serde(rename = "journal_20")]
    Journal20,
}

impl BadgeId {
    pub const ALL: [BadgeId; 9] = [
        BadgeId::CookFirst,
        BadgeId::Meal10,
        BadgeId::Meal20,
        BadgeId::Streak3,
        BadgeId::Streak7,
        BadgeId::Streak30,
        BadgeId::Journal5,
        BadgeId::Journal10,
        BadgeId::Journal20,
    ];

    /// Persisted identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            BadgeId::CookFirst => "cook_first",
            BadgeId::Meal10 => "meal_10",
            BadgeId::Meal20 => "meal_20",
            BadgeId::Streak3 => "streak_3",
            BadgeId::Streak7 => "streak_7",
            BadgeId::Streak30 => "streak_30",
            BadgeId::Journal5 => "journal_5",
            BadgeId::Journal10 => "journal_10",
            BadgeId::Journal20 => "journal_20",
        }
    }

    /// Unlock rule for this badge.
    pub fn rule(self) -> &'static BadgeRule {
        // BADGE_RULES is indexed in the same order as ALL
        &BADGE_RULES[self as usize]
    }

    /// Display metadata for this badge.
    pub fn meta(self) -> BadgeMeta {
        let (name, description, icon) = match self {
            BadgeId::CookFirst => ("First Cook", "Logged your very first meal", "🍳"),
            BadgeId::Meal10 => ("Home Chef", "Logged 10 meals", "🥘"),
            BadgeId::Meal20 => ("Kitchen Regular", "Logged 20 meals", "👩‍🍳"),
            BadgeId::Streak3 => ("Warming Up", "Journaled 3 days in a row", "🔥"),
            BadgeId::Streak7 => ("Week Strong", "Journaled 7 days in a row", "📅"),
            BadgeId::Streak30 => ("Monthly Devotion", "Journaled 30 days in a row", "🏆"),
            BadgeId::Journal5 => ("Storyteller", "Saved 5 journal entries", "📝"),
            BadgeId::Journal10 => ("Food Diarist", "Saved 10 journal entries", "📓"),
            BadgeId::Journal20 => ("Memoirist", "Saved 20 journal entries", "📚"),
        };
        BadgeMeta {
            id: self,
            name,
            description,
            icon,
        }
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BadgeId::ALL
            .into_iter()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownBadge(s.to_string()))
    }
}

/// A single row of the unlock policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeRule {
    pub id: BadgeId,
    pub metric: BadgeMetric,
    pub threshold: u32,
}

impl BadgeRule {
    /// Whether the counters meet this rule's threshold.
    pub fn is_met(&self, counters: &UserCounters) -> bool {
        self.metric.read(counters) >= self.threshold
    }
}

/// Unlock policy table, in evaluation order.
pub static BADGE_RULES: [BadgeRule; 9] = [
    BadgeRule { id: BadgeId::CookFirst, metric: BadgeMetric::PhotoCount, threshold: 1 },
    BadgeRule { id: BadgeId::Meal10, metric: BadgeMetric::PhotoCount, threshold: 10 },
    BadgeRule { id: BadgeId::Meal20, metric: BadgeMetric::PhotoCount, threshold: 20 },
    BadgeRule { id: BadgeId::Streak3, metric: BadgeMetric::StreakCount, threshold: 3 },
    BadgeRule { id: BadgeId::Streak7, metric: BadgeMetric::StreakCount, threshold: 7 },
    BadgeRule { id: BadgeId::Streak30, metric: BadgeMetric::StreakCount, threshold: 30 },
    BadgeRule { id: BadgeId::Journal5, metric: BadgeMetric::JournalCount, threshold: 5 },
    BadgeRule { id: BadgeId::Journal10, metric: BadgeMetric::JournalCount, threshold: 10 },
    BadgeRule { id: BadgeId::Journal20, metric: BadgeMetric::JournalCount, threshold: 20 },
];

/// Display metadata shown when listing or announcing a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BadgeMeta {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
}
