//! Daily journaling streak.
//!
//! The streak counts consecutive calendar days with at least one journal
//! entry. It is advanced once per journal save; dates are compared by
//! calendar day only.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which branch a streak update took.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StreakTransition {
    /// No previous entry; the streak starts at 1.
    Started,
    /// Previous entry was yesterday; the streak grows by one.
    Continued,
    /// Previous entry was today; the streak is left as-is.
    Unchanged,
    /// Gap of two or more days, or a last date in the future.
    Reset,
}

impl StreakTransition {
    /// Streak value after this transition.
    pub fn apply(self, current_streak: u32) -> u32 {
        match self {
            StreakTransition::Started | StreakTransition::Reset => 1,
            StreakTransition::Continued => current_streak.saturating_add(1),
            StreakTransition::Unchanged => current_streak,
        }
    }
}

/// Calculator for the journaling streak.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreakCalculator;

impl StreakCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Classify a journal save on `today` given the last journaled day.
    pub fn classify(
        &self,
        last_journal_date: Option<NaiveDate>,
        today: NaiveDate,
    ) -> StreakTransition {
        let Some(last) = last_journal_date else {
            return StreakTransition::Started;
        };

        if last.checked_add_days(Days::new(1)) == Some(today) {
            StreakTransition::Continued
        } else if last == today {
            StreakTransition::Unchanged
        } else {
            StreakTransition::Reset
        }
    }

    /// New streak value for a journal save on `today`.
    ///
    /// The caller persists the result together with `lastJournalDate = today`.
    pub fn advance(
        &self,
        last_journal_date: Option<NaiveDate>,
        current_streak: u32,
        today: NaiveDate,
    ) -> u32 {
        let transition = self.classify(last_journal_date, today);
        let new_streak = transition.apply(current_streak);
        tracing::debug!(
            ?transition,
            ?last_journal_date,
            %today,
            current_streak,
            new_streak,
            "streak advanced"
        );
        new_streak
    }
}
