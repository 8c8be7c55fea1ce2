//! Weekly cooking goal tracking.
//!
//! Weeks run from Sunday 00:00 to the following Saturday 23:59:59 in local
//! time. A goal is set for one week at a time; once a new week begins the
//! user is prompted to set a goal again.
//!
//! All week arithmetic goes through [`start_of_week`] so that the prompt
//! check and the `streakStartDate` written on goal submission agree.

use chrono::{Datelike, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::UserCounters;
use crate::storage::config::GoalsConfig;

/// Sunday on or before `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_sunday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// Midnight of the Sunday on or before `at`.
pub fn week_start_at(at: NaiveDateTime) -> NaiveDateTime {
    start_of_week(at.date()).and_time(NaiveTime::MIN)
}

/// Fields written when the user submits a weekly goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub weekly_goal: u32,
    pub streak_start_date: NaiveDate,
    pub current_week_posts: u32,
}

impl GoalUpdate {
    pub fn apply(&self, counters: &mut UserCounters) {
        counters.weekly_goal = Some(self.weekly_goal);
        counters.streak_start_date = Some(self.streak_start_date);
        counters.current_week_posts = self.current_week_posts;
    }
}

/// Progress toward the weekly goal for the home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub goal: u32,
    pub posts: u32,
    pub remaining: u32,
    pub met: bool,
    pub week_start: NaiveDate,
}

impl WeeklyProgress {
    /// Progress for the tracked week, or `None` when no goal is set.
    pub fn from_counters(counters: &UserCounters) -> Option<Self> {
        let goal = counters.weekly_goal?;
        let week_start = start_of_week(counters.streak_start_date?);
        let posts = counters.current_week_posts;
        Some(Self {
            goal,
            posts,
            remaining: goal.saturating_sub(posts),
            met: posts >= goal,
            week_start,
        })
    }
}

/// Decides when the user must (re)set their weekly goal.
#[derive(Debug, Clone)]
pub struct GoalScheduleTracker {
    config: GoalsConfig,
}

impl GoalScheduleTracker {
    pub fn new() -> Self {
        Self {
            config: GoalsConfig::default(),
        }
    }

    pub fn with_config(config: GoalsConfig) -> Self {
        Self { config }
    }

    /// Whether a goal prompt must be shown, using the local system clock.
    pub fn requires_goal_setting(&self, counters: &UserCounters) -> bool {
        self.requires_goal_setting_at(counters, Local::now().naive_local())
    }

    /// Whether a goal prompt must be shown at local time `now`.
    ///
    /// True for users without a goal, and once the week containing `now`
    /// starts after the week the goal was set for.
    pub fn requires_goal_setting_at(&self, counters: &UserCounters, now: NaiveDateTime) -> bool {
        let (Some(_), Some(started)) = (counters.weekly_goal, counters.streak_start_date) else {
            return true;
        };

        let current_week_start = week_start_at(now);
        let last_week_start = week_start_at(started.and_time(NaiveTime::MIN));
        current_week_start > last_week_start
    }

    /// Validate a submitted goal and compute the fields to persist.
    ///
    /// # Errors
    /// Returns [`ValidationError::GoalTooLow`] if `goal` is below the
    /// configured minimum.
    pub fn set_goal(&self, goal: u32, now: NaiveDateTime) -> Result<GoalUpdate, ValidationError> {
        let min = self.config.effective_min_goal();
        if goal < min {
            return Err(ValidationError::GoalTooLow { goal, min });
        }

        let update = GoalUpdate {
            weekly_goal: goal,
            streak_start_date: start_of_week(now.date()),
            current_week_posts: 0,
        };
        tracing::info!(goal, week_start = %update.streak_start_date, "weekly goal set");
        Ok(update)
    }
}

impl Default for GoalScheduleTracker {
    fn default() -> Self {
        Self::new()
    }
}
