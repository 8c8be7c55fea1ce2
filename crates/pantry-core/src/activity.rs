//! User activity flows.
//!
//! These are the call sites of the evaluation engine: logging a meal,
//! saving a journal entry, loading the home screen and submitting a weekly
//! goal. Each flow reads the profile, runs the pure evaluators and writes
//! the result back through [`ProfileStore`] in a single atomic step.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::badges::{BadgeAnnouncement, BadgeEvaluator, BadgeId, BadgeProgress};
use crate::error::{Result, ValidationError};
use crate::goal::{GoalScheduleTracker, GoalUpdate, WeeklyProgress};
use crate::model::{UserCounters, UserProfile};
use crate::storage::store::{ActivityRecord, JournalRecord, MealRecord, ProfileStore};
use crate::storage::Config;
use crate::streak::{StreakCalculator, StreakTransition};

/// Result of logging a meal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealOutcome {
    pub meal: MealRecord,
    pub counters: UserCounters,
    pub newly_unlocked: Vec<BadgeId>,
    pub announcement: Option<BadgeAnnouncement>,
}

/// Result of saving a journal entry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalOutcome {
    pub entry: JournalRecord,
    pub transition: StreakTransition,
    pub counters: UserCounters,
    pub newly_unlocked: Vec<BadgeId>,
    pub announcement: Option<BadgeAnnouncement>,
}

/// What the home screen should show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum HomeScreen {
    /// The user must set a weekly goal first.
    GoalPrompt {
        #[serde(rename = "minGoal")]
        min_goal: u32,
    },
    /// Progress toward the current weekly goal.
    Progress(WeeklyProgress),
}

/// Runs activity flows against a profile store.
pub struct ActivityService<S> {
    store: S,
    badges: BadgeEvaluator,
    streaks: StreakCalculator,
    goals: GoalScheduleTracker,
    min_goal: u32,
    announce_badges: bool,
}

impl<S: ProfileStore> ActivityService<S> {
    /// Create a service with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, &Config::default())
    }

    pub fn with_config(store: S, config: &Config) -> Self {
        Self {
            store,
            badges: BadgeEvaluator::new(),
            streaks: StreakCalculator::new(),
            goals: GoalScheduleTracker::with_config(config.goals.clone()),
            min_goal: config.goals.effective_min_goal(),
            announce_badges: config.notifications.announce_badges,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn announcement(&self, unlocked: &[BadgeId]) -> Option<BadgeAnnouncement> {
        if self.announce_badges {
            BadgeAnnouncement::from_unlocked(unlocked)
        } else {
            None
        }
    }

    /// Create a profile with zeroed counters.
    ///
    /// # Errors
    /// Fails for an empty user id or if the profile already exists.
    pub fn create_profile(&mut self, user_id: &str, display_name: &str) -> Result<UserProfile> {
        if user_id.trim().is_empty() {
            return Err(ValidationError::EmptyUserId.into());
        }
        let profile = UserProfile::new(user_id, display_name);
        self.store.create_profile(&profile)?;
        Ok(profile)
    }

    pub fn profile(&self, user_id: &str) -> Result<UserProfile> {
        self.store.load_profile(user_id)
    }

    /// Log a meal: bump the meal counters and evaluate badges.
    pub fn record_meal(
        &mut self,
        user_id: &str,
        caption: &str,
        photo_ref: Option<String>,
        logged_at: DateTime<Utc>,
    ) -> Result<MealOutcome> {
        let meal = MealRecord::new(user_id, caption, photo_ref, logged_at);
        let badges = self.badges;

        let (counters, newly_unlocked) =
            self.store
                .commit_activity(&ActivityRecord::Meal(meal.clone()), |profile| {
                    let counters = &mut profile.counters;
                    counters.photo_count = counters.photo_count.saturating_add(1);
                    counters.current_week_posts = counters.current_week_posts.saturating_add(1);
                    let unlocked = badges.apply(counters);
                    Ok((counters.clone(), unlocked))
                })?;

        tracing::info!(
            %user_id,
            photo_count = counters.photo_count,
            week_posts = counters.current_week_posts,
            unlocked = newly_unlocked.len(),
            "meal logged"
        );

        let announcement = self.announcement(&newly_unlocked);
        Ok(MealOutcome {
            meal,
            counters,
            newly_unlocked,
            announcement,
        })
    }

    /// Save a journal entry for `today`: advance the streak, bump the
    /// journal counter, record the day and evaluate badges.
    pub fn save_journal_entry(
        &mut self,
        user_id: &str,
        body: &str,
        today: NaiveDate,
    ) -> Result<JournalOutcome> {
        let entry = JournalRecord::new(user_id, body, today);
        let badges = self.badges;
        let streaks = self.streaks;

        let (transition, counters, newly_unlocked) =
            self.store
                .commit_activity(&ActivityRecord::Journal(entry.clone()), |profile| {
                    let counters = &mut profile.counters;
                    let transition = streaks.classify(counters.last_journal_date, today);
                    counters.streak_count =
                        streaks.advance(counters.last_journal_date, counters.streak_count, today);
                    counters.last_journal_date = Some(today);
                    counters.journal_count = counters.journal_count.saturating_add(1);
                    let unlocked = badges.apply(counters);
                    Ok((transition, counters.clone(), unlocked))
                })?;

        tracing::info!(
            %user_id,
            ?transition,
            streak = counters.streak_count,
            journal_count = counters.journal_count,
            unlocked = newly_unlocked.len(),
            "journal entry saved"
        );

        let announcement = self.announcement(&newly_unlocked);
        Ok(JournalOutcome {
            entry,
            transition,
            counters,
            newly_unlocked,
            announcement,
        })
    }

    /// Decide what the home screen shows at local time `now`.
    pub fn home_screen(&self, user_id: &str, now: NaiveDateTime) -> Result<HomeScreen> {
        let profile = self.store.load_profile(user_id)?;
        let counters = &profile.counters;
        if self.goals.requires_goal_setting_at(counters, now) {
            return Ok(HomeScreen::GoalPrompt {
                min_goal: self.min_goal,
            });
        }
        // requires_goal_setting_at is false only when both goal fields are set
        match WeeklyProgress::from_counters(counters) {
            Some(progress) => Ok(HomeScreen::Progress(progress)),
            None => Ok(HomeScreen::GoalPrompt {
                min_goal: self.min_goal,
            }),
        }
    }

    /// Submit a weekly goal at local time `now`.
    ///
    /// # Errors
    /// Fails with [`ValidationError::GoalTooLow`] before touching the store
    /// if the goal is below the configured minimum.
    pub fn submit_goal(
        &mut self,
        user_id: &str,
        goal: u32,
        now: NaiveDateTime,
    ) -> Result<GoalUpdate> {
        let update = self.goals.set_goal(goal, now)?;
        self.store.update_profile(user_id, |profile| {
            update.apply(&mut profile.counters);
            Ok(())
        })?;
        Ok(update)
    }

    /// Progress for every catalogue badge.
    pub fn badge_progress(&self, user_id: &str) -> Result<Vec<BadgeProgress>> {
        let profile = self.store.load_profile(user_id)?;
        Ok(self
            .badges
            .progress(&profile.counters, &profile.counters.badges))
    }

    /// Re-run badge evaluation on stored counters, e.g. after importing a
    /// profile written by another client.
    pub fn reevaluate_badges(&mut self, user_id: &str) -> Result<Vec<BadgeId>> {
        let badges = self.badges;
        self.store
            .update_profile(user_id, |profile| Ok(badges.apply(&mut profile.counters)))
    }
}
