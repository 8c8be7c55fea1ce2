//! # Pantry Core Library
//!
//! Core logic for Pantry, a social cooking log. Users log meals, keep a
//! food journal, set weekly cooking goals and earn achievement badges.
//!
//! ## Architecture
//!
//! - **Evaluation engine**: three pure, deterministic components over a
//!   user's activity counters
//!   - [`BadgeEvaluator`]: which badges a user has newly unlocked
//!   - [`StreakCalculator`]: the daily journaling streak
//!   - [`GoalScheduleTracker`]: whether a new weekly goal must be set
//! - **Activity flows**: [`ActivityService`] runs meal logging, journal
//!   saves, the home-screen check and goal submission against a
//!   [`ProfileStore`], persisting each update atomically
//! - **Storage**: SQLite profile store and TOML configuration

pub mod activity;
pub mod badges;
pub mod error;
pub mod goal;
pub mod model;
pub mod storage;
pub mod streak;

pub use activity::{ActivityService, HomeScreen, JournalOutcome, MealOutcome};
pub use badges::{BadgeAnnouncement, BadgeEvaluation, BadgeEvaluator, BadgeId, BadgeProgress};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use goal::{start_of_week, week_start_at, GoalScheduleTracker, GoalUpdate, WeeklyProgress};
pub use model::{BadgeSet, UserCounters, UserProfile};
pub use storage::{Config, Database, ProfileStore};
pub use streak::{StreakCalculator, StreakTransition};
