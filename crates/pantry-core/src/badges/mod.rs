//! Achievement badges.
//!
//! - [`catalogue`]: badge identifiers, the unlock policy table and display metadata
//! - [`evaluator`]: the evaluation pass, per-badge progress and unlock announcements

pub mod catalogue;
pub mod evaluator;

pub use catalogue::{BadgeId, BadgeMeta, BadgeMetric, BadgeRule, BADGE_RULES};
pub use evaluator::{BadgeAnnouncement, BadgeEvaluation, BadgeEvaluator, BadgeProgress};
