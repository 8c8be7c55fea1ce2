//! Badge unlock evaluation.
//!
//! Each badge is a two-state automaton (locked, unlocked) where unlocked is
//! terminal. An evaluation pass walks the policy table in order and unlocks
//! every badge whose metric has reached its threshold.

use serde::Serialize;

use super::catalogue::{BadgeId, BadgeMetric, BADGE_RULES};
use crate::model::{BadgeSet, UserCounters};

/// Result of a single evaluation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeEvaluation {
    /// Input badges plus everything unlocked in this pass.
    pub updated_badges: BadgeSet,
    /// Badges unlocked in this pass, in table order.
    pub newly_unlocked: Vec<BadgeId>,
}

impl BadgeEvaluation {
    pub fn has_unlocks(&self) -> bool {
        !self.newly_unlocked.is_empty()
    }
}

/// Progress of one catalogue badge, for badge listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeProgress {
    pub id: BadgeId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub metric: BadgeMetric,
    pub current: u32,
    pub threshold: u32,
    pub earned: bool,
}

/// Stateless badge evaluator over the fixed policy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BadgeEvaluator;

impl BadgeEvaluator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the updated badge set for `counters`.
    ///
    /// Badges already earned in `current` are never cleared, even if the
    /// counter they were earned on has since dropped below the threshold.
    pub fn evaluate(&self, counters: &UserCounters, current: &BadgeSet) -> BadgeEvaluation {
        let mut updated_badges = current.clone();
        let mut newly_unlocked = Vec::new();

        for rule in BADGE_RULES.iter() {
            if rule.is_met(counters) && updated_badges.unlock(rule.id.as_str()) {
                newly_unlocked.push(rule.id);
            }
        }

        if !newly_unlocked.is_empty() {
            tracing::info!(
                badges = ?newly_unlocked.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
                photo_count = counters.photo_count,
                streak_count = counters.streak_count,
                journal_count = counters.journal_count,
                "badges unlocked"
            );
        }

        BadgeEvaluation {
            updated_badges,
            newly_unlocked,
        }
    }

    /// Evaluate against the badges stored in `counters` and write the
    /// result back. Returns the badges unlocked by this call.
    pub fn apply(&self, counters: &mut UserCounters) -> Vec<BadgeId> {
        let evaluation = self.evaluate(counters, &counters.badges);
        counters.badges = evaluation.updated_badges;
        evaluation.newly_unlocked
    }

    /// Progress for every catalogue badge, in table order.
    pub fn progress(&self, counters: &UserCounters, badges: &BadgeSet) -> Vec<BadgeProgress> {
        BADGE_RULES
            .iter()
            .map(|rule| {
                let meta = rule.id.meta();
                BadgeProgress {
                    id: rule.id,
                    name: meta.name,
                    description: meta.description,
                    icon: meta.icon,
                    metric: rule.metric,
                    current: rule.metric.read(counters),
                    threshold: rule.threshold,
                    earned: badges.is_earned(rule.id.as_str()),
                }
            })
            .collect()
    }
}

/// User-facing message listing newly unlocked badges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeAnnouncement {
    pub title: String,
    pub body: String,
}

impl BadgeAnnouncement {
    /// Build the announcement for a pass, or `None` when nothing unlocked.
    pub fn from_unlocked(unlocked: &[BadgeId]) -> Option<Self> {
        if unlocked.is_empty() {
            return None;
        }

        let title = if unlocked.len() == 1 {
            "New badge unlocked!".to_string()
        } else {
            format!("{} new badges unlocked!", unlocked.len())
        };
        let body = unlocked
            .iter()
            .map(|id| {
                let meta = id.meta();
                format!("{} {}", meta.icon, meta.name)
            })
            .collect::<Vec<_>>()
            .join(", ");

        Some(Self { title, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counters(photo: u32, streak: u32, journal: u32) -> UserCounters {
        UserCounters {
            photo_count: photo,
            streak_count: streak,
            journal_count: journal,
            ..Default::default()
        }
    }

    #[test]
    fn first_meal_unlocks_cook_first() {
        let eval = BadgeEvaluator::new().evaluate(&counters(1, 0, 0), &BadgeSet::new());
        assert_eq!(eval.newly_unlocked, vec![BadgeId::CookFirst]);
        let expected: BadgeSet = ["cook_first"].into_iter().collect();
        assert_eq!(eval.updated_badges, expected);
    }

    #[test]
    fn unlocks_in_table_order() {
        let current: BadgeSet = ["cook_first"].into_iter().collect();
        let eval = BadgeEvaluator::new().evaluate(&counters(10, 7, 0), &current);
        assert_eq!(
            eval.newly_unlocked,
            vec![BadgeId::Meal10, BadgeId::Streak3, BadgeId::Streak7]
        );
        assert_eq!(eval.updated_badges.len(), 4);
        for id in ["cook_first", "meal_10", "streak_3", "streak_7"] {
            assert!(eval.updated_badges.is_earned(id), "{id} should be earned");
        }
    }

    #[test]
    fn nothing_unlocked_for_zero_counters() {
        let eval = BadgeEvaluator::new().evaluate(&UserCounters::default(), &BadgeSet::new());
        assert!(!eval.has_unlocks());
        assert!(eval.updated_badges.is_empty());
    }

    #[test]
    fn earned_badges_survive_counter_drop() {
        let current: BadgeSet = ["streak_7", "streak_3"].into_iter().collect();
        let eval = BadgeEvaluator::new().evaluate(&counters(0, 1, 0), &current);
        assert!(eval.newly_unlocked.is_empty());
        assert_eq!(eval.updated_badges, current);
    }

    #[test]
    fn second_pass_is_idempotent() {
        let evaluator = BadgeEvaluator::new();
        let c = counters(25, 30, 20);
        let first = evaluator.evaluate(&c, &BadgeSet::new());
        assert_eq!(first.newly_unlocked.len(), 9);

        let second = evaluator.evaluate(&c, &first.updated_badges);
        assert!(second.newly_unlocked.is_empty());
        assert_eq!(second.updated_badges, first.updated_badges);
    }

    #[test]
    fn false_entry_counts_as_locked() {
        let current: BadgeSet = serde_json::from_str(r#"{"cook_first": false}"#).unwrap();
        let eval = BadgeEvaluator::new().evaluate(&counters(1, 0, 0), &current);
        assert_eq!(eval.newly_unlocked, vec![BadgeId::CookFirst]);
        assert!(eval.updated_badges.is_earned("cook_first"));
    }

    #[test]
    fn apply_writes_back_to_counters() {
        let mut c = counters(0, 3, 5);
        let unlocked = BadgeEvaluator::new().apply(&mut c);
        assert_eq!(unlocked, vec![BadgeId::Streak3, BadgeId::Journal5]);
        assert!(c.badges.is_earned("journal_5"));
    }

    #[test]
    fn progress_lists_every_badge() {
        let c = counters(12, 0, 6);
        let badges: BadgeSet = ["cook_first", "meal_10"].into_iter().collect();
        let progress = BadgeEvaluator::new().progress(&c, &badges);

        assert_eq!(progress.len(), 9);
        assert_eq!(progress[1].id, BadgeId::Meal10);
        assert!(progress[1].earned);
        assert_eq!(progress[2].current, 12);
        assert_eq!(progress[2].threshold, 20);
        assert!(!progress[2].earned);
        // met but not yet evaluated
        assert_eq!(progress[6].id, BadgeId::Journal5);
        assert!(!progress[6].earned);
    }

    #[test]
    fn announcement_lists_badge_names() {
        assert!(BadgeAnnouncement::from_unlocked(&[]).is_none());

        let single = BadgeAnnouncement::from_unlocked(&[BadgeId::CookFirst]).unwrap();
        assert_eq!(single.title, "New badge unlocked!");
        assert_eq!(single.body, "🍳 First Cook");

        let many =
            BadgeAnnouncement::from_unlocked(&[BadgeId::Meal10, BadgeId::Streak3]).unwrap();
        assert_eq!(many.title, "2 new badges unlocked!");
        assert_eq!(many.body, "🥘 Home Chef, 🔥 Warming Up");
    }
}
