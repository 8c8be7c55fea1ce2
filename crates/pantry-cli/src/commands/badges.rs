use clap::Subcommand;
use pantry_core::{BadgeEvaluator, BadgeId, BadgeSet, Config, UserCounters};
use serde_json::json;

use super::{open_service, print_json, CommandResult};

#[derive(Subcommand)]
pub enum BadgesAction {
    /// Show progress towards every badge for a user
    List {
        /// User id
        user_id: String,
    },
    /// Re-run evaluation on a user's stored counters
    Refresh {
        /// User id
        user_id: String,
    },
    /// Evaluate badges for ad-hoc counters without touching stored data
    Evaluate {
        #[arg(long, default_value = "0")]
        photos: u32,
        #[arg(long, default_value = "0")]
        streak: u32,
        #[arg(long, default_value = "0")]
        journals: u32,
        /// Already earned badge ids, comma separated
        #[arg(long, value_delimiter = ',')]
        earned: Vec<String>,
    },
    /// Print the badge catalogue
    Catalogue,
}

pub fn run(action: BadgesAction, config: &Config) -> CommandResult {
    match action {
        BadgesAction::List { user_id } => {
            let service = open_service(config)?;
            print_json(&service.badge_progress(&user_id)?)
        }
        BadgesAction::Refresh { user_id } => {
            let mut service = open_service(config)?;
            let unlocked = service.reevaluate_badges(&user_id)?;
            print_json(&json!({ "newlyUnlocked": unlocked }))
        }
        BadgesAction::Evaluate {
            photos,
            streak,
            journals,
            earned,
        } => {
            let current: BadgeSet = earned.into_iter().filter(|id| !id.is_empty()).collect();
            let counters = UserCounters {
                photo_count: photos,
                streak_count: streak,
                journal_count: journals,
                ..Default::default()
            };
            print_json(&BadgeEvaluator::new().evaluate(&counters, &current))
        }
        BadgesAction::Catalogue => {
            let catalogue: Vec<_> = BadgeId::ALL
                .iter()
                .map(|id| {
                    let rule = id.rule();
                    let meta = id.meta();
                    json!({
                        "id": id,
                        "name": meta.name,
                        "description": meta.description,
                        "icon": meta.icon,
                        "metric": rule.metric,
                        "threshold": rule.threshold,
                    })
                })
                .collect();
            print_json(&catalogue)
        }
    }
}
