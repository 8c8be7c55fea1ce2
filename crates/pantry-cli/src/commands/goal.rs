use clap::Subcommand;
use pantry_core::{Config, HomeScreen};
use serde_json::json;

use super::{open_service, parse_datetime_or_now, print_json, CommandResult};

#[derive(Subcommand)]
pub enum GoalAction {
    /// Check whether a new weekly goal has to be set
    Check {
        /// User id
        user_id: String,
        /// Local time to check at (YYYY-MM-DDTHH:MM:SS, defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Set the weekly cooking goal
    Set {
        /// User id
        user_id: String,
        /// Meals per week
        goal: u32,
        /// Local time of submission (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
    /// Show this week's progress, or the goal prompt
    Progress {
        /// User id
        user_id: String,
        /// Local time (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

pub fn run(action: GoalAction, config: &Config) -> CommandResult {
    let mut service = open_service(config)?;
    match action {
        GoalAction::Check { user_id, at } => {
            let now = parse_datetime_or_now(at.as_deref())?;
            let required = matches!(
                service.home_screen(&user_id, now)?,
                HomeScreen::GoalPrompt { .. }
            );
            print_json(&json!({ "userId": user_id, "requiresGoalSetting": required }))
        }
        GoalAction::Set { user_id, goal, at } => {
            let now = parse_datetime_or_now(at.as_deref())?;
            print_json(&service.submit_goal(&user_id, goal, now)?)
        }
        GoalAction::Progress { user_id, at } => {
            let now = parse_datetime_or_now(at.as_deref())?;
            print_json(&service.home_screen(&user_id, now)?)
        }
    }
}
