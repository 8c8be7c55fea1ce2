use clap::Subcommand;
use pantry_core::StreakCalculator;
use serde_json::json;

use super::{parse_date_or_today, print_json, CommandResult};

#[derive(Subcommand)]
pub enum StreakAction {
    /// Compute the next streak value without touching stored data
    Advance {
        /// Date of the previous journal entry (YYYY-MM-DD)
        #[arg(long)]
        last: Option<String>,
        /// Current streak value
        #[arg(long, default_value = "0")]
        current: u32,
        /// Today's date (defaults to today)
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(action: StreakAction) -> CommandResult {
    match action {
        StreakAction::Advance {
            last,
            current,
            today,
        } => {
            let last = last
                .as_deref()
                .map(|raw| parse_date_or_today(Some(raw)))
                .transpose()?;
            let today = parse_date_or_today(today.as_deref())?;
            let calculator = StreakCalculator::new();
            let transition = calculator.classify(last, today);
            let streak = calculator.advance(last, current, today);
            print_json(&json!({ "transition": transition, "streak": streak }))
        }
    }
}
