use chrono::Utc;
use clap::Subcommand;
use pantry_core::{Config, ProfileStore};

use super::{open_service, print_json, CommandResult};

#[derive(Subcommand)]
pub enum MealAction {
    /// Log a cooked meal
    Log {
        /// User id
        user_id: String,
        /// Caption
        caption: String,
        /// Reference to the uploaded photo
        #[arg(long)]
        photo: Option<String>,
    },
    /// List recent meals, newest first
    List {
        /// User id
        user_id: String,
        /// Maximum number of meals
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn run(action: MealAction, config: &Config) -> CommandResult {
    let mut service = open_service(config)?;
    match action {
        MealAction::Log {
            user_id,
            caption,
            photo,
        } => {
            let outcome = service.record_meal(&user_id, &caption, photo, Utc::now())?;
            if let Some(announcement) = &outcome.announcement {
                eprintln!("{}: {}", announcement.title, announcement.body);
            }
            print_json(&outcome)
        }
        MealAction::List { user_id, limit } => {
            // Unknown users are an error, not an empty list
            service.profile(&user_id)?;
            print_json(&service.store().list_meals(&user_id, limit)?)
        }
    }
}
