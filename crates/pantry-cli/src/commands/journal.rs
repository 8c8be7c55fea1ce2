use clap::Subcommand;
use pantry_core::{Config, ProfileStore};

use super::{open_service, parse_date_or_today, print_json, CommandResult};

#[derive(Subcommand)]
pub enum JournalAction {
    /// Save a journal entry and advance the streak
    Save {
        /// User id
        user_id: String,
        /// Entry text
        body: String,
        /// Entry date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List recent journal entries, newest first
    List {
        /// User id
        user_id: String,
        /// Maximum number of entries
        #[arg(long, default_value = "20")]
        limit: usize,
    },
}

pub fn run(action: JournalAction, config: &Config) -> CommandResult {
    let mut service = open_service(config)?;
    match action {
        JournalAction::Save {
            user_id,
            body,
            date,
        } => {
            let today = parse_date_or_today(date.as_deref())?;
            let outcome = service.save_journal_entry(&user_id, &body, today)?;
            if let Some(announcement) = &outcome.announcement {
                eprintln!("{}: {}", announcement.title, announcement.body);
            }
            print_json(&outcome)
        }
        JournalAction::List { user_id, limit } => {
            service.profile(&user_id)?;
            print_json(&service.store().list_journal(&user_id, limit)?)
        }
    }
}
