use clap::Subcommand;
use pantry_core::Config;

use super::{open_service, print_json, CommandResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Create a profile with zeroed counters
    Create {
        /// User id
        user_id: String,
        /// Display name (defaults to the user id)
        #[arg(long)]
        name: Option<String>,
    },
    /// Show a profile with its counters and badges
    Show {
        /// User id
        user_id: String,
    },
}

pub fn run(action: ProfileAction, config: &Config) -> CommandResult {
    let mut service = open_service(config)?;
    match action {
        ProfileAction::Create { user_id, name } => {
            let name = name.unwrap_or_else(|| user_id.clone());
            let profile = service.create_profile(&user_id, &name)?;
            print_json(&profile)
        }
        ProfileAction::Show { user_id } => print_json(&service.profile(&user_id)?),
    }
}
