pub mod config;
pub mod database;
pub mod migrations;
pub mod store;

pub use config::Config;
pub use database::Database;
pub use store::{JournalRecord, MealRecord, ProfileStore};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the Pantry data directory, creating it if needed.
///
/// - `PANTRY_DATA_DIR`, when set, is used as-is.
/// - Otherwise `~/.config/pantry/`, or `~/.config/pantry-dev/` when
///   `PANTRY_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("PANTRY_DATA_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PANTRY_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pantry-dev")
            } else {
                base_dir.join("pantry")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
