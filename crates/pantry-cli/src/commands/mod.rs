pub mod badges;
pub mod config;
pub mod goal;
pub mod journal;
pub mod meal;
pub mod profile;
pub mod streak;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use pantry_core::{ActivityService, Config, Database};

pub type CommandResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Open the default database wrapped in an activity service.
pub fn open_service(config: &Config) -> CommandResult<ActivityService<Database>> {
    let db = Database::open()?;
    tracing::debug!("database opened");
    Ok(ActivityService::with_config(db, config))
}

/// Parse `YYYY-MM-DD`, defaulting to today in local time.
pub fn parse_date_or_today(raw: Option<&str>) -> CommandResult<NaiveDate> {
    match raw {
        Some(raw) => Ok(NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}' (expected YYYY-MM-DD): {e}"))?),
        None => Ok(Local::now().date_naive()),
    }
}

/// Parse `YYYY-MM-DDTHH:MM:SS` (or a bare date at midnight), defaulting to
/// the current local time.
pub fn parse_datetime_or_now(raw: Option<&str>) -> CommandResult<NaiveDateTime> {
    let Some(raw) = raw else {
        return Ok(Local::now().naive_local());
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("invalid time '{raw}' (expected YYYY-MM-DDTHH:MM:SS): {e}"))?;
    Ok(date.and_time(NaiveTime::MIN))
}

pub fn print_json<T: serde::Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
