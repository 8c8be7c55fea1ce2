use clap::{Parser, Subcommand};
use pantry_core::Config;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pantry-cli", version, about = "Pantry CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Meal logging
    Meal {
        #[command(subcommand)]
        action: commands::meal::MealAction,
    },
    /// Food journal
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Weekly cooking goal
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Achievement badges
    Badges {
        #[command(subcommand)]
        action: commands::badges::BadgesAction,
    },
    /// Journaling streak calculator
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    init_logging(&config);

    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action, &config),
        Commands::Meal { action } => commands::meal::run(action, &config),
        Commands::Journal { action } => commands::journal::run(action, &config),
        Commands::Goal { action } => commands::goal::run(action, &config),
        Commands::Badges { action } => commands::badges::run(action, &config),
        Commands::Streak { action } => commands::streak::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
