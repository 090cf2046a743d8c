use std::path::PathBuf;

use chrono_tz::Tz;
use clap::Parser;
use serde::Deserialize;

use crate::{
    cli::Command,
    error::{AppError, Result},
};

const DEFAULT_CONFIG_PATH: &str = "config/hisab.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub state_path: PathBuf,
    pub timezone: String,
    pub history_limit: usize,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from("config/hisab_state.json"),
            timezone: "Asia/Kolkata".to_string(),
            history_limit: engine::history::DEFAULT_LIMIT,
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::Timezone(self.timezone.clone()))
    }
}

#[derive(Debug, Parser)]
#[command(name = "hisab", about = "Day-by-day cash-book")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override the state file path.
    #[arg(long)]
    state: Option<PathBuf>,
    /// Override timezone (IANA name).
    #[arg(long)]
    timezone: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

/// Settings from file, `HISAB_*` environment and command line, plus the
/// requested command.
pub fn load() -> Result<(AppConfig, Option<Command>)> {
    let args = Args::parse();

    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix("HISAB"));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    if let Some(state) = args.state {
        settings.state_path = state;
    }
    if let Some(timezone) = args.timezone {
        settings.timezone = timezone;
    }

    Ok((settings, args.command))
}
