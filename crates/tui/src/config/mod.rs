use std::{path::PathBuf, time::Duration};

use chrono_tz::Tz;
use clap::Parser;
use dompet_client::Timeouts;
use serde::Deserialize;

use crate::error::{AppError, Result};

const DEFAULT_CONFIG_PATH: &str = "config/dompet.toml";
const ENV_PREFIX: &str = "DOMPET";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    Dark,
    Light,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub base_url: String,
    pub state_dir: PathBuf,
    pub api_timeout_secs: u64,
    pub chat_timeout_secs: u64,
    pub page_size: u32,
    pub search_debounce_ms: u64,
    pub timezone: String,
    pub export_dir: PathBuf,
    pub log_level: String,
    pub theme: ThemeName,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/api".to_string(),
            state_dir: PathBuf::from(".dompet"),
            api_timeout_secs: 15,
            chat_timeout_secs: 60,
            page_size: dompet_client::list::DEFAULT_PAGE_SIZE,
            search_debounce_ms: 500,
            timezone: "Asia/Jakarta".to_string(),
            export_dir: PathBuf::from("."),
            log_level: "info".to_string(),
            theme: ThemeName::Dark,
        }
    }
}

impl AppConfig {
    pub fn timeouts(&self) -> Timeouts {
        Timeouts {
            api: Duration::from_secs(self.api_timeout_secs),
            chat: Duration::from_secs(self.chat_timeout_secs),
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse()
            .map_err(|_| AppError::Setting(format!("unknown timezone: {}", self.timezone)))
    }

    fn apply(&mut self, args: Args) {
        if let Some(base_url) = args.base_url {
            self.base_url = base_url;
        }
        if let Some(state_dir) = args.state_dir {
            self.state_dir = state_dir;
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
    }
}

#[derive(Debug, Default, Parser)]
#[command(name = "dompet", disable_version_flag = true)]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override base URL (e.g. http://127.0.0.1:3000/api).
    #[arg(long)]
    base_url: Option<String>,
    /// Directory holding the remembered session and the log file.
    #[arg(long)]
    state_dir: Option<PathBuf>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    log_level: Option<String>,
}

pub fn load() -> Result<AppConfig> {
    load_from(Args::parse())
}

fn load_from(args: Args) -> Result<AppConfig> {
    let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
    let mut builder = config::Config::builder();
    builder = builder.add_source(config::File::with_name(config_path).required(false));
    builder = builder.add_source(config::Environment::with_prefix(ENV_PREFIX));
    let mut settings: AppConfig = builder.build()?.try_deserialize()?;

    settings.apply(args);
    settings.tz()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let settings = load_from(Args {
            config: Some("does/not/exist.toml".to_string()),
            ..Args::default()
        })
        .unwrap();
        assert_eq!(settings.timezone, "Asia/Jakarta");
        assert_eq!(settings.timeouts().chat, Duration::from_secs(60));
        assert_eq!(settings.search_debounce(), Duration::from_millis(500));
    }

    #[test]
    fn flags_override_file_values() {
        let mut settings = AppConfig::default();
        settings.apply(Args {
            base_url: Some("http://budget.local/api".to_string()),
            log_level: Some("debug".to_string()),
            ..Args::default()
        });
        assert_eq!(settings.base_url, "http://budget.local/api");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.state_dir, PathBuf::from(".dompet"));
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let settings = AppConfig {
            timezone: "Mars/Olympus".to_string(),
            ..AppConfig::default()
        };
        assert!(matches!(settings.tz(), Err(AppError::Setting(_))));
    }
}
