use ::config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::Result;

pub const APP_NAME: &str = "venue-trends";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinPolicy {
    /// Any failed request fails the whole batch.
    AllOrNothing,
    /// Keep the images that came back, report the rest.
    BestEffort,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub venue_url_prefix: String,
    pub request_timeout_secs: u64,
    pub default_budget: u64,
    pub backup_trends: Vec<String>,
    pub join_policy: JoinPolicy,
    pub output_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://127.0.0.1:8080".to_string(),
            venue_url_prefix: "https://www.instabase.jp/space/".to_string(),
            request_timeout_secs: 60,
            default_budget: 500,
            backup_trends: vec![
                "pizza party".to_string(),
                "halloween".to_string(),
                "christmas".to_string(),
                "cherry blossom".to_string(),
            ],
            join_policy: JoinPolicy::AllOrNothing,
            output_dir: data_dir().join("results"),
        }
    }
}

impl AppConfig {
    /// Defaults, then the user config file, then `./VenueTrends.toml`, then
    /// `VENUE_TRENDS_*` environment variables.
    pub fn load() -> Result<AppConfig> {
        let defaults = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("backend_url", defaults.backend_url)?
            .set_default("venue_url_prefix", defaults.venue_url_prefix)?
            .set_default("request_timeout_secs", defaults.request_timeout_secs)?
            .set_default("default_budget", defaults.default_budget)?
            .set_default("backup_trends", defaults.backup_trends)?
            .set_default("join_policy", "all_or_nothing")?
            .set_default(
                "output_dir",
                defaults.output_dir.to_string_lossy().to_string(),
            )?;

        if let Some(dir) = dirs::config_dir() {
            let path = dir.join(APP_NAME).join("config.toml");
            builder = builder.add_source(ConfigFile::from(path).required(false));
        }

        let settings = builder
            .add_source(ConfigFile::with_name("VenueTrends").required(false))
            .add_source(
                Environment::with_prefix("VENUE_TRENDS")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("backup_trends"),
            )
            .build()?;

        Ok(settings.try_deserialize::<AppConfig>()?)
    }
}

pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}
