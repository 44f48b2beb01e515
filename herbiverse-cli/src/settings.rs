//! CLI settings: defaults, then `<data dir>/config.toml`, then `HERBIVERSE_*`
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use herbiverse_client::ClientConfig;
use serde::Deserialize;

const CONFIG_FILE: &str = "config.toml";
const DATA_DIR_NAME: &str = ".herbiverse";
const ENV_PREFIX: &str = "HERBIVERSE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub api_url: String,
    pub timeout_secs: u64,
}

impl Settings {
    pub fn load(data_dir: &Path, api_url_flag: Option<&str>) -> Result<Self> {
        let defaults = ClientConfig::default();
        let layered = config::Config::builder()
            .set_default("api_url", defaults.base_url)?
            .set_default("timeout_secs", defaults.timeout_secs)?
            .add_source(config::File::from(data_dir.join(CONFIG_FILE)).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        let mut settings: Self = layered.try_deserialize().context("Invalid configuration")?;
        if let Some(url) = api_url_flag {
            settings.api_url = url.to_string();
        }
        Ok(settings)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.api_url.clone())
            .with_timeout_secs(self.timeout_secs)
    }
}

/// `--data-dir`, else `~/.herbiverse`.
pub fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir),
        None => dirs::home_dir()
            .map(|home| home.join(DATA_DIR_NAME))
            .context("Could not determine home directory; pass --data-dir"),
    }
}
