use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::OutputFormat;
use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};

pub const CONFIG_DIR_ENV: &str = "SHOPADMIN_CONFIG_DIR";
pub const DEFAULT_PAGE_SIZE: u32 = 8;
pub const VALID_KEYS: &str = "server, format, page_size, timeout_secs, log_level";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

impl ProfileConfig {
    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.format.as_deref().and_then(OutputFormat::parse)
    }

    /// Set one key from its string form, rejecting unknown keys and bad values.
    pub fn set_key(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "server" => {
                url::Url::parse(value).with_context(|| format!("Invalid server URL: {value}"))?;
                self.server = Some(value.to_string());
            }
            "format" => {
                if OutputFormat::parse(value).is_none() {
                    anyhow::bail!("Invalid format: {value}. Valid formats: table, json");
                }
                self.format = Some(value.to_lowercase());
            }
            "page_size" => {
                let size: u32 = value
                    .parse()
                    .with_context(|| format!("Invalid page_size: {value}"))?;
                if size == 0 {
                    anyhow::bail!("page_size must be at least 1");
                }
                self.page_size = Some(size);
            }
            "timeout_secs" => {
                let secs: u64 = value
                    .parse()
                    .with_context(|| format!("Invalid timeout_secs: {value}"))?;
                if secs == 0 {
                    anyhow::bail!("timeout_secs must be at least 1");
                }
                self.timeout_secs = Some(secs);
            }
            "log_level" => {
                tracing_subscriber::EnvFilter::try_new(value)
                    .with_context(|| format!("Invalid log_level: {value}"))?;
                self.log_level = Some(value.to_string());
            }
            other => anyhow::bail!("Unknown config key: {other}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

pub type ConfigFile = BTreeMap<String, ProfileConfig>;

fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".shopadmin"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

pub fn load_all_from(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        return Ok(ConfigFile::new());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

pub fn load_profile_from(path: &Path, profile: &str) -> Result<ProfileConfig> {
    let mut all = load_all_from(path)?;
    Ok(all.remove(profile).unwrap_or_default())
}

pub fn save_profile_to(path: &Path, profile: &str, config: &ProfileConfig) -> Result<()> {
    let mut all = load_all_from(path)?;
    all.insert(profile.to_string(), config.clone());
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(&all)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    load_profile_from(&config_path()?, profile)
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    save_profile_to(&config_path()?, profile, config)
}

pub fn resolve_server(cli_server: Option<&str>, profile: &ProfileConfig) -> String {
    // 1. --server flag / SHOPADMIN_URL env
    if let Some(s) = cli_server {
        return s.to_string();
    }
    // 2. config.toml profile
    if let Some(s) = &profile.server {
        return s.clone();
    }
    DEFAULT_BASE_URL.to_string()
}
