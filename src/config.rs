use crate::store::StorageScope;
use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub pay: PayConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON files in the state directory
    #[default]
    Local,
    /// Spreadsheet/calendar-backed script endpoint
    Remote,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub scope: StorageScope,
    /// Optional override for state directory (for testing)
    pub state_dir_override: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RemoteConfig {
    /// Deployed script web-app URL
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    pub client_secret: Option<String>,
    #[serde(default = "default_calendar_id")]
    pub calendar_id: String,
    /// IANA zone sent with synced events
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_redirect_port")]
    pub redirect_port: u16,
    /// Optional API URL override for testing (e.g. mocking)
    pub api_url: Option<String>,
    pub auth_url: Option<String>,
    pub token_url: Option<String>,
}

fn default_calendar_id() -> String {
    "primary".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_redirect_port() -> u16 {
    8085
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: None,
            calendar_id: default_calendar_id(),
            timezone: default_timezone(),
            redirect_port: default_redirect_port(),
            api_url: None,
            auth_url: None,
            token_url: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PayConfig {
    #[serde(default = "default_hourly_rate")]
    pub hourly_rate: f64,
}

fn default_hourly_rate() -> f64 {
    2500.0
}

impl Default for PayConfig {
    fn default() -> Self {
        Self {
            hourly_rate: default_hourly_rate(),
        }
    }
}

impl Config {
    /// Validate all configuration
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == Backend::Remote
            && self.remote.url.as_deref().is_none_or(str::is_empty)
        {
            anyhow::bail!("Remote backend selected but remote.url is not set");
        }

        if !self.pay.hourly_rate.is_finite() || self.pay.hourly_rate < 0.0 {
            anyhow::bail!("pay.hourly_rate must be a non-negative number");
        }

        if self.google.timezone.trim().is_empty() {
            anyhow::bail!("google.timezone must not be empty");
        }

        Ok(())
    }

    pub fn remote_url(&self) -> Result<&str> {
        self.remote
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .context("Remote URL not set. Run 'attend config set remote.url <URL>'")
    }

    /// Read a dotted key (`pay.hourly_rate`) as a display string
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match key {
            "storage.backend" => toml_scalar(&self.storage.backend)?,
            "storage.scope" => toml_scalar(&self.storage.scope)?,
            "storage.state_dir_override" => self
                .storage
                .state_dir_override
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "remote.url" => self.remote.url.clone().unwrap_or_default(),
            "google.client_id" => self.google.client_id.clone(),
            "google.client_secret" => self
                .google
                .client_secret
                .as_ref()
                .map(|_| "********".to_string())
                .unwrap_or_default(),
            "google.calendar_id" => self.google.calendar_id.clone(),
            "google.timezone" => self.google.timezone.clone(),
            "google.redirect_port" => self.google.redirect_port.to_string(),
            "pay.hourly_rate" => self.pay.hourly_rate.to_string(),
            _ => anyhow::bail!("Unknown config key: {}", key),
        };
        Ok(value)
    }

    /// Set a dotted key from its string form
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "storage.backend" => {
                self.storage.backend = parse_scalar(value).context("Expected local or remote")?
            }
            "storage.scope" => {
                self.storage.scope = parse_scalar(value).context("Expected all or month")?
            }
            "storage.state_dir_override" => {
                self.storage.state_dir_override =
                    (!value.is_empty()).then(|| PathBuf::from(value))
            }
            "remote.url" => self.remote.url = (!value.is_empty()).then(|| value.to_string()),
            "google.client_id" => self.google.client_id = value.to_string(),
            "google.client_secret" => {
                self.google.client_secret = (!value.is_empty()).then(|| value.to_string())
            }
            "google.calendar_id" => self.google.calendar_id = value.to_string(),
            "google.timezone" => self.google.timezone = value.to_string(),
            "google.redirect_port" => {
                self.google.redirect_port = value.parse().context("Invalid port")?
            }
            "pay.hourly_rate" => {
                self.pay.hourly_rate = value.parse().context("Invalid hourly rate")?
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        self.validate()
    }
}

fn toml_scalar<T: Serialize>(value: &T) -> Result<String> {
    let json = serde_json::to_value(value)?;
    Ok(json.as_str().unwrap_or_default().to_string())
}

fn parse_scalar<T: for<'de> Deserialize<'de>>(value: &str) -> Result<T> {
    Ok(serde_json::from_value(serde_json::Value::String(
        value.to_lowercase(),
    ))?)
}

pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Config> {
    let loader = ConfigBuilder::builder()
        .add_source(
            File::from(path.as_ref())
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix("ATTEND").separator("__"))
        .build()
        .context("Failed to build config loader")?;

    loader
        .try_deserialize()
        .context("Failed to parse config file")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(crate::platform::get_state_dir(None)?.join("config.toml"))
}

pub fn load() -> Result<Config> {
    let config = load_from_path(config_path()?)?;

    // Validate configuration
    config.validate()?;

    Ok(config)
}

pub fn save_to_path<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    let toml_string = toml::to_string_pretty(config).context("Failed to serialize config")?;

    std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

    Ok(())
}
