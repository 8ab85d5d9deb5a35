use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::path::Path;

/// Which roster-building strategy the run uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterMode {
    /// Deduplicate senators first, fetch each profile once.
    #[default]
    Municipality,
    /// Fetch the profile for every municipality row as it is encountered.
    District,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    #[serde(default = "default_log_filename")]
    pub filename: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_retry_total")]
    pub total: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
    #[serde(default = "default_status_forcelist")]
    pub status_forcelist: Vec<u16>,
    #[serde(default = "default_respect_retry_after")]
    pub respect_retry_after: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_municipality_list_path")]
    pub municipality_list_path: String,

    #[serde(default = "default_content_selector")]
    pub content_selector: String,

    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Seconds slept before every profile request.
    #[serde(default = "default_request_delay")]
    pub request_delay: u64,

    #[serde(default)]
    pub mode: RosterMode,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default)]
    pub chrome_impersonation: bool,

    #[serde(default = "default_show_progress")]
    pub show_progress: bool,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LogConfig,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            total: default_retry_total(),
            backoff_factor: default_backoff_factor(),
            status_forcelist: default_status_forcelist(),
            respect_retry_after: default_respect_retry_after(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: default_log_directory(),
            filename: default_log_filename(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            municipality_list_path: default_municipality_list_path(),
            content_selector: default_content_selector(),
            output_file: default_output_file(),
            request_delay: default_request_delay(),
            mode: RosterMode::default(),
            user_agent: default_user_agent(),
            chrome_impersonation: false,
            show_progress: default_show_progress(),
            retry: RetryConfig::default(),
            logging: LogConfig::default(),
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::FileRead)?;
        Self::from_toml(&content)
    }

    /// Reads `path` when it exists, otherwise falls back to the built-in site defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::MissingField("base_url".to_string()).into());
        }
        if !self.base_url.starts_with("http") {
            return Err(ConfigError::InvalidValue(format!(
                "base_url must start with http(s): {}",
                self.base_url
            ))
            .into());
        }

        if self.municipality_list_path.is_empty() {
            return Err(ConfigError::MissingField("municipality_list_path".to_string()).into());
        }

        if self.content_selector.trim().is_empty() {
            return Err(ConfigError::MissingField("content_selector".to_string()).into());
        }

        if self.output_file.is_empty() {
            return Err(ConfigError::MissingField("output_file".to_string()).into());
        }

        if !self.retry.backoff_factor.is_finite() || self.retry.backoff_factor < 0.0 {
            return Err(ConfigError::InvalidValue(format!(
                "retry.backoff_factor must be a non-negative number: {}",
                self.retry.backoff_factor
            ))
            .into());
        }

        if self.retry.status_forcelist.is_empty() {
            return Err(ConfigError::InvalidValue(
                "retry.status_forcelist cannot be empty".to_string(),
            )
            .into());
        }

        crate::logging::parse_log_level(&self.logging.level)?;

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://legislature.maine.gov".to_string()
}

fn default_municipality_list_path() -> String {
    "/senate/find-your-state-senator/9392".to_string()
}

fn default_content_selector() -> String {
    "div#content".to_string()
}

fn default_output_file() -> String {
    "senate_municipality_data.csv".to_string()
}

fn default_request_delay() -> u64 {
    5
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36".to_string()
}

fn default_show_progress() -> bool {
    true
}

fn default_retry_total() -> u32 {
    3
}

fn default_backoff_factor() -> f64 {
    1.0
}

fn default_status_forcelist() -> Vec<u16> {
    vec![429, 500, 502, 503, 504]
}

fn default_respect_retry_after() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_log_filename() -> String {
    "senate_scraper.log".to_string()
}
