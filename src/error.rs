use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error("Scraping error: {0}")]
    Scraper(#[from] ScraperError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Missing required configuration: {0}")]
    MissingField(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to build client: {0}")]
    BuildError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Giving up on {url} after {attempts} attempts: {reason}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        reason: String,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("Selector error: {0}")]
    SelectorError(String),
}

/// Why a paragraph did not yield a roster line.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    #[error("text does not mention a Senate District")]
    NoDistrict,

    #[error("text mentions a Senate District but is not shaped like a roster line")]
    Malformed,
}

#[derive(Error, Debug)]
pub enum RosterError {
    /// The index page produced no roster lines at all.
    #[error("0 results found on the municipality index page")]
    NoSenatorsFound,
}

pub type Result<T> = std::result::Result<T, AppError>;
