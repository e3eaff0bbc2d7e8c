//! Configuration management for the Vybe backend.
//!
//! Settings come from environment variables carrying the `APP_` prefix, with
//! names matched case-insensitively. Before they are read, an optional `.env`
//! file in the local data directory is loaded into the environment.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults

use std::{collections::HashMap, env, fmt, path::PathBuf};

use crate::codes::DEFAULT_ALPHABET;

pub const ENV_PREFIX: &str = "APP_";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8000";
pub const DEFAULT_YTM_BASE_URL: &str = "https://music.youtube.com";
pub const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Dotenv(dotenv::Error),
    InvalidValue { key: String, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot prepare config directory: {}", e),
            ConfigError::Dotenv(e) => write!(f, "cannot read .env file: {}", e),
            ConfigError::InvalidValue { key, value } => {
                write!(f, "invalid value for {}{}: {:?}", ENV_PREFIX, key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err)
    }
}

impl From<dotenv::Error> for ConfigError {
    fn from(err: dotenv::Error) -> Self {
        ConfigError::Dotenv(err)
    }
}

/// Returns the application directory inside the platform data dir.
///
/// - Linux: `~/.local/share/vybe`
/// - macOS: `~/Library/Application Support/vybe`
/// - Windows: `%LOCALAPPDATA%/vybe`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vybe");
    path
}

/// Loads environment variables from `vybe/.env` in the local data directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error since every setting has a default or is optional; a file that exists
/// but cannot be parsed is.
pub async fn load_env() -> Result<(), ConfigError> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)?;
    }
    Ok(())
}

/// Runtime settings of the service and the CLI.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_name: String,
    pub api_version: String,
    pub cors_origins: Vec<String>,
    pub code_length: usize,
    pub code_alphabet: String,
    pub max_generate: usize,
    pub ytm_client_token: String,
    pub server_address: String,
    pub headers_file: PathBuf,
    pub ytm_base_url: String,
    pub spotify_client_id: Option<String>,
    pub spotify_client_secret: Option<String>,
    pub spotify_token_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_name: "Backend Service".to_string(),
            api_version: "1.0.0".to_string(),
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "chrome-extension://*".to_string(),
            ],
            code_length: crate::codes::DEFAULT_CODE_LENGTH,
            code_alphabet: DEFAULT_ALPHABET.to_string(),
            max_generate: 100,
            ytm_client_token: "dev-token".to_string(),
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            headers_file: data_dir().join("ytm/headers.json"),
            ytm_base_url: DEFAULT_YTM_BASE_URL.to_string(),
            spotify_client_id: None,
            spotify_client_secret: None,
            spotify_token_url: DEFAULT_SPOTIFY_TOKEN_URL.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars()
            .filter_map(|(key, value)| {
                let upper = key.to_ascii_uppercase();
                upper
                    .strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_string(), value))
            })
            .collect();

        Self::from_lookup(|key| vars.get(key).cloned())
    }

    /// Builds settings from a lookup keyed by the upper-case name without the
    /// `APP_` prefix, e.g. `CODE_LENGTH`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(v) = lookup("API_NAME") {
            settings.api_name = v;
        }
        if let Some(v) = lookup("API_VERSION") {
            settings.api_version = v;
        }
        if let Some(v) = lookup("CORS_ORIGINS") {
            settings.cors_origins = parse_list(&v);
        }
        if let Some(v) = lookup("CODE_LENGTH") {
            settings.code_length = parse_number("CODE_LENGTH", &v)?;
        }
        if let Some(v) = lookup("CODE_ALPHABET") {
            settings.code_alphabet = v;
        }
        if let Some(v) = lookup("MAX_GENERATE") {
            settings.max_generate = parse_number("MAX_GENERATE", &v)?;
        }
        if let Some(v) = lookup("YTM_CLIENT_TOKEN") {
            settings.ytm_client_token = v;
        }
        if let Some(v) = lookup("SERVER_ADDRESS") {
            settings.server_address = v;
        }
        if let Some(v) = lookup("HEADERS_FILE") {
            settings.headers_file = PathBuf::from(v);
        }
        if let Some(v) = lookup("YTM_BASE_URL") {
            settings.ytm_base_url = v.trim_end_matches('/').to_string();
        }
        settings.spotify_client_id = lookup("SPOTIFY_CLIENT_ID").filter(|v| !v.is_empty());
        settings.spotify_client_secret =
            lookup("SPOTIFY_CLIENT_SECRET").filter(|v| !v.is_empty());
        if let Some(v) = lookup("SPOTIFY_TOKEN_URL") {
            settings.spotify_token_url = v;
        }

        Ok(settings)
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

// Accepts a JSON array as well as a plain comma separated list.
fn parse_list(value: &str) -> Vec<String> {
    if let Ok(list) = serde_json::from_str::<Vec<String>>(value) {
        return list;
    }

    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
