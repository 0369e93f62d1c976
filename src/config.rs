use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

/// Application-level constants
pub const APP_NAME: &str = "UnifyClinic";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Key under which the bearer token is persisted on the client.
pub const TOKEN_STORAGE_KEY: &str = "token";

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CLIENT_URL: &str = "http://localhost:3000";
const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_CLIENT_DIST: &str = "client/dist";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// Get the application data directory.
/// Falls back to the working directory when no home directory is known.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Default location of the document store file.
pub fn default_database_path() -> PathBuf {
    app_data_dir().join("clinic.db")
}

/// Default location of the client's persisted key/value storage.
pub fn client_storage_path() -> PathBuf {
    app_data_dir().join("storage.json")
}

/// Log filter used when `RUST_LOG` is not set.
pub fn default_log_filter() -> &'static str {
    "unify_clinic=info,tower_http=warn"
}

/// Server configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database_path: PathBuf,
    /// Origin allowed to open the real-time channel.
    pub client_url: String,
    /// Serve the built client bundle alongside the API.
    pub production: bool,
    pub client_dist: PathBuf,
    /// Shared bearer secret. When unset any bearer token is accepted.
    pub api_token: Option<String>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let production = var("APP_ENV")
            .or_else(|| var("NODE_ENV"))
            .is_some_and(|v| v == "production");

        Ok(Self {
            port: try_load("PORT", DEFAULT_PORT)?,
            database_path: var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_database_path),
            client_url: var("CLIENT_URL").unwrap_or_else(|| {
                tracing::info!("CLIENT_URL not set, using default: {DEFAULT_CLIENT_URL}");
                DEFAULT_CLIENT_URL.to_string()
            }),
            production,
            client_dist: var("CLIENT_DIST")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CLIENT_DIST)),
            api_token: var("API_TOKEN").filter(|t| !t.is_empty()),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_path: default_database_path(),
            client_url: DEFAULT_CLIENT_URL.to_string(),
            production: false,
            client_dist: PathBuf::from(DEFAULT_CLIENT_DIST),
            api_token: None,
        }
    }
}

/// Client configuration: where the API lives and where the token is kept.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub storage_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_base_url: var("CLINIC_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            storage_path: var("CLINIC_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(client_storage_path),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn try_load<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            tracing::warn!("Invalid {key} value: {e}");
            ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
            }
        }),
        None => {
            tracing::info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
