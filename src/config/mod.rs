use chrono::Duration;
use std::env;
use std::path::PathBuf;

/// Application configuration, sourced from the environment once at startup
/// and passed explicitly into the components that need it. Read-only after
/// construction.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub port: u16,
    pub token_secret: String,
    pub token_ttl: Duration,
    pub database_url: Option<String>,
    pub upload_dir: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("AUTH_SECRET must be set")]
    MissingSecret,
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
    #[error("invalid AUTH_EXPIRY duration: {0}")]
    InvalidTtl(String),
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let port = match env::var("PORT") {
            Ok(v) => v.parse::<u16>().map_err(|_| ConfigError::InvalidPort(v))?,
            Err(_) => 8000,
        };

        let token_secret = env::var("AUTH_SECRET").map_err(|_| ConfigError::MissingSecret)?;
        if token_secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }

        let ttl_raw = env::var("AUTH_EXPIRY").unwrap_or_else(|_| "7d".to_string());
        let token_ttl = parse_ttl(&ttl_raw)?;

        Ok(Self {
            environment,
            port,
            token_secret,
            token_ttl,
            database_url: env::var("DATABASE_URL").ok(),
            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("uploads")),
        })
    }

    /// Default `tracing` filter when RUST_LOG is not set. The environment
    /// mode only affects logging verbosity; development keeps the verbose
    /// duplicate diagnostics from the error normalizer visible.
    pub fn default_log_filter(&self) -> &'static str {
        match self.environment {
            Environment::Development => "hrm_api=debug,tower_http=debug,info",
            Environment::Staging => "hrm_api=info,info",
            Environment::Production => "hrm_api=info,warn",
        }
    }
}

/// Parse a duration string like `"7d"`, `"12h"` or `"30m"`.
pub fn parse_ttl(raw: &str) -> Result<Duration, ConfigError> {
    let raw = raw.trim();
    // Split on the last character's boundary; the unit may be any char and
    // must never land us mid-codepoint.
    let (idx, unit) = raw
        .char_indices()
        .last()
        .ok_or_else(|| ConfigError::InvalidTtl(raw.to_string()))?;

    let count: i64 = raw[..idx]
        .parse()
        .map_err(|_| ConfigError::InvalidTtl(raw.to_string()))?;
    if count <= 0 {
        return Err(ConfigError::InvalidTtl(raw.to_string()));
    }

    match unit {
        'd' => Ok(Duration::days(count)),
        'h' => Ok(Duration::hours(count)),
        'm' => Ok(Duration::minutes(count)),
        _ => Err(ConfigError::InvalidTtl(raw.to_string())),
    }
}
