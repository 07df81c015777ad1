/// Configuration management for Mission Service
///
/// Loads configuration from environment variables (a `.env` file is read by
/// `main` before this runs).
use anyhow::{anyhow, bail, Context, Result};
use db_pool::DbConfig;
use std::fmt;
use std::str::FromStr;

pub const SERVICE_NAME: &str = "mission-service";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Which repository implementation backs the API
    pub storage: StorageBackend,
    /// Pool settings, present when `storage` is PostgreSQL
    pub database: Option<DbConfig>,
    /// Token signing keys
    pub jwt: JwtConfig,
    /// Insert a demo organization and one mission per status at startup
    pub seed_demo_data: bool,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    /// Process-local tables; data is lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("unknown STORAGE_BACKEND '{other}' (expected postgres or memory)")),
        }
    }
}

/// RSA key pair used for RS256 access tokens
#[derive(Clone)]
pub struct JwtConfig {
    pub private_key_pem: String,
    pub public_key_pem: String,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("private_key_pem", &"[REDACTED]")
            .field("public_key_pem", &format!("{} bytes", self.public_key_pem.len()))
            .finish()
    }
}

fn default_port() -> u16 {
    8080
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_else(default_port),
        };

        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => StorageBackend::Postgres,
        };

        let database = match storage {
            StorageBackend::Postgres => Some(
                DbConfig::from_env(SERVICE_NAME)
                    .map_err(|e| anyhow!(e))
                    .context("PostgreSQL storage requires database settings")?,
            ),
            StorageBackend::Memory => None,
        };

        let jwt = JwtConfig {
            private_key_pem: pem_from_env("JWT_PRIVATE_KEY_PEM")?,
            public_key_pem: pem_from_env("JWT_PUBLIC_KEY_PEM")?,
        };

        let seed_demo_data = match std::env::var("SEED_DEMO_DATA") {
            Ok(value) => matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"),
            Err(_) => {
                app.env.eq_ignore_ascii_case("development") && storage == StorageBackend::Memory
            }
        };

        let config = Config {
            app,
            storage,
            database,
            jwt,
            seed_demo_data,
        };
        if config.is_production() {
            if config.storage == StorageBackend::Memory {
                bail!("STORAGE_BACKEND=memory is not allowed when APP_ENV=production");
            }
            if config.seed_demo_data {
                bail!("SEED_DEMO_DATA is not allowed when APP_ENV=production");
            }
        }
        Ok(config)
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

/// PEM values coming from env files often carry literal `\n` sequences.
fn pem_from_env(key: &str) -> Result<String> {
    let raw = std::env::var(key).with_context(|| format!("{key} environment variable not set"))?;
    let pem = raw.replace("\\n", "\n");
    if pem.trim().is_empty() {
        bail!("{key} is empty");
    }
    Ok(pem)
}
