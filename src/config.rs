use std::env;
use std::str::FromStr;

/// Where the lunch table lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Csv,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "csv" => Ok(Self::Csv),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!("Unknown STORE_BACKEND: {}", other)),
        }
    }
}

pub const DEFAULT_ADMIN_SECRET: &str = "admin123";

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub csv_path: String,
    pub admin_secret: String,
    pub admin_secret_sha256: Option<String>,
    pub host: String,
    pub port: u16,
    pub app_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_backend: StoreBackend = env::var("STORE_BACKEND")
            .unwrap_or_else(|_| "csv".into())
            .parse()?;

        let database_url = match store_backend {
            StoreBackend::Postgres => Some(required("DATABASE_URL")?),
            _ => env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
        };

        Ok(Self {
            store_backend,
            database_url,
            csv_path: env::var("CSV_PATH").unwrap_or_else(|_| "data/lunch_entries.csv".into()),
            admin_secret: env::var("ADMIN_SECRET").unwrap_or_else(|_| DEFAULT_ADMIN_SECRET.into()),
            admin_secret_sha256: env::var("ADMIN_SECRET_SHA256")
                .ok()
                .filter(|s| !s.is_empty()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost".into()),
        })
    }

    /// Settings for tests and local runs: memory store, default secret.
    pub fn local() -> Self {
        Self {
            store_backend: StoreBackend::Memory,
            database_url: None,
            csv_path: "data/lunch_entries.csv".into(),
            admin_secret: DEFAULT_ADMIN_SECRET.into(),
            admin_secret_sha256: None,
            host: "127.0.0.1".into(),
            port: 0,
            app_base_url: "http://localhost".into(),
        }
    }
}

fn required(key: &str) -> anyhow::Result<String> {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Missing required env var: {}", key))
}
