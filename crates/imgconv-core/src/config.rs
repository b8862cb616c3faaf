//! Configuration module
//!
//! Environment-driven configuration for the API service. Everything has a
//! default suitable for local development; production deployments override
//! via environment variables.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 3001;
const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379/";
const DEFAULT_MAX_UPLOAD_SIZE_BYTES: usize = 25 * 1024 * 1024;
const DEFAULT_HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// Which ephemeral store backend holds uploaded originals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Redis,
    Memory,
}

impl StoreBackend {
    pub fn parse(s: &str) -> Result<Self, anyhow::Error> {
        match s.to_lowercase().as_str() {
            "redis" => Ok(StoreBackend::Redis),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow::anyhow!("Unknown store backend: {}", other)),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    store_backend: StoreBackend,
    redis_url: String,
    max_upload_size_bytes: usize,
    http_concurrency_limit: usize,
    environment: String,
}

impl Config {
    /// Load configuration from the environment, falling back to development
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let server_port = parse_env("SERVER_PORT", DEFAULT_SERVER_PORT)?;

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => StoreBackend::parse(&value)?,
            Err(_) => StoreBackend::Redis,
        };

        let redis_url = env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string());

        let max_upload_size_bytes =
            parse_env("MAX_UPLOAD_SIZE_BYTES", DEFAULT_MAX_UPLOAD_SIZE_BYTES)?;
        let http_concurrency_limit =
            parse_env("HTTP_CONCURRENCY_LIMIT", DEFAULT_HTTP_CONCURRENCY_LIMIT)?;

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());

        Ok(Config {
            server_port,
            cors_origins,
            store_backend,
            redis_url,
            max_upload_size_bytes,
            http_concurrency_limit,
            environment,
        })
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn store_backend(&self) -> StoreBackend {
        self.store_backend
    }

    pub fn redis_url(&self) -> &str {
        &self.redis_url
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.max_upload_size_bytes
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.http_concurrency_limit
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    /// Configuration for tests: in-memory store, unrestricted CORS.
    pub fn for_tests() -> Self {
        Config {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            store_backend: StoreBackend::Memory,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            max_upload_size_bytes: DEFAULT_MAX_UPLOAD_SIZE_BYTES,
            http_concurrency_limit: DEFAULT_HTTP_CONCURRENCY_LIMIT,
            environment: "test".to_string(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(value) => value
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        Err(_) => Ok(default),
    }
}
