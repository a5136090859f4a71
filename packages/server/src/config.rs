use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// Emails allowed into the admin API
    pub admin_emails: Vec<String>,
    pub storage_url: String,
    pub storage_service_key: String,
    pub storage_bucket: String,
    pub page_cache_ttl: Duration,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "blog-auth".to_string()),
            admin_emails: parse_list(&env::var("ADMIN_EMAILS").unwrap_or_default()),
            storage_url: env::var("STORAGE_URL").context("STORAGE_URL must be set")?,
            storage_service_key: env::var("STORAGE_SERVICE_KEY")
                .context("STORAGE_SERVICE_KEY must be set")?,
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "blog-images".to_string()),
            page_cache_ttl: Duration::from_secs(
                env::var("PAGE_CACHE_TTL_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("PAGE_CACHE_TTL_SECS must be a whole number of seconds")?,
            ),
            allowed_origins: parse_list(&env::var("ALLOWED_ORIGINS").unwrap_or_default()),
        })
    }
}

/// Comma-separated list, blanks dropped
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
