//! Server configuration read from the process environment.
//!
//! `main` loads an optional `.env` file with `dotenvy` first, so every key below can be
//! set either way. Unset keys fall back to development defaults.

use crate::error::ConfigError;
use crate::render::images::ImageStrategy;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base address used when image references are rewritten to absolute URLs.
    pub public_base_url: String,
    pub database_path: PathBuf,
    pub uploads_dir: PathBuf,
    pub smtp: SmtpConfig,
    pub image_strategy: ImageStrategy,
    /// Maximum number of recipients rendered and sent at the same time.
    pub send_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Address placed in `From`; the display name comes from the template author.
    pub from_address: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = parse_or("PORT", get("PORT"), 3001)?;
        let public_base_url = get("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let username = get("SMTP_USER");
        let from_address = get("MAIL_FROM")
            .or_else(|| username.clone())
            .unwrap_or_else(|| "no-reply@localhost".to_string());

        let smtp = SmtpConfig {
            host: get("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
            port: parse_or("SMTP_PORT", get("SMTP_PORT"), 587)?,
            username,
            password: get("SMTP_PASS"),
            from_address,
        };

        let image_strategy = match get("IMAGE_STRATEGY") {
            Some(value) => value.parse().map_err(|reason| ConfigError::Invalid {
                key: "IMAGE_STRATEGY",
                value,
                reason,
            })?,
            None => ImageStrategy::ContentId,
        };

        let send_concurrency: usize = parse_or("SEND_CONCURRENCY", get("SEND_CONCURRENCY"), 4)?;

        Ok(Self {
            host,
            port,
            public_base_url,
            database_path: get("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("mailstudio.sqlite")),
            uploads_dir: get("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./uploads")),
            smtp,
            image_strategy,
            send_concurrency: send_concurrency.max(1),
        })
    }

    pub fn bind_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
