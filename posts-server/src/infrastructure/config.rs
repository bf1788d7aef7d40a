use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

use super::logging::{LogFormat, DEFAULT_LOG_FILTER};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub database_max_connections: u32,
    pub http_host: String,
    pub http_port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL must be set"))?;

        let database_max_connections: u32 = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {}", raw))?,
            None => 5,
        };

        let http_port: u16 = match lookup("HTTP_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("invalid HTTP_PORT: {}", raw))?,
            None => 8080,
        };

        // Получаем разрешенные CORS домены из .env
        let cors_allowed_origins: Vec<String> = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match lookup("LOG_FORMAT") {
            Some(raw) => LogFormat::parse(&raw)?,
            None => LogFormat::Text,
        };

        Ok(Self {
            database_url,
            database_max_connections,
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            http_port,
            cors_allowed_origins,
            seed_file: lookup("SEED_FILE")
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            log_format,
            log_filter: lookup("LOG_FILTER").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }

    pub fn http_addr(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn applies_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://blog@localhost/blog")]).unwrap();

        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.http_addr(), "0.0.0.0:8080");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["http://localhost:3000", "http://127.0.0.1:3000"]
        );
        assert!(config.seed_file.is_none());
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn reads_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://blog@db/blog"),
            ("DATABASE_MAX_CONNECTIONS", "12"),
            ("HTTP_HOST", "127.0.0.1"),
            ("HTTP_PORT", "9000"),
            ("CORS_ALLOWED_ORIGINS", " https://a.example , ,https://b.example"),
            ("SEED_FILE", "/srv/seed/posts.json"),
            ("LOG_FORMAT", "json"),
            ("LOG_FILTER", "warn"),
        ])
        .unwrap();

        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.http_addr(), "127.0.0.1:9000");
        assert_eq!(
            config.cors_allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.seed_file, Some(PathBuf::from("/srv/seed/posts.json")));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn rejects_unknown_log_format() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }

    #[test]
    fn requires_database_url() {
        assert!(config_from(&[]).is_err());
    }

    #[test]
    fn rejects_invalid_port() {
        let err = config_from(&[("DATABASE_URL", "postgres://x"), ("HTTP_PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("HTTP_PORT"));
    }
}
