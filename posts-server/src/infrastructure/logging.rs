use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_LOG_FILTER: &str = "info,posts_server=debug,sqlx=warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("unknown LOG_FORMAT: {}", other)),
        }
    }
}

/// `RUST_LOG` overrides the configured directive.
fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

pub fn init_logging(format: LogFormat, default_directive: &str) -> Result<()> {
    let text_layer = (format == LogFormat::Text).then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
    });
    let json_layer = (format == LogFormat::Json).then(|| fmt::layer().json().with_target(true));

    tracing_subscriber::registry()
        .with(env_filter(default_directive))
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    tracing::info!("Logging initialized ({:?})", format);
    Ok(())
}
