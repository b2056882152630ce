//! Tracing subscriber setup for applications embedding the orchestrator

use crate::error::ConfigError;
use std::io;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "warn")
    pub level: String,
    /// Enable JSON structured logging (vs plain text)
    pub json_format: bool,
    /// Environment filter (e.g. "gatekeep=trace,my_app=info"); overrides `level`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            env_filter: Some("gatekeep=warn".to_string()),
        }
    }

    /// Per-unit tracing in plain text
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            env_filter: Some("gatekeep=trace".to_string()),
        }
    }

    pub fn test() -> Self {
        Self {
            level: "error".to_string(),
            json_format: false,
            env_filter: Some("gatekeep=error".to_string()),
        }
    }

    pub fn with_env_filter<S: Into<String>>(mut self, filter: S) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Build the filter. `RUST_LOG` wins over the configured value.
    pub fn filter(&self) -> Result<EnvFilter, ConfigError> {
        let directives = self.env_filter.as_deref().unwrap_or(&self.level);

        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(directives))
            .map_err(|e| ConfigError::InvalidFilter {
                filter: directives.to_string(),
                message: e.to_string(),
            })
    }
}

/// Install a global subscriber. Fails if one is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<(), ConfigError> {
    let filter = config.filter()?;

    let result = if config.json_format {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout).json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(Layer::new().with_writer(io::stdout))
            .try_init()
    };

    result.map_err(|e| ConfigError::LoggingInit {
        message: e.to_string(),
    })?;

    tracing::info!(
        target: "gatekeep::logging",
        "Logging initialized (level: {}, format: {})",
        config.level,
        if config.json_format { "JSON" } else { "text" }
    );
    Ok(())
}
