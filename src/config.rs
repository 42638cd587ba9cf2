//! TOML configuration for building a [`Logger`](crate::logging::Logger).
//!
//! ```toml
//! category = "billing"
//! min_level = "debug"
//! literal_cache = true
//!
//! [[sinks]]
//! kind = "log"
//!
//! [[sinks]]
//! kind = "json"
//! path = "events.jsonl"
//! ```

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;

use crate::logging::{JsonSink, Level, LogSink, Logger, Sink};
use crate::template::{LiteralCache, TemplateCompiler};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration{}: {message}", location(.path))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },
    #[error("Unknown log level `{value}`")]
    InvalidLevel { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_min_level")]
    pub min_level: String,
    #[serde(default = "default_literal_cache")]
    pub literal_cache: bool,
    #[serde(default)]
    pub sinks: Vec<SinkConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum SinkConfig {
    Log,
    Json {
        #[serde(default)]
        path: Option<PathBuf>,
    },
}

fn location(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

fn default_category() -> String {
    "app".to_string()
}

fn default_min_level() -> String {
    "information".to_string()
}

fn default_literal_cache() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            category: default_category(),
            min_level: default_min_level(),
            literal_cache: default_literal_cache(),
            sinks: Vec::new(),
        }
    }
}

impl LoggingConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, Some(path))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Self::parse(content, None)
    }

    fn parse(content: &str, path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|error| ConfigError::Parse {
            path: path.map(Path::to_path_buf),
            message: error.to_string(),
        })?;
        config.level()?;
        Ok(config)
    }

    pub fn level(&self) -> Result<Level, ConfigError> {
        self.min_level
            .parse()
            .map_err(|_| ConfigError::InvalidLevel {
                value: self.min_level.clone(),
            })
    }
}

impl Logger {
    /// Build a logger from configuration. With no sinks configured, records
    /// go to the `log` facade.
    pub fn from_config(config: &LoggingConfig) -> Result<Logger, ConfigError> {
        let compiler = if config.literal_cache {
            TemplateCompiler::with_cache(Arc::new(LiteralCache::new()))
        } else {
            TemplateCompiler::new()
        };
        let mut logger = Logger::new(&config.category)
            .with_min_level(config.level()?)
            .with_compiler(compiler);

        if config.sinks.is_empty() {
            return Ok(logger.with_sink(Arc::new(LogSink)));
        }
        for sink in &config.sinks {
            let sink: Arc<dyn Sink> = match sink {
                SinkConfig::Log => Arc::new(LogSink),
                SinkConfig::Json { path: None } => Arc::new(JsonSink::stdout()),
                SinkConfig::Json { path: Some(path) } => {
                    Arc::new(JsonSink::create(path).map_err(|source| ConfigError::Io {
                        path: path.clone(),
                        source,
                    })?)
                }
            };
            logger = logger.with_sink(sink);
        }
        log::debug!(
            "configured logger `{}` with {} sink(s)",
            config.category,
            config.sinks.len()
        );
        Ok(logger)
    }
}
