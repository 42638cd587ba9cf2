pub mod logger;
pub mod scope;
pub mod sink;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

use crate::template::{StructuredRecord, Value};

pub use logger::{LogEntry, Logger};
pub use scope::ScopeGuard;
pub use sink::{JsonSink, LogSink, MemorySink, Sink};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
    None,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Trace => "Trace",
            Level::Debug => "Debug",
            Level::Information => "Information",
            Level::Warning => "Warning",
            Level::Error => "Error",
            Level::Critical => "Critical",
            Level::None => "None",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("unknown log level `{0}`")]
pub struct UnknownLevel(pub String);

impl FromStr for Level {
    type Err = UnknownLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "information" | "info" => Ok(Level::Information),
            "warning" | "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" | "fatal" => Ok(Level::Critical),
            "none" | "off" => Ok(Level::None),
            _ => Err(UnknownLevel(s.to_string())),
        }
    }
}

/// Caller-supplied event identifier, passed through untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventId {
    pub id: i32,
    pub name: Option<String>,
}

impl EventId {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
        }
    }
}

impl From<i32> for EventId {
    fn from(id: i32) -> Self {
        Self { id, name: None }
    }
}

/// What a sink receives for every enabled log call.
#[derive(Clone, Debug)]
pub struct LogRecord {
    pub category: Arc<str>,
    pub level: Level,
    pub event_id: EventId,
    pub error: Option<Arc<dyn std::error::Error + Send + Sync>>,
    pub state: StructuredRecord,
    /// Active scopes, innermost first.
    pub scopes: Vec<Arc<StructuredRecord>>,
}

impl LogRecord {
    pub fn message(&self) -> &str {
        self.state.message()
    }

    pub fn template(&self) -> &str {
        self.state.template()
    }

    pub fn state(&self) -> &[(String, Value)] {
        self.state.arguments()
    }

    pub fn scope_states(&self) -> Vec<&[(String, Value)]> {
        self.scopes.iter().map(|scope| scope.arguments()).collect()
    }
}
