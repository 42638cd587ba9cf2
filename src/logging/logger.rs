use std::error::Error;
use std::fmt;
use std::sync::Arc;

use super::scope::{self, ScopeGuard};
use super::sink::Sink;
use super::{EventId, Level, LogRecord};
use crate::error::TemplateResult;
use crate::template::{Interpolated, TemplateCompiler};

/// A named logger with a minimum level and a set of sinks.
#[derive(Clone)]
pub struct Logger {
    category: Arc<str>,
    min_level: Level,
    sinks: Vec<Arc<dyn Sink>>,
    compiler: TemplateCompiler,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("category", &self.category)
            .field("min_level", &self.min_level)
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Logger {
    pub fn new(category: &str) -> Self {
        Self {
            category: Arc::from(category),
            min_level: Level::Information,
            sinks: Vec::new(),
            compiler: TemplateCompiler::new(),
        }
    }

    pub fn with_min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_compiler(mut self, compiler: TemplateCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }

    pub fn compiler(&self) -> &TemplateCompiler {
        &self.compiler
    }

    pub fn is_enabled(&self, level: Level) -> bool {
        level != Level::None && level >= self.min_level
    }

    pub fn log(&self, level: Level, message: Interpolated) -> TemplateResult<()> {
        self.entry(level).log(message)
    }

    pub fn entry(&self, level: Level) -> LogEntry<'_> {
        LogEntry {
            logger: self,
            level,
            event_id: EventId::default(),
            error: None,
        }
    }

    /// Compile `state` and push it onto this thread's scope stack until the
    /// guard is dropped.
    pub fn begin_scope(&self, state: Interpolated) -> TemplateResult<ScopeGuard> {
        let record = self.compiler.compile(state)?;
        Ok(scope::push(record))
    }

    fn dispatch(&self, record: LogRecord) {
        for sink in &self.sinks {
            sink.emit(&record);
        }
    }
}

/// A pending log call carrying the optional event id and error.
pub struct LogEntry<'a> {
    logger: &'a Logger,
    level: Level,
    event_id: EventId,
    error: Option<Arc<dyn Error + Send + Sync>>,
}

impl LogEntry<'_> {
    pub fn event_id(mut self, event_id: impl Into<EventId>) -> Self {
        self.event_id = event_id.into();
        self
    }

    pub fn error(mut self, error: impl Error + Send + Sync + 'static) -> Self {
        self.error = Some(Arc::new(error));
        self
    }

    /// Emit the record. Nothing is compiled when the level is disabled.
    pub fn log(self, message: Interpolated) -> TemplateResult<()> {
        let logger = self.logger;
        if !logger.is_enabled(self.level) {
            return Ok(());
        }
        let state = logger.compiler.compile(message)?;
        logger.dispatch(LogRecord {
            category: Arc::clone(&logger.category),
            level: self.level,
            event_id: self.event_id,
            error: self.error,
            state,
            scopes: scope::snapshot(),
        });
        Ok(())
    }
}
