use serde_json::{json, Map, Value as JsonValue};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};

use super::{Level, LogRecord};
use crate::template::Value;

/// Destination for enabled log records.
pub trait Sink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<LogRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn take(&self) -> Vec<LogRecord> {
        std::mem::take(&mut *self.records.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
    }
}

/// Writes one JSON object per record.
pub struct JsonSink {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonSink {
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl Sink for JsonSink {
    fn emit(&self, record: &LogRecord) {
        let line = record_to_json(record).to_string();
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let result = writeln!(writer, "{line}").and_then(|_| writer.flush());
        if let Err(err) = result {
            log::warn!("failed to write log record: {err}");
        }
    }
}

/// Forwards messages to the `log` facade, using the category as target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl LogSink {
    fn facade_level(level: Level) -> Option<log::Level> {
        match level {
            Level::Trace => Some(log::Level::Trace),
            Level::Debug => Some(log::Level::Debug),
            Level::Information => Some(log::Level::Info),
            Level::Warning => Some(log::Level::Warn),
            Level::Error | Level::Critical => Some(log::Level::Error),
            Level::None => None,
        }
    }
}

impl Sink for LogSink {
    fn emit(&self, record: &LogRecord) {
        let Some(level) = Self::facade_level(record.level) else {
            return;
        };
        match &record.error {
            Some(err) => {
                log::log!(target: &*record.category, level, "{}: {}", record.message(), err)
            }
            None => log::log!(target: &*record.category, level, "{}", record.message()),
        }
    }
}

/// Properties object for an argument list. `$`-keyed values are written as
/// their display text.
pub fn state_to_json(arguments: &[(String, Value)]) -> JsonValue {
    let mut map = Map::new();
    for (key, value) in arguments {
        let json = if key.starts_with('$') {
            JsonValue::String(value.to_string())
        } else {
            serde_json::to_value(value).unwrap_or(JsonValue::Null)
        };
        map.insert(key.clone(), json);
    }
    JsonValue::Object(map)
}

pub fn record_to_json(record: &LogRecord) -> JsonValue {
    json!({
        "category": &*record.category,
        "level": record.level.as_str(),
        "event_id": record.event_id.id,
        "event_name": record.event_id.name,
        "message": record.message(),
        "template": record.template(),
        "properties": state_to_json(record.state()),
        "scopes": record
            .scopes
            .iter()
            .map(|scope| state_to_json(scope.arguments()))
            .collect::<Vec<_>>(),
        "error": record.error.as_ref().map(|err| err.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{interpolated, logging::EventId, template::compile, template::named};
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sample() -> LogRecord {
        let items = vec![1, 2];
        LogRecord {
            category: Arc::from("tests"),
            level: Level::Warning,
            event_id: EventId::new(3, "Sample"),
            error: None,
            state: compile(interpolated!(
                "{} {}",
                named("$text", &items),
                named("@items", &items)
            ))
            .expect("compile"),
            scopes: Vec::new(),
        }
    }

    #[test]
    fn json_sink_writes_one_line_per_record() {
        let buffer = SharedBuffer::default();
        let sink = JsonSink::new(buffer.clone());
        sink.emit(&sample());
        sink.emit(&sample());
        let text = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: JsonValue = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed["level"], "Warning");
        assert_eq!(parsed["event_name"], "Sample");
        assert_eq!(parsed["properties"]["$text"], "1, 2");
        assert_eq!(parsed["properties"]["@items"], json!([1, 2]));
        assert_eq!(parsed["properties"]["{OriginalFormat}"], "{$text} {@items}");
    }

    #[test]
    fn memory_sink_take_drains() {
        let sink = MemorySink::new();
        sink.emit(&sample());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }
}
