//! Timestamped text-line sink

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use chrono::Local;
use soa::{Connector, FieldRecord, ListenerHub, Service, ServiceListener, SharedListener};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HistoricalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Publish-side connector appending timestamped lines to a writer.
pub struct HistoricalDataConnector {
    writer: Box<dyn Write>,
}

impl HistoricalDataConnector {
    /// Open (create or truncate) the sink file up front.
    pub fn to_path(path: impl AsRef<Path>) -> Result<Self, HistoricalError> {
        let file = File::create(path)?;
        Ok(Self::from_writer(BufWriter::new(file)))
    }

    pub fn from_writer(writer: impl Write + 'static) -> Self {
        Self {
            writer: Box::new(writer),
        }
    }

    fn write_record(&mut self, fields: &[String]) -> Result<(), HistoricalError> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        writeln!(self.writer, "{} {}", timestamp, fields.join(","))?;
        self.writer.flush()?;
        Ok(())
    }
}

impl<V: FieldRecord> Connector<V> for HistoricalDataConnector {
    fn publish(&mut self, value: &V) {
        // a sink failure stays local; it never crosses back into the
        // emitting service
        if let Err(err) = self.write_record(&value.fields()) {
            error!(error = %err, "historical sink write failed");
        }
    }
}

/// Keyed store of persisted entities backed by a line sink.
pub struct HistoricalDataService<V> {
    entries: HashMap<String, V>,
    connector: HistoricalDataConnector,
    listeners: ListenerHub<V>,
}

impl<V: FieldRecord + Clone> HistoricalDataService<V> {
    pub fn new(connector: HistoricalDataConnector) -> Self {
        Self {
            entries: HashMap::new(),
            connector,
            listeners: ListenerHub::new(),
        }
    }

    pub fn add_listener(&mut self, listener: SharedListener<V>) {
        self.listeners.add(listener);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: FieldRecord + Clone> Service for HistoricalDataService<V> {
    type Key = String;
    type Value = V;

    fn get_data(&self, key: &String) -> Option<&V> {
        self.entries.get(key)
    }

    fn on_message(&mut self, value: V) {
        self.connector.publish(&value);
        self.entries.insert(value.record_key(), value.clone());
        self.listeners.process_add(&value);
    }
}

/// Bridges any emitting service into a historical sink.
pub struct HistoricalDataListener<V> {
    service: Rc<RefCell<HistoricalDataService<V>>>,
}

impl<V> HistoricalDataListener<V> {
    pub fn new(service: Rc<RefCell<HistoricalDataService<V>>>) -> Self {
        Self { service }
    }
}

impl<V: FieldRecord + Clone> ServiceListener<V> for HistoricalDataListener<V> {
    fn process_add(&mut self, data: &V) {
        self.service.borrow_mut().on_message(data.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Row {
        key: String,
        values: Vec<String>,
    }

    impl FieldRecord for Row {
        fn record_key(&self) -> String {
            self.key.clone()
        }

        fn fields(&self) -> Vec<String> {
            self.values.clone()
        }
    }

    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_lines_are_timestamped_and_comma_joined() {
        let buf = SharedBuf::default();
        let mut service =
            HistoricalDataService::new(HistoricalDataConnector::from_writer(buf.clone()));

        service.on_message(Row {
            key: "K1".to_string(),
            values: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        });

        let written = String::from_utf8(buf.0.borrow().clone()).unwrap();
        let line = written.trim_end();
        // "YYYY-MM-DD HH:MM:SS.mmm" is 23 characters, then a space
        assert_eq!(&line[4..5], "-");
        assert_eq!(&line[23..24], " ");
        assert!(line.ends_with("a,b,c"));
    }

    #[test]
    fn test_entries_stored_by_record_key() {
        let mut service =
            HistoricalDataService::new(HistoricalDataConnector::from_writer(SharedBuf::default()));

        service.on_message(Row {
            key: "K1".to_string(),
            values: vec!["first".to_string()],
        });
        service.on_message(Row {
            key: "K1".to_string(),
            values: vec!["second".to_string()],
        });

        assert_eq!(service.len(), 1);
        assert_eq!(
            service.get_data(&"K1".to_string()).unwrap().values,
            vec!["second"]
        );
    }
}
