//! Durable event log with size-based rotation.
//!
//! Appends one rendered [`EventRecord`] per line.  Before a line would push
//! the active file past `max_bytes`, the files shift down one slot:
//!
//! ```text
//! tank_events.log.2 → tank_events.log.3   (oldest beyond N is replaced)
//! tank_events.log.1 → tank_events.log.2
//! tank_events.log   → tank_events.log.1
//! ```
//!
//! and a fresh active file is opened.  Each record is flushed before
//! `emit` returns, so a crash loses at most the line being written.
//!
//! I/O failures are logged and swallowed: the sink reopens the file on the
//! next record, and the control loop never sees the error.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{error, info};

use crate::app::events::EventRecord;
use crate::app::ports::EventSink;
use crate::config::EventLogConfig;
use crate::error::SinkError;

pub struct FileEventSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: u32,
    writer: Option<BufWriter<File>>,
    /// Bytes in the active file.
    written: u64,
}

impl FileEventSink {
    /// Open (or create) the active log file for appending.
    pub fn open(config: &EventLogConfig) -> crate::Result<Self> {
        let mut sink = Self {
            path: config.path.clone(),
            max_bytes: config.max_bytes,
            backup_count: config.backup_count,
            writer: None,
            written: 0,
        };
        sink.reopen()?;
        info!("Event log: {} ({} bytes)", sink.path.display(), sink.written);
        Ok(sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<path>.<n>`
    pub fn backup_path(&self, n: u32) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(format!(".{}", n));
        PathBuf::from(name)
    }

    fn reopen(&mut self) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        self.written = file.metadata()?.len();
        self.writer = Some(BufWriter::new(file));
        Ok(())
    }

    fn rotate(&mut self) -> Result<(), SinkError> {
        if let Some(mut w) = self.writer.take() {
            w.flush()?;
        }

        if self.backup_count == 0 {
            File::create(&self.path)?;
        } else {
            for n in (1..self.backup_count).rev() {
                let from = self.backup_path(n);
                if from.exists() {
                    fs::rename(&from, self.backup_path(n + 1))?;
                }
            }
            fs::rename(&self.path, self.backup_path(1))?;
        }

        self.reopen()
    }

    fn write_line(&mut self, line: &str) -> Result<(), SinkError> {
        let len = line.len() as u64 + 1;
        if self.writer.is_none() {
            self.reopen()?;
        }
        if self.written > 0 && self.written + len > self.max_bytes {
            self.rotate()?;
        }

        let Some(w) = self.writer.as_mut() else {
            return Err(SinkError::Io(io::Error::from(io::ErrorKind::NotConnected)));
        };
        writeln!(w, "{}", line)?;
        w.flush()?;
        self.written += len;
        Ok(())
    }
}

impl EventSink for FileEventSink {
    fn emit(&mut self, record: &EventRecord) {
        if let Err(e) = self.write_line(&record.to_string()) {
            error!("Event log: write to {} failed ({}), dropping record", self.path.display(), e);
            self.writer = None;
        }
    }

    fn flush(&mut self) {
        if let Some(w) = self.writer.as_mut() {
            if let Err(e) = w.flush().and_then(|()| w.get_ref().sync_all()) {
                error!("Event log: flush failed ({})", e);
            }
        }
    }
}
