//! Output sinks
//!
//! Evaluation writes through an [`OutputSink`] it is handed, never through a
//! process-wide channel.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, warn};

/// Destination for lines emitted by evaluated code
pub trait OutputSink {
    fn emit(&mut self, line: &str);
}

impl OutputSink for Vec<String> {
    fn emit(&mut self, line: &str) {
        self.push(line.to_owned());
    }
}

/// Writes each line to the process stdout.
///
/// A closed stdout (e.g. `codemig run ... | head -1`) drops the line instead
/// of panicking.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn emit(&mut self, line: &str) {
        write_line(&mut io::stdout().lock(), line);
    }
}

fn write_line<W: Write>(writer: &mut W, line: &str) {
    match writeln!(writer, "{line}") {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            debug!("stdout closed, dropping output line");
        }
        Err(e) => warn!("Failed to write output line: {}", e),
    }
}

/// Shared in-memory sink; clones observe the same lines
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl OutputSink for MemorySink {
    fn emit(&mut self, line: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_owned());
    }
}

/// Collector that lives for exactly one call.
///
/// Every line is recorded and, when an echo target is attached, forwarded to
/// it as well. Dropping the capture releases the borrow on the echo target.
pub struct Capture<'a> {
    lines: Vec<String>,
    echo: Option<&'a mut (dyn OutputSink + Send)>,
}

impl<'a> Capture<'a> {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            echo: None,
        }
    }

    pub fn tee(echo: &'a mut (dyn OutputSink + Send)) -> Self {
        Self {
            lines: Vec::new(),
            echo: Some(echo),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }
}

impl Default for Capture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for Capture<'_> {
    fn emit(&mut self, line: &str) {
        self.lines.push(line.to_owned());
        if let Some(echo) = self.echo.as_mut() {
            echo.emit(line);
        }
    }
}
