//! Key sinks.
//!
//! Injecting keys into the OS is left to external tools: [`StdoutKeySink`]
//! writes one key name per line (pipe it into `xdotool`, `ydotool` or
//! similar), [`LogKeySink`] only logs.

use std::io::{self, Write};

use gesture_core::{Key, KeySink};
use tracing::{info, warn};

/// Logs every key press at `info`.
#[derive(Debug, Default)]
pub struct LogKeySink {
    pub sent: u64,
}

impl KeySink for LogKeySink {
    fn send_key(&mut self, key: Key) {
        self.sent += 1;
        info!(key = key.as_str(), n = self.sent, "key press");
    }
}

/// Writes key names, one per line, flushing after each.
pub struct StdoutKeySink<W: Write = io::Stdout> {
    out:    W,
    failed: bool,
}

impl StdoutKeySink {
    pub fn stdout() -> Self {
        StdoutKeySink::new(io::stdout())
    }
}

impl<W: Write> StdoutKeySink<W> {
    pub fn new(out: W) -> Self {
        StdoutKeySink { out, failed: false }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> KeySink for StdoutKeySink<W> {
    fn send_key(&mut self, key: Key) {
        let res = writeln!(self.out, "{key}").and_then(|_| self.out.flush());
        if let Err(e) = res {
            // Only the first failure is logged.
            if !self.failed {
                warn!("key output failed: {e}");
                self.failed = true;
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum SinkKind {
    /// Log key presses.
    #[default]
    Log,
    /// Print key names to stdout.
    Stdout,
}

pub fn make_sink(kind: SinkKind) -> Box<dyn KeySink> {
    match kind {
        SinkKind::Log    => Box::new(LogKeySink::default()),
        SinkKind::Stdout => Box::new(StdoutKeySink::stdout()),
    }
}
