//! In-memory sink for tests.

use std::io;

use parking_lot::Mutex;

use super::{Command, CommandSink, RconError};

/// Records every command it is handed.
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every send fails (nothing is recorded).
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().clone()
    }
}

impl CommandSink for RecordingSink {
    fn send(&self, command: &Command) -> Result<(), RconError> {
        if self.fail {
            return Err(RconError::Send {
                command: command.to_string(),
                addr: ([127, 0, 0, 1], 30120).into(),
                source: io::Error::new(io::ErrorKind::ConnectionRefused, "unreachable"),
            });
        }
        self.sent.lock().push(command.to_string());
        Ok(())
    }
}
