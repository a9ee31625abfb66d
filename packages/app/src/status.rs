//! Status line reporting.
//!
//! Every user-visible outcome lands in a `StatusSink`. The binary wires
//! in `ConsoleStatus`; tests observe through `MemoryStatus`.

use std::sync::Mutex;

/// Receiver for the single user-facing status line.
pub trait StatusSink: Send + Sync {
    /// Replace the status line. Later calls overwrite earlier ones.
    fn set_status(&self, message: &str);
}

/// Prints each status update to stdout.
pub struct ConsoleStatus;

impl StatusSink for ConsoleStatus {
    fn set_status(&self, message: &str) {
        println!("[status] {message}");
    }
}

/// Records every status update, for assertions.
#[derive(Default)]
pub struct MemoryStatus {
    messages: Mutex<Vec<String>>,
}

impl MemoryStatus {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current status line, if any update has arrived.
    pub fn last(&self) -> Option<String> {
        let messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.last().cloned()
    }

    /// Every update in arrival order.
    pub fn messages(&self) -> Vec<String> {
        let messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.clone()
    }
}

impl StatusSink for MemoryStatus {
    fn set_status(&self, message: &str) {
        let mut messages = self.messages.lock().unwrap_or_else(|e| e.into_inner());
        messages.push(message.to_string());
    }
}
