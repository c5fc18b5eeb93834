//! Execution mode classification for bridge commands.
//!
//! The dispatcher consults the mode to decide whether a command resolves
//! before dispatch returns or later, from a host completion event.

use serde::{Deserialize, Serialize};

/// How a command's response is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Executes in place; the envelope exists before dispatch returns
    Sync,

    /// Registers a pending operation; the envelope is produced when the
    /// matching host completion event arrives
    Async,
}

impl ExecutionMode {
    /// Whether dispatch hands back an unresolved reply handle.
    pub fn defers_reply(&self) -> bool {
        matches!(self, Self::Async)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_strings() {
        assert_eq!(serde_json::to_string(&ExecutionMode::Sync).unwrap(), "\"sync\"");
        assert_eq!(serde_json::to_string(&ExecutionMode::Async).unwrap(), "\"async\"");
        let mode: ExecutionMode = serde_json::from_str("\"async\"").unwrap();
        assert_eq!(mode, ExecutionMode::Async);
    }

    #[test]
    fn only_async_defers() {
        assert!(!ExecutionMode::Sync.defers_reply());
        assert!(ExecutionMode::Async.defers_reply());
    }
}
