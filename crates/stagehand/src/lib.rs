//! stagehand - asynchronous command bridge for editor automation
//!
//! Dispatches automation commands against an editor host and correlates
//! fire-and-forget host operations back to their callers. The host
//! announces completion with a bare key and no result data, so the bridge
//! snapshots the asset database around each async operation and rebuilds
//! the result by set difference.
//!
//! # Features
//!
//! - **Dispatch**: One entry point for sync and async commands, mode-blind
//!   at the call site
//! - **Correlation**: Pending-operation table keyed by package name, with
//!   the completion hook installed only while work is in flight
//! - **Host boundary**: The `EditorHost` trait isolates editor specifics;
//!   `MemoryHost` ships for tests and embedding experiments
//!
//! # Example
//!
//! ```rust,ignore
//! use stagehand::{Bridge, MemoryHost};
//! use serde_json::json;
//!
//! let host = MemoryHost::new_shared();
//! let bridge = Bridge::new(host.clone());
//!
//! // Sync command: reply is ready immediately.
//! let reply = bridge
//!     .dispatch_wait("delete_asset", json!({"path": "Assets/Old.png"}))
//!     .await;
//!
//! // Async command: the outcome defers until the host's completion
//! // event lands.
//! let outcome = bridge
//!     .dispatch("add_unity_package", json!({"packagePath": "/tmp/kit.unitypackage"}))
//!     .await;
//! let reply = outcome.resolve().await;
//! ```

pub mod config;
pub mod correlate;
pub mod dispatch;
pub mod host;
pub mod pending;
pub mod snapshot;
pub mod tools;

// Re-export the dispatch surface
pub use dispatch::{Bridge, CommandSpec, DispatchOutcome, ReplyHandle};

// Re-export the host boundary
pub use host::{CompletionSender, EditorHost, HookId, HostError, MemoryHost};

// Re-export correlation machinery
pub use correlate::package_key;
pub use pending::{DuplicateKey, PendingImports};
pub use snapshot::Snapshot;

pub use config::BridgeConfig;
