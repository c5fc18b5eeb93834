//! Pending operation table and completion-hook lifecycle.
//!
//! One lock owns both the key-to-record map and the host subscription:
//! installing the completion listener is atomic with the empty-to-non-empty
//! transition, and the listener is removed when the table drains, so zero
//! pending operations implies zero background subscriptions. Events with no
//! matching record are ignored at debug level; the host may emit
//! completions for imports this bridge never started, or deliver
//! duplicates.
//!
//! Each install gets its own event channel and drain task. Uninstalling
//! makes the host drop its sender, which closes the channel and lets the
//! task exit once any queued stale events have been ignored.

use crate::host::{EditorHost, HookId};
use crate::snapshot::Snapshot;
use serde_json::json;
use stageproto::{ErrorKind, ResponseEnvelope};
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Mutex};
use tokio::time::Instant;

/// Rejection for a registration under a key that is already pending.
#[derive(Debug, Error)]
#[error("a pending import already exists for key '{0}'")]
pub struct DuplicateKey(pub String);

struct PendingRecord {
    /// Original request path, kept for the resolution message
    package_path: String,
    before: Snapshot,
    reply_tx: oneshot::Sender<ResponseEnvelope>,
    registered_at: Instant,
}

struct Inner {
    records: HashMap<String, PendingRecord>,
    /// Present iff `records` is non-empty
    hook: Option<HookId>,
}

/// Table of in-flight package imports plus the shared completion hook.
pub struct PendingImports {
    host: Arc<dyn EditorHost>,
    /// Handed to drain tasks so they never keep the table alive
    weak: Weak<Self>,
    inner: Mutex<Inner>,
}

impl PendingImports {
    pub fn new(host: Arc<dyn EditorHost>) -> Arc<Self> {
        Arc::new_cyclic(|weak| Self {
            host,
            weak: weak.clone(),
            inner: Mutex::new(Inner {
                records: HashMap::new(),
                hook: None,
            }),
        })
    }

    /// Register a pending import under `key`, installing the completion
    /// hook when the table was empty. Returns the receiver the caller's
    /// reply handle awaits.
    pub async fn register(
        &self,
        key: &str,
        package_path: &str,
        before: Snapshot,
    ) -> Result<oneshot::Receiver<ResponseEnvelope>, DuplicateKey> {
        let mut inner = self.inner.lock().await;
        if inner.records.contains_key(key) {
            return Err(DuplicateKey(key.to_string()));
        }
        let (reply_tx, reply_rx) = oneshot::channel();
        inner.records.insert(
            key.to_string(),
            PendingRecord {
                package_path: package_path.to_string(),
                before,
                reply_tx,
                registered_at: Instant::now(),
            },
        );
        if inner.hook.is_none() {
            let (events_tx, events_rx) = mpsc::unbounded_channel();
            let id = self.host.subscribe_import_completed(events_tx).await;
            inner.hook = Some(id);
            tokio::spawn(drain_events(self.weak.clone(), events_rx));
            tracing::info!("Completion hook installed");
        }
        tracing::info!(key = %key, "Registered pending import");
        Ok(reply_rx)
    }

    /// Consume the record for `key` and resolve its caller with the
    /// snapshot diff. Events with no matching record are ignored.
    async fn complete(&self, key: &str) {
        let record = {
            let mut inner = self.inner.lock().await;
            let Some(record) = inner.records.remove(key) else {
                tracing::debug!(key = %key, "Ignoring completion event with no pending record");
                return;
            };
            self.uninstall_if_drained(&mut inner).await;
            record
        };
        let after = Snapshot::capture(self.host.as_ref()).await;
        let added = record.before.diff(&after);
        tracing::info!(key = %key, assets = added.len(), "Pending import resolved");
        let envelope = ResponseEnvelope::success_with(
            format!("Successfully imported package: {}", record.package_path),
            json!({ "assets": added }),
        );
        if record.reply_tx.send(envelope).is_err() {
            tracing::debug!(key = %key, "Caller gone before resolution; envelope dropped");
        }
    }

    /// Remove a record without resolving it. Used when triggering the host
    /// operation fails synchronously right after registration.
    pub async fn abandon(&self, key: &str) -> bool {
        let mut inner = self.inner.lock().await;
        let removed = inner.records.remove(key).is_some();
        if removed {
            self.uninstall_if_drained(&mut inner).await;
            tracing::debug!(key = %key, "Abandoned pending import");
        }
        removed
    }

    /// Evict records registered longer than `max_age` ago, resolving each
    /// caller with an execution error. Returns the number evicted.
    ///
    /// The base contract waits indefinitely for a completion event;
    /// embedders that want eviction call this from their own interval task.
    pub async fn sweep_expired(&self, max_age: Duration) -> usize {
        let evicted = {
            let mut inner = self.inner.lock().await;
            let expired: Vec<String> = inner
                .records
                .iter()
                .filter(|(_, record)| record.registered_at.elapsed() > max_age)
                .map(|(key, _)| key.clone())
                .collect();
            let mut evicted = Vec::with_capacity(expired.len());
            for key in expired {
                if let Some(record) = inner.records.remove(&key) {
                    evicted.push((key, record));
                }
            }
            if !evicted.is_empty() {
                self.uninstall_if_drained(&mut inner).await;
            }
            evicted
        };
        let count = evicted.len();
        for (key, record) in evicted {
            tracing::warn!(key = %key, "Evicting pending import with no completion event");
            let envelope = ResponseEnvelope::error(
                format!(
                    "Package import '{}' timed out waiting for completion",
                    record.package_path
                ),
                ErrorKind::ExecutionError,
            );
            if record.reply_tx.send(envelope).is_err() {
                tracing::debug!(key = %key, "Caller gone before eviction; envelope dropped");
            }
        }
        count
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.records.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    /// Whether the host completion listener is currently installed.
    pub async fn hook_installed(&self) -> bool {
        self.inner.lock().await.hook.is_some()
    }

    async fn uninstall_if_drained(&self, inner: &mut Inner) {
        if inner.records.is_empty() {
            if let Some(hook) = inner.hook.take() {
                self.host.unsubscribe_import_completed(hook).await;
                tracing::info!("Completion hook removed; no pending imports");
            }
        }
    }
}

/// Forwards host completion events into the table until the host drops its
/// sender (after uninstall) or the table itself is gone.
async fn drain_events(table: Weak<PendingImports>, mut events: mpsc::UnboundedReceiver<String>) {
    while let Some(key) = events.recv().await {
        let Some(table) = table.upgrade() else {
            break;
        };
        table.complete(&key).await;
    }
    tracing::debug!("Completion drain task exiting");
}
