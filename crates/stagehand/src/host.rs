//! Editor host boundary.
//!
//! The bridge drives the editor's asset database only through this trait,
//! so the correlation machinery and the tools stay testable without a live
//! editor. [`MemoryHost`] is the in-memory implementation used by tests and
//! by embedders that want a rehearsal database; a production host wraps the
//! real editor behind the same surface.

use crate::correlate::package_key;
use async_trait::async_trait;
use stageproto::AssetPath;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors surfaced by the editor host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identity of one completion-event subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId(u64);

/// Channel end the host uses to deliver completion events. Each event is a
/// bare correlation key; all result data is reconstructed by the bridge.
pub type CompletionSender = mpsc::UnboundedSender<String>;

/// The asset database surface the bridge consumes.
///
/// Implementations must not call back into the bridge from inside
/// `subscribe_import_completed` or `unsubscribe_import_completed`; both are
/// invoked while the bridge holds its pending-operation lock.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Enumerate every asset identifier the host currently knows.
    async fn asset_paths(&self) -> BTreeSet<AssetPath>;

    /// Whether an asset (file or folder) exists at a path.
    async fn asset_exists(&self, path: &AssetPath) -> bool;

    /// Create the folder chain for `path` if absent.
    async fn ensure_folder(&self, path: &AssetPath) -> Result<(), HostError>;

    /// Move an asset to a new path.
    async fn move_asset(&self, from: &AssetPath, to: &AssetPath) -> Result<(), HostError>;

    /// Delete an asset.
    async fn delete_asset(&self, path: &AssetPath) -> Result<(), HostError>;

    /// Copy a file from outside the project into the asset database.
    async fn import_file(&self, source: &Path, dest: &AssetPath) -> Result<(), HostError>;

    /// Re-scan modified assets.
    async fn refresh(&self);

    /// Pack one sprite atlas. Rejects assets that are not atlases.
    async fn pack_atlas(&self, path: &AssetPath) -> Result<(), HostError>;

    /// Pack every atlas; returns the number of atlases known.
    async fn pack_all_atlases(&self) -> Result<usize, HostError>;

    /// Whether the addressable system is initialized.
    async fn addressables_available(&self) -> bool;

    /// Create or re-target the addressable entry for an asset. `None`
    /// targets the default group; a named group is created when absent.
    /// Fails when addressables are not initialized. Persisting the
    /// settings is the implementation's concern.
    async fn add_addressable_entry(
        &self,
        path: &AssetPath,
        address: &str,
        group: Option<&str>,
    ) -> Result<(), HostError>;

    /// Start a package import. Fails synchronously on immediate rejection;
    /// completion arrives later as an event carrying the package key.
    async fn import_package(&self, path: &Path) -> Result<(), HostError>;

    /// Register a listener for package-import completion events.
    async fn subscribe_import_completed(&self, events: CompletionSender) -> HookId;

    /// Remove a previously registered listener.
    async fn unsubscribe_import_completed(&self, hook: HookId);
}

/// In-memory editor host.
///
/// Package imports are two-phase so callers control event timing: seed a
/// package under its correlation key, let the bridge trigger
/// `import_package`, then call [`MemoryHost::finish_import`] to land the
/// package contents and emit the completion event. Subscribe, unsubscribe
/// and refresh calls are counted for lifecycle assertions.
#[derive(Debug, Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
    next_hook: AtomicU64,
    subscribes: AtomicUsize,
    unsubscribes: AtomicUsize,
    refreshes: AtomicUsize,
}

#[derive(Debug, Default)]
struct HostState {
    assets: BTreeSet<AssetPath>,
    folders: BTreeSet<AssetPath>,
    atlases: BTreeSet<AssetPath>,
    packages: HashMap<String, PackageEntry>,
    /// Absent until [`MemoryHost::enable_addressables`] initializes it
    addressables: Option<AddressablesState>,
    listeners: HashMap<HookId, CompletionSender>,
    packed: usize,
}

#[derive(Debug)]
struct PackageEntry {
    contents: Vec<AssetPath>,
    in_flight: bool,
}

#[derive(Debug, Default)]
struct AddressablesState {
    groups: BTreeSet<String>,
    entries: HashMap<AssetPath, AddressableEntry>,
}

#[derive(Debug)]
struct AddressableEntry {
    address: String,
    group: String,
}

impl MemoryHost {
    /// Group receiving addressable entries when no group is named.
    pub const DEFAULT_GROUP: &'static str = "Default Local Group";

    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty host wrapped in Arc for sharing.
    pub fn new_shared() -> std::sync::Arc<Self> {
        std::sync::Arc::new(Self::new())
    }

    /// Add an asset to the database.
    pub fn seed_asset(&self, path: AssetPath) {
        self.state.lock().unwrap().assets.insert(path);
    }

    /// Add a sprite atlas (also visible as an asset).
    pub fn seed_atlas(&self, path: AssetPath) {
        let mut state = self.state.lock().unwrap();
        state.assets.insert(path.clone());
        state.atlases.insert(path);
    }

    /// Initialize the addressable system with an empty default group.
    /// Entry operations are rejected until this is called.
    pub fn enable_addressables(&self) {
        let mut addressables = AddressablesState::default();
        addressables.groups.insert(Self::DEFAULT_GROUP.to_string());
        self.state.lock().unwrap().addressables = Some(addressables);
    }

    /// The (address, group) pair recorded for an asset, if any.
    pub fn addressable_entry(&self, path: &AssetPath) -> Option<(String, String)> {
        let state = self.state.lock().unwrap();
        let entry = state.addressables.as_ref()?.entries.get(path)?;
        Some((entry.address.clone(), entry.group.clone()))
    }

    /// Number of addressable entries recorded.
    pub fn addressable_count(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .addressables
            .as_ref()
            .map(|a| a.entries.len())
            .unwrap_or(0)
    }

    /// Register an importable package under its correlation key.
    pub fn seed_package(&self, key: impl Into<String>, contents: Vec<AssetPath>) {
        self.state.lock().unwrap().packages.insert(
            key.into(),
            PackageEntry {
                contents,
                in_flight: false,
            },
        );
    }

    /// Land a triggered package import and emit its completion event.
    /// Returns false when no import for `key` is in flight.
    pub fn finish_import(&self, key: &str) -> bool {
        let senders = {
            let mut state = self.state.lock().unwrap();
            let Some(entry) = state.packages.get_mut(key) else {
                return false;
            };
            if !entry.in_flight {
                return false;
            }
            entry.in_flight = false;
            let contents = entry.contents.clone();
            state.assets.extend(contents);
            state.listeners.values().cloned().collect::<Vec<_>>()
        };
        self.send_event(key, senders);
        true
    }

    /// Emit a raw completion event regardless of package state. Used to
    /// exercise duplicate and unmatched event deliveries.
    pub fn emit_completion(&self, key: &str) {
        let senders = {
            let state = self.state.lock().unwrap();
            state.listeners.values().cloned().collect::<Vec<_>>()
        };
        self.send_event(key, senders);
    }

    fn send_event(&self, key: &str, senders: Vec<CompletionSender>) {
        for sender in senders {
            if sender.send(key.to_string()).is_err() {
                tracing::debug!(key = %key, "Completion listener gone; event dropped");
            }
        }
    }

    /// Number of subscribe calls observed.
    pub fn subscribe_count(&self) -> usize {
        self.subscribes.load(Ordering::SeqCst)
    }

    /// Number of unsubscribe calls observed.
    pub fn unsubscribe_count(&self) -> usize {
        self.unsubscribes.load(Ordering::SeqCst)
    }

    /// Number of refresh calls observed.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Number of individual atlas packs performed.
    pub fn packed_count(&self) -> usize {
        self.state.lock().unwrap().packed
    }

    /// Number of assets currently known.
    pub fn asset_count(&self) -> usize {
        self.state.lock().unwrap().assets.len()
    }

    /// Number of live completion listeners.
    pub fn listener_count(&self) -> usize {
        self.state.lock().unwrap().listeners.len()
    }
}

#[async_trait]
impl EditorHost for MemoryHost {
    async fn asset_paths(&self) -> BTreeSet<AssetPath> {
        self.state.lock().unwrap().assets.clone()
    }

    async fn asset_exists(&self, path: &AssetPath) -> bool {
        let state = self.state.lock().unwrap();
        state.assets.contains(path) || state.folders.contains(path)
    }

    async fn ensure_folder(&self, path: &AssetPath) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let mut current = Some(path.clone());
        while let Some(folder) = current {
            if folder.as_str() == "Assets" {
                break;
            }
            current = folder.parent();
            state.folders.insert(folder);
        }
        Ok(())
    }

    async fn move_asset(&self, from: &AssetPath, to: &AssetPath) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if state.assets.contains(to) || state.folders.contains(to) {
            return Err(HostError::Rejected(format!(
                "Destination already exists: {}",
                to
            )));
        }
        if !state.assets.remove(from) {
            return Err(HostError::NotFound(format!("Asset not found: {}", from)));
        }
        let was_atlas = state.atlases.remove(from);
        if was_atlas {
            state.atlases.insert(to.clone());
        }
        state.assets.insert(to.clone());
        Ok(())
    }

    async fn delete_asset(&self, path: &AssetPath) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let removed = state.assets.remove(path) | state.folders.remove(path);
        if !removed {
            return Err(HostError::NotFound(format!("Asset not found: {}", path)));
        }
        state.atlases.remove(path);
        Ok(())
    }

    async fn import_file(&self, source: &Path, dest: &AssetPath) -> Result<(), HostError> {
        std::fs::File::open(source)?;
        self.state.lock().unwrap().assets.insert(dest.clone());
        Ok(())
    }

    async fn refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
    }

    async fn pack_atlas(&self, path: &AssetPath) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if !state.atlases.contains(path) {
            return Err(HostError::Rejected("Not a valid Sprite Atlas".to_string()));
        }
        state.packed += 1;
        Ok(())
    }

    async fn pack_all_atlases(&self) -> Result<usize, HostError> {
        let mut state = self.state.lock().unwrap();
        let count = state.atlases.len();
        state.packed += count;
        Ok(count)
    }

    async fn addressables_available(&self) -> bool {
        self.state.lock().unwrap().addressables.is_some()
    }

    async fn add_addressable_entry(
        &self,
        path: &AssetPath,
        address: &str,
        group: Option<&str>,
    ) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        let Some(addressables) = state.addressables.as_mut() else {
            return Err(HostError::Rejected("Addressables not initialized".to_string()));
        };
        let group = group.filter(|g| !g.is_empty()).unwrap_or(Self::DEFAULT_GROUP);
        addressables.groups.insert(group.to_string());
        addressables.entries.insert(
            path.clone(),
            AddressableEntry {
                address: address.to_string(),
                group: group.to_string(),
            },
        );
        Ok(())
    }

    async fn import_package(&self, path: &Path) -> Result<(), HostError> {
        let mut state = self.state.lock().unwrap();
        if let Some(key) = package_key(path) {
            if let Some(entry) = state.packages.get_mut(&key) {
                entry.in_flight = true;
                tracing::debug!(key = %key, "Package import started");
                return Ok(());
            }
        }
        Err(HostError::NotFound(format!(
            "Package file not found: {}",
            path.display()
        )))
    }

    async fn subscribe_import_completed(&self, events: CompletionSender) -> HookId {
        let id = HookId(self.next_hook.fetch_add(1, Ordering::SeqCst));
        self.subscribes.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().listeners.insert(id, events);
        tracing::debug!(hook = ?id, "Completion listener registered");
        id
    }

    async fn unsubscribe_import_completed(&self, hook: HookId) {
        self.unsubscribes.fetch_add(1, Ordering::SeqCst);
        self.state.lock().unwrap().listeners.remove(&hook);
        tracing::debug!(hook = ?hook, "Completion listener removed");
    }
}
