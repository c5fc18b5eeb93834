//! Command table and the dispatch entry point.
//!
//! Dispatch is mode-blind at the call site: every command returns a
//! [`DispatchOutcome`], and callers that do not care about the split await
//! [`DispatchOutcome::resolve`]. Synchronous commands come back
//! [`DispatchOutcome::Ready`]; `add_unity_package` defers its reply until
//! the host's completion event lands.

use crate::config::BridgeConfig;
use crate::host::EditorHost;
use crate::pending::PendingImports;
use crate::tools;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::Value;
use stageproto::{
    AddAssetParams, AddPackageParams, AddToAddressableParams, DeleteAssetParams, ErrorKind,
    ExecutionMode, MoveAssetParams, PackAtlasParams, ResponseEnvelope,
};
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::instrument;

/// Descriptor for one dispatchable command.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: String,
    pub description: String,
    pub mode: ExecutionMode,
    pub input_schema: Value,
}

/// Result of dispatching a command.
pub enum DispatchOutcome {
    /// The command ran to completion and this is its reply.
    Ready(ResponseEnvelope),
    /// The command started a host-side operation; the reply arrives
    /// through the handle when the matching completion event lands.
    Deferred(ReplyHandle),
}

impl DispatchOutcome {
    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// Wait out a deferred reply; ready replies return immediately.
    pub async fn resolve(self) -> ResponseEnvelope {
        match self {
            Self::Ready(envelope) => envelope,
            Self::Deferred(handle) => handle.wait().await,
        }
    }
}

/// Caller's end of a deferred reply.
pub struct ReplyHandle {
    key: String,
    rx: oneshot::Receiver<ResponseEnvelope>,
}

impl ReplyHandle {
    pub(crate) fn new(key: String, rx: oneshot::Receiver<ResponseEnvelope>) -> Self {
        Self { key, rx }
    }

    /// Correlation key the deferred reply is filed under.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn wait(self) -> ResponseEnvelope {
        match self.rx.await {
            Ok(envelope) => envelope,
            Err(_) => ResponseEnvelope::error(
                format!("Bridge shut down before import '{}' completed", self.key),
                ErrorKind::ExecutionError,
            ),
        }
    }
}

fn schema_for<T: JsonSchema>() -> Value {
    let settings = schemars::generate::SchemaSettings::draft07().with(|s| {
        s.inline_subschemas = true;
    });
    let generator = settings.into_generator();
    let schema = generator.into_root_schema_for::<T>();
    serde_json::to_value(schema).unwrap_or_default()
}

fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T, ResponseEnvelope> {
    serde_json::from_value(params).map_err(|e| {
        ResponseEnvelope::error(format!("Invalid parameters: {e}"), ErrorKind::ValidationError)
    })
}

fn command_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "move_asset".to_string(),
            description: "Moves assets (files or folders) from source locations to a destination in the project".to_string(),
            mode: ExecutionMode::Sync,
            input_schema: schema_for::<MoveAssetParams>(),
        },
        CommandSpec {
            name: "add_asset_to_project".to_string(),
            description: "Imports assets (images, etc.) into the Unity project".to_string(),
            mode: ExecutionMode::Sync,
            input_schema: schema_for::<AddAssetParams>(),
        },
        CommandSpec {
            name: "delete_asset".to_string(),
            description: "Deletes an asset (file or folder) from the project".to_string(),
            mode: ExecutionMode::Sync,
            input_schema: schema_for::<DeleteAssetParams>(),
        },
        CommandSpec {
            name: "pack_atlas".to_string(),
            description: "Packs sprite atlases - supports packing specific atlases or all atlases".to_string(),
            mode: ExecutionMode::Sync,
            input_schema: schema_for::<PackAtlasParams>(),
        },
        CommandSpec {
            name: "add_to_addressable".to_string(),
            description: "Adds multiple assets to the Addressable system".to_string(),
            mode: ExecutionMode::Sync,
            input_schema: schema_for::<AddToAddressableParams>(),
        },
        CommandSpec {
            name: "add_unity_package".to_string(),
            description: "Add custom Unity package (.unitypackage) to the project".to_string(),
            mode: ExecutionMode::Async,
            input_schema: schema_for::<AddPackageParams>(),
        },
    ]
}

/// Command dispatcher over an editor host.
pub struct Bridge {
    host: Arc<dyn EditorHost>,
    pending: Arc<PendingImports>,
    config: BridgeConfig,
    commands: Vec<CommandSpec>,
}

impl Bridge {
    pub fn new(host: Arc<dyn EditorHost>) -> Self {
        Self::with_config(host, BridgeConfig::default())
    }

    pub fn with_config(host: Arc<dyn EditorHost>, config: BridgeConfig) -> Self {
        let pending = PendingImports::new(host.clone());
        Self {
            host,
            pending,
            config,
            commands: command_specs(),
        }
    }

    /// Descriptors for every dispatchable command, in a stable order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandSpec> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// The pending-import table, exposed for embedders that run their own
    /// eviction interval over [`PendingImports::sweep_expired`].
    pub fn pending(&self) -> &Arc<PendingImports> {
        &self.pending
    }

    #[instrument(skip(self, params))]
    pub async fn dispatch(&self, command: &str, params: Value) -> DispatchOutcome {
        match command {
            "move_asset" => match parse_params(params) {
                Ok(p) => DispatchOutcome::Ready(
                    tools::assets::move_asset(self.host.as_ref(), &self.config, p).await,
                ),
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            "add_asset_to_project" => match parse_params(params) {
                Ok(p) => DispatchOutcome::Ready(
                    tools::assets::add_asset_to_project(self.host.as_ref(), &self.config, p).await,
                ),
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            "delete_asset" => match parse_params(params) {
                Ok(p) => DispatchOutcome::Ready(
                    tools::assets::delete_asset(self.host.as_ref(), &self.config, p).await,
                ),
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            "pack_atlas" => match parse_params(params) {
                Ok(p) => {
                    DispatchOutcome::Ready(tools::atlas::pack_atlas(self.host.as_ref(), p).await)
                }
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            "add_to_addressable" => match parse_params(params) {
                Ok(p) => DispatchOutcome::Ready(
                    tools::addressables::add_to_addressable(self.host.as_ref(), p).await,
                ),
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            "add_unity_package" => match parse_params(params) {
                Ok(p) => tools::package::add_unity_package(&self.host, &self.pending, p).await,
                Err(envelope) => DispatchOutcome::Ready(envelope),
            },
            other => {
                tracing::warn!(command = %other, "Unknown command");
                DispatchOutcome::Ready(ResponseEnvelope::error(
                    format!("Unknown command: {other}"),
                    ErrorKind::UnknownCommand,
                ))
            }
        }
    }

    /// Dispatch and wait for the reply, deferred or not.
    pub async fn dispatch_wait(&self, command: &str, params: Value) -> ResponseEnvelope {
        self.dispatch(command, params).await.resolve().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_table_lists_every_tool() {
        let specs = command_specs();
        let names: Vec<&str> = specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "move_asset",
                "add_asset_to_project",
                "delete_asset",
                "pack_atlas",
                "add_to_addressable",
                "add_unity_package"
            ]
        );
        for spec in &specs {
            assert!(spec.input_schema.is_object());
        }
    }

    #[test]
    fn only_package_import_defers() {
        for spec in command_specs() {
            let defers = spec.name == "add_unity_package";
            assert_eq!(spec.mode.defers_reply(), defers, "{}", spec.name);
        }
    }
}
