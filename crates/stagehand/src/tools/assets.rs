//! Synchronous asset commands: move, import, delete.
//!
//! Batch commands validate before any mutation, then work item by item,
//! collecting per-item failures keyed by the offending path. A batch with
//! any failure reports `success=false` while the message still carries the
//! partial success count, and the payload lists the items that did land.

use crate::config::BridgeConfig;
use crate::host::EditorHost;
use serde_json::json;
use stageproto::{
    AddAssetParams, AssetPath, DeleteAssetParams, ErrorKind, MoveAssetParams, ResponseEnvelope,
};
use std::collections::BTreeMap;
use std::path::Path;

/// Move assets (files or folders) to a destination folder in the project.
pub async fn move_asset(
    host: &dyn EditorHost,
    config: &BridgeConfig,
    params: MoveAssetParams,
) -> ResponseEnvelope {
    let dest = params.dest_path.filter(|d| !d.is_empty());
    let (Some(sources), Some(dest)) = (params.source_paths, dest) else {
        return ResponseEnvelope::error(
            "Required parameters 'sourcePaths' and 'destPath' must be provided",
            ErrorKind::ValidationError,
        );
    };
    let sources = sources.into_vec();
    if sources.is_empty() {
        return ResponseEnvelope::error(
            "At least one source path must be provided",
            ErrorKind::ValidationError,
        );
    }
    let dest = match AssetPath::normalize(&dest) {
        Ok(dest) => dest,
        Err(e) => {
            return ResponseEnvelope::error(
                format!("Invalid destination path: {e}"),
                ErrorKind::ValidationError,
            );
        }
    };

    let mut moved: Vec<AssetPath> = Vec::new();
    let mut failures: BTreeMap<String, String> = BTreeMap::new();

    for raw in sources {
        let source = match AssetPath::normalize(&raw) {
            Ok(source) => source,
            Err(_) => {
                failures.insert(raw, "Source asset not found".to_string());
                continue;
            }
        };
        if !host.asset_exists(&source).await {
            failures.insert(source.into_inner(), "Source asset not found".to_string());
            continue;
        }
        let target = dest.join(source.file_name());
        if host.asset_exists(&target).await {
            failures.insert(
                target.into_inner(),
                "Asset already exists at destination".to_string(),
            );
            continue;
        }
        if let Err(e) = host.ensure_folder(&dest).await {
            failures.insert(source.into_inner(), e.to_string());
            continue;
        }
        match host.move_asset(&source, &target).await {
            Ok(()) => moved.push(target),
            Err(e) => {
                failures.insert(source.into_inner(), e.to_string());
            }
        }
    }

    if !moved.is_empty() && config.refresh_after_mutation {
        host.refresh().await;
    }

    let message = format!(
        "Moved assets: {} successfully, {} failed",
        moved.len(),
        failures.len()
    );
    if failures.is_empty() {
        ResponseEnvelope::success_with(message, json!({ "moved": moved }))
    } else {
        ResponseEnvelope::partial(message, failures, Some(json!({ "moved": moved })))
    }
}

/// Import files from disk into the project.
pub async fn add_asset_to_project(
    host: &dyn EditorHost,
    config: &BridgeConfig,
    params: AddAssetParams,
) -> ResponseEnvelope {
    let dest = params.dest_path.filter(|d| !d.is_empty());
    let (Some(sources), Some(dest)) = (params.source_paths, dest) else {
        return ResponseEnvelope::error(
            "Required parameters 'sourcePaths' and 'destPath' must be provided",
            ErrorKind::ValidationError,
        );
    };
    let sources = sources.into_vec();
    if sources.is_empty() {
        return ResponseEnvelope::error(
            "At least one source path must be provided",
            ErrorKind::ValidationError,
        );
    }
    let dest = match AssetPath::normalize(&dest) {
        Ok(dest) => dest,
        Err(e) => {
            return ResponseEnvelope::error(
                format!("Invalid destination path: {e}"),
                ErrorKind::ValidationError,
            );
        }
    };

    let mut added: Vec<AssetPath> = Vec::new();
    let mut failures: BTreeMap<String, String> = BTreeMap::new();

    for raw in sources {
        let source = Path::new(&raw);
        if !source.is_file() {
            let reason = if source.is_dir() {
                "Path must be a file, not a directory"
            } else {
                "Source file not found"
            };
            failures.insert(raw, reason.to_string());
            continue;
        }
        let Some(name) = source.file_name().and_then(|n| n.to_str()) else {
            failures.insert(raw, "Source file not found".to_string());
            continue;
        };
        let target = dest.join(name);
        if host.asset_exists(&target).await {
            failures.insert(
                target.into_inner(),
                "Asset already exists at destination".to_string(),
            );
            continue;
        }
        if let Err(e) = host.ensure_folder(&dest).await {
            failures.insert(raw, e.to_string());
            continue;
        }
        match host.import_file(source, &target).await {
            Ok(()) => added.push(target),
            Err(e) => {
                failures.insert(raw, e.to_string());
            }
        }
    }

    if !added.is_empty() && config.refresh_after_mutation {
        host.refresh().await;
    }

    let message = format!(
        "Imported assets: {} successfully, {} failed",
        added.len(),
        failures.len()
    );
    if failures.is_empty() {
        ResponseEnvelope::success_with(message, json!({ "added": added }))
    } else {
        ResponseEnvelope::partial(message, failures, Some(json!({ "added": added })))
    }
}

/// Delete a single asset (file or folder) from the project.
pub async fn delete_asset(
    host: &dyn EditorHost,
    config: &BridgeConfig,
    params: DeleteAssetParams,
) -> ResponseEnvelope {
    let Some(path) = params.path.filter(|p| !p.is_empty()) else {
        return ResponseEnvelope::error(
            "Required parameter 'path' must be provided",
            ErrorKind::ValidationError,
        );
    };
    let path = match AssetPath::normalize(&path) {
        Ok(path) => path,
        Err(e) => {
            return ResponseEnvelope::error(
                format!("Invalid asset path: {e}"),
                ErrorKind::ValidationError,
            );
        }
    };
    if !host.asset_exists(&path).await {
        return ResponseEnvelope::error(
            format!("Asset not found at path: {path}"),
            ErrorKind::NotFound,
        );
    }

    tracing::info!(path = %path, "Deleting asset");
    match host.delete_asset(&path).await {
        Ok(()) => {
            if config.refresh_after_mutation {
                host.refresh().await;
            }
            ResponseEnvelope::success(format!("Successfully deleted asset at {path}"))
        }
        Err(e) => {
            tracing::warn!(path = %path, error = %e, "Delete failed");
            ResponseEnvelope::error(
                format!("Failed to delete asset at '{path}'. Check logs or if the file is locked."),
                ErrorKind::ExecutionError,
            )
        }
    }
}
