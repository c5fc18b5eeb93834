//! Sprite atlas packing.
//!
//! `paths` selects either every atlas in the project (the keyword `"all"`,
//! case-insensitive) or specific atlases by path. Per-item failures are
//! collected as a flat list rather than a map; the count of atlases that
//! did pack rides in the payload either way.

use crate::host::{EditorHost, HostError};
use serde_json::json;
use stageproto::{AssetPath, AtlasSelection, ErrorKind, PackAtlasParams, ResponseEnvelope};

pub async fn pack_atlas(host: &dyn EditorHost, params: PackAtlasParams) -> ResponseEnvelope {
    let Some(selection) = params.paths else {
        return ResponseEnvelope::error(
            "Required parameter 'paths' must be provided as either a string 'all' or an array of atlas paths",
            ErrorKind::ValidationError,
        );
    };

    let mut packed = 0;
    let mut failures: Vec<String> = Vec::new();

    match selection {
        AtlasSelection::Keyword(word) if word.eq_ignore_ascii_case("all") => {
            tracing::info!("Packing all atlases");
            match host.pack_all_atlases().await {
                Ok(count) => packed = count,
                Err(e) => failures.push(format!("Failed to pack all atlases: {e}")),
            }
        }
        AtlasSelection::Keyword(_) => {
            return ResponseEnvelope::error(
                "Parameter 'paths' must be either a string 'all' or an array of atlas paths",
                ErrorKind::ValidationError,
            );
        }
        AtlasSelection::Paths(paths) => {
            if paths.is_empty() {
                return ResponseEnvelope::error(
                    "When providing paths as array, it must be non-empty",
                    ErrorKind::ValidationError,
                );
            }
            for raw in paths {
                let path = match AssetPath::normalize(&raw) {
                    Ok(path) => path,
                    Err(_) => {
                        failures.push(format!("Atlas not found at path: {raw}"));
                        continue;
                    }
                };
                if !host.asset_exists(&path).await {
                    failures.push(format!("Atlas not found at path: {path}"));
                    continue;
                }
                tracing::info!(path = %path, "Packing atlas");
                match host.pack_atlas(&path).await {
                    Ok(()) => packed += 1,
                    Err(HostError::Rejected(reason)) => {
                        failures.push(format!("Failed to load atlas at {path}: {reason}"));
                    }
                    Err(e) => {
                        failures.push(format!("Failed to pack atlas {path}: {e}"));
                    }
                }
            }
        }
    }

    let message = format!(
        "Packed atlases: {} successfully, {} failed",
        packed,
        failures.len()
    );
    if failures.is_empty() {
        ResponseEnvelope::success_with(message, json!({ "packed": packed }))
    } else {
        ResponseEnvelope::partial_listed(message, failures, Some(json!({ "packed": packed })))
    }
}
