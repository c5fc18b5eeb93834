//! Addressable entry registration.
//!
//! `assets` maps each address to the asset path it should point at; the
//! whole batch lands in one group, the default group unless `groupName`
//! says otherwise. The host persists its settings as part of entry
//! creation, so no database refresh is issued here.

use crate::host::EditorHost;
use serde_json::json;
use stageproto::{AddToAddressableParams, AssetPath, ErrorKind, ResponseEnvelope};

pub async fn add_to_addressable(
    host: &dyn EditorHost,
    params: AddToAddressableParams,
) -> ResponseEnvelope {
    let Some(assets) = params.assets.filter(|a| !a.is_empty()) else {
        return ResponseEnvelope::error(
            "Required parameter 'assets' must be provided as a non-empty object with address:path pairs",
            ErrorKind::ValidationError,
        );
    };
    if !host.addressables_available().await {
        return ResponseEnvelope::error(
            "Addressable Asset Settings not found. Please initialize Addressables first.",
            ErrorKind::ExecutionError,
        );
    }
    let group = params.group_name.filter(|g| !g.is_empty());

    let mut addressed: Vec<String> = Vec::new();
    let mut failures: Vec<String> = Vec::new();

    for (address, raw) in assets {
        let path = match AssetPath::normalize(&raw) {
            Ok(path) => path,
            Err(_) => {
                failures.push(format!("Asset not found at path: {raw}"));
                continue;
            }
        };
        if !host.asset_exists(&path).await {
            failures.push(format!("Asset not found at path: {path}"));
            continue;
        }
        tracing::info!(path = %path, address = %address, "Adding asset to addressables");
        match host
            .add_addressable_entry(&path, &address, group.as_deref())
            .await
        {
            Ok(()) => addressed.push(address),
            Err(e) => failures.push(format!("Failed to add asset {path}: {e}")),
        }
    }

    let message = format!(
        "Added assets to Addressables: {} successfully, {} failed",
        addressed.len(),
        failures.len()
    );
    if failures.is_empty() {
        ResponseEnvelope::success_with(message, json!({ "addresses": addressed }))
    } else {
        ResponseEnvelope::partial_listed(message, failures, Some(json!({ "addresses": addressed })))
    }
}
