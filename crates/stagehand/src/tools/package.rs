//! Asynchronous package import with completion correlation.
//!
//! The reply cannot be produced inline: the host finishes the import on
//! its own time and announces it with a bare key. The flow is
//! snapshot, register, trigger; a trigger failure unwinds the
//! registration immediately so nothing leaks.

use crate::correlate::package_key;
use crate::dispatch::{DispatchOutcome, ReplyHandle};
use crate::host::EditorHost;
use crate::pending::PendingImports;
use crate::snapshot::Snapshot;
use stageproto::{AddPackageParams, ErrorKind, ResponseEnvelope};
use std::path::Path;
use std::sync::Arc;

pub async fn add_unity_package(
    host: &Arc<dyn EditorHost>,
    pending: &Arc<PendingImports>,
    params: AddPackageParams,
) -> DispatchOutcome {
    let Some(package_path) = params.package_path.filter(|p| !p.is_empty()) else {
        return DispatchOutcome::Ready(ResponseEnvelope::error(
            "Required parameter 'packagePath' not provided",
            ErrorKind::ValidationError,
        ));
    };
    let Some(key) = package_key(Path::new(&package_path)) else {
        return DispatchOutcome::Ready(ResponseEnvelope::error(
            format!("Cannot derive a package name from '{package_path}'"),
            ErrorKind::ValidationError,
        ));
    };

    let before = Snapshot::capture(host.as_ref()).await;
    let rx = match pending.register(&key, &package_path, before).await {
        Ok(rx) => rx,
        Err(_) => {
            return DispatchOutcome::Ready(ResponseEnvelope::error(
                format!("A package import for '{key}' is already pending"),
                ErrorKind::DuplicateOperation,
            ));
        }
    };

    if let Err(e) = host.import_package(Path::new(&package_path)).await {
        tracing::warn!(key = %key, error = %e, "Package import trigger failed");
        pending.abandon(&key).await;
        return DispatchOutcome::Ready(ResponseEnvelope::error(
            format!("Failed to import package: {e}"),
            ErrorKind::ExecutionError,
        ));
    }

    DispatchOutcome::Deferred(ReplyHandle::new(key, rx))
}
