//! Correlation key derivation.
//!
//! An asynchronous operation is matched to its later completion event by a
//! key derived from the request: the last path segment minus its extension.
//! The host emits the same key when the operation finishes. Kept as one
//! documented function so call sites never munge path strings ad hoc.

use std::path::Path;

/// Derive the correlation key for a package path.
///
/// `/tmp/foo.unitypackage` becomes `foo`; only the final extension is
/// stripped, so `b.v2.unitypackage` becomes `b.v2`. Returns `None` when
/// the path has no usable final segment.
pub fn package_key(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_string_lossy();
    if stem.is_empty() {
        None
    } else {
        Some(stem.into_owned())
    }
}
