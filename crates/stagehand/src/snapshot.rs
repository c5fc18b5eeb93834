//! Identifier snapshots and the set diff used to attribute async results.
//!
//! A host completion event carries only a correlation key, no payload, so
//! the bridge reconstructs "what did this operation produce" by capturing
//! the host's full identifier set before triggering and diffing it against
//! a capture taken when the event arrives. Unrelated host activity between
//! the two captures can pollute the diff with identifiers this operation
//! did not produce; that is an accepted approximation, not a guarantee of
//! exactness.

use crate::host::EditorHost;
use stageproto::AssetPath;
use std::collections::BTreeSet;

/// A captured set of host-known identifiers at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot {
    paths: BTreeSet<AssetPath>,
}

impl Snapshot {
    /// Capture the host's current identifier set.
    pub async fn capture(host: &dyn EditorHost) -> Self {
        Self {
            paths: host.asset_paths().await,
        }
    }

    /// Build a snapshot from known paths.
    pub fn from_paths(paths: impl IntoIterator<Item = AssetPath>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    /// Identifiers present in `after` but absent from `self`, sorted.
    ///
    /// Inputs are sets, so duplicates are impossible and the result does
    /// not depend on the host's enumeration order.
    pub fn diff(&self, after: &Snapshot) -> Vec<AssetPath> {
        after.paths.difference(&self.paths).cloned().collect()
    }
}
