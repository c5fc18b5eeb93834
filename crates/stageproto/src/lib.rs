//! stageproto - Protocol types for the Stagehand editor automation bridge
//!
//! This crate defines the vocabulary shared between the bridge and its
//! command source: the response envelope every invocation resolves to, the
//! error classification taxonomy, command execution modes, and the typed
//! parameter shapes for each command.
//!
//! ## Wire contract
//!
//! Every command, sync or async, produces exactly one envelope:
//! `{ success, type, message, payload?, errors? }`. The `errors` field is
//! an object (a classification or a per-item failure map) or an array of
//! failure strings; consumers branch on `success` and the presence of
//! `errors`/`payload`, never on message text.
//!
//! ## Tool Parameter Types
//!
//! The `params` module contains types with JsonSchema derives so the
//! dispatcher can publish an input schema per command. Field names are
//! camelCase on the wire and part of the protocol.

pub mod asset_path;
pub mod envelope;
pub mod mode;
pub mod params;

pub use asset_path::{AssetPath, AssetPathError};
pub use envelope::{ErrorDetail, ErrorKind, ResponseEnvelope, ResponseKind};
pub use mode::ExecutionMode;
pub use params::{
    AddAssetParams, AddPackageParams, AddToAddressableParams, AtlasSelection, DeleteAssetParams,
    MoveAssetParams, OneOrMany, PackAtlasParams,
};
