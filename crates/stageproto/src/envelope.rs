//! Response envelope and error classification for the bridge protocol.
//!
//! Every command invocation produces exactly one envelope, whether it
//! resolves synchronously or later from a host completion event. Consumers
//! branch on `success` plus the presence of `errors`/`payload`, never on
//! message text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Response kind tag. The bridge only produces text responses today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKind {
    Text,
}

/// Programmatic failure classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or missing request parameters; host state untouched
    ValidationError,

    /// Dispatcher has no descriptor for the command name
    UnknownCommand,

    /// Host operation failed or raised during execution
    ExecutionError,

    /// Referenced entity absent in the host
    NotFound,

    /// Async command re-issued for a correlation key already pending
    DuplicateOperation,

    /// Batch command where some items succeeded and some failed
    PartialFailure,
}

impl ErrorKind {
    /// Wire string for this kind (`validation_error`, `not_found`, ...).
    pub fn code(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::UnknownCommand => "unknown_command",
            Self::ExecutionError => "execution_error",
            Self::NotFound => "not_found",
            Self::DuplicateOperation => "duplicate_operation",
            Self::PartialFailure => "partial_failure",
        }
    }
}

/// Structured detail carried in a failing envelope's `errors` field.
///
/// Serializes as an object or an array per the wire contract: hard failures
/// carry their classification, batch failures carry a path-to-reason map or
/// a flat list of descriptions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    /// Classification of a total failure
    Classified { kind: ErrorKind },

    /// Per-item failures for batch commands, keyed by the offending path
    Itemized(BTreeMap<String, String>),

    /// Flat list of failure descriptions
    Listed(Vec<String>),
}

/// The canonical response shape returned to the command source.
///
/// Wire contract: `{ success, type, message, payload?, errors? }`.
/// `success=false` with a non-empty `errors` collection signals partial or
/// total failure; `errors` absence does not imply full success beyond the
/// flag itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub success: bool,

    #[serde(rename = "type")]
    pub kind: ResponseKind,

    pub message: String,

    /// Structured result data, e.g. affected asset paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<ErrorDetail>,
}

impl ResponseEnvelope {
    /// Create a success envelope with no payload.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            kind: ResponseKind::Text,
            message: message.into(),
            payload: None,
            errors: None,
        }
    }

    /// Create a success envelope carrying a payload.
    pub fn success_with(message: impl Into<String>, payload: Value) -> Self {
        Self {
            success: true,
            kind: ResponseKind::Text,
            message: message.into(),
            payload: Some(payload),
            errors: None,
        }
    }

    /// Create a classified error envelope.
    pub fn error(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            success: false,
            kind: ResponseKind::Text,
            message: message.into(),
            payload: None,
            errors: Some(ErrorDetail::Classified { kind }),
        }
    }

    /// Create a partial-failure envelope with per-item failures.
    ///
    /// Callers use this only when at least one item failed; a fully
    /// successful batch is a [`ResponseEnvelope::success_with`].
    pub fn partial(
        message: impl Into<String>,
        failures: BTreeMap<String, String>,
        payload: Option<Value>,
    ) -> Self {
        Self {
            success: false,
            kind: ResponseKind::Text,
            message: message.into(),
            payload,
            errors: Some(ErrorDetail::Itemized(failures)),
        }
    }

    /// Create a partial-failure envelope with list-shaped failures.
    pub fn partial_listed(
        message: impl Into<String>,
        failures: Vec<String>,
        payload: Option<Value>,
    ) -> Self {
        Self {
            success: false,
            kind: ResponseKind::Text,
            message: message.into(),
            payload,
            errors: Some(ErrorDetail::Listed(failures)),
        }
    }

    /// Failure classification, if this envelope is a failure.
    ///
    /// Itemized and listed details classify as [`ErrorKind::PartialFailure`].
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match &self.errors {
            Some(ErrorDetail::Classified { kind }) => Some(*kind),
            Some(ErrorDetail::Itemized(_)) | Some(ErrorDetail::Listed(_)) => {
                Some(ErrorKind::PartialFailure)
            }
            None => None,
        }
    }

    /// Convert to JSON for the transport edge.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({
                "success": false,
                "type": "text",
                "message": format!("envelope serialization failed: {}", e),
                "errors": { "kind": "execution_error" }
            })
        })
    }
}
