//! Command parameter types with JSON Schema derivation.
//!
//! These are the wire shapes the command source sends; field names are part
//! of the protocol and stay camelCase. Required-parameter checks live in
//! the tool bodies so each command reports its own message, which is why
//! the fields are `Option` here.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A parameter accepting either a single string or an array of strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flatten into a vector of paths.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(path) => vec![path],
            Self::Many(paths) => paths,
        }
    }

    /// True for the empty-array form.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Many(paths) if paths.is_empty())
    }
}

/// Selector for pack_atlas: the keyword `"all"` or specific atlas paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum AtlasSelection {
    Keyword(String),
    Paths(Vec<String>),
}

/// Parameters for the move_asset command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveAssetParams {
    /// Source asset paths to move (single path or array)
    pub source_paths: Option<OneOrMany>,
    /// Destination folder inside the project
    pub dest_path: Option<String>,
}

/// Parameters for the add_asset_to_project command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddAssetParams {
    /// Files on disk to import (single path or array)
    pub source_paths: Option<OneOrMany>,
    /// Destination folder inside the project
    pub dest_path: Option<String>,
}

/// Parameters for the delete_asset command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAssetParams {
    /// Asset path to delete
    pub path: Option<String>,
}

/// Parameters for the pack_atlas command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PackAtlasParams {
    /// Either the string "all" or an array of atlas paths
    pub paths: Option<AtlasSelection>,
}

/// Parameters for the add_to_addressable command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddToAddressableParams {
    /// Address to asset-path pairs to register
    pub assets: Option<BTreeMap<String, String>>,
    /// Addressable group receiving the entries; the default group when
    /// omitted or empty
    pub group_name: Option<String>,
}

/// Parameters for the add_unity_package command
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddPackageParams {
    /// Path to the .unitypackage file on disk
    pub package_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn one_or_many_accepts_both_shapes() {
        let one: OneOrMany = serde_json::from_str("\"Assets/A.png\"").unwrap();
        assert_eq!(one.into_vec(), vec!["Assets/A.png".to_string()]);

        let many: OneOrMany = serde_json::from_str("[\"a\", \"b\"]").unwrap();
        assert_eq!(many.into_vec(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn one_or_many_emptiness() {
        assert!(OneOrMany::Many(vec![]).is_empty());
        assert!(!OneOrMany::One(String::new()).is_empty());
        assert!(!OneOrMany::Many(vec!["a".into()]).is_empty());
    }

    #[test]
    fn atlas_selection_shapes() {
        let all: AtlasSelection = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, AtlasSelection::Keyword("all".to_string()));

        let some: AtlasSelection = serde_json::from_str("[\"Assets/UI.spriteatlas\"]").unwrap();
        assert_eq!(
            some,
            AtlasSelection::Paths(vec!["Assets/UI.spriteatlas".to_string()])
        );
    }

    #[test]
    fn wire_names_are_camel_case() {
        let params: MoveAssetParams = serde_json::from_str(
            r#"{"sourcePaths": "Assets/A.png", "destPath": "Assets/Dest"}"#,
        )
        .unwrap();
        assert_eq!(params.dest_path.as_deref(), Some("Assets/Dest"));

        let params: AddPackageParams =
            serde_json::from_str(r#"{"packagePath": "/tmp/foo.unitypackage"}"#).unwrap();
        assert_eq!(params.package_path.as_deref(), Some("/tmp/foo.unitypackage"));
    }

    #[test]
    fn missing_fields_parse_as_none() {
        let params: MoveAssetParams = serde_json::from_str("{}").unwrap();
        assert!(params.source_paths.is_none());
        assert!(params.dest_path.is_none());
    }

    #[test]
    fn addressable_assets_parse_as_map() {
        let params: AddToAddressableParams = serde_json::from_str(
            r#"{"assets": {"hero": "Assets/Art/Hero.png", "villain": "Art/Villain.png"}}"#,
        )
        .unwrap();
        let assets = params.assets.unwrap();
        assert_eq!(assets.get("hero").map(String::as_str), Some("Assets/Art/Hero.png"));
        assert_eq!(assets.len(), 2);
        assert!(params.group_name.is_none());

        let params: AddToAddressableParams =
            serde_json::from_str(r#"{"assets": {}, "groupName": "UI"}"#).unwrap();
        assert_eq!(params.assets.map(|a| a.len()), Some(0));
        assert_eq!(params.group_name.as_deref(), Some("UI"));
    }

    #[test]
    fn move_asset_schema() {
        let schema = schemars::schema_for!(MoveAssetParams);
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("sourcePaths"));
        assert!(json.contains("destPath"));
    }

    #[test]
    fn add_package_schema() {
        let schema = schemars::schema_for!(AddPackageParams);
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("packagePath"));
    }

    #[test]
    fn addressable_schema() {
        let schema = schemars::schema_for!(AddToAddressableParams);
        let json = serde_json::to_string_pretty(&schema).unwrap();
        assert!(json.contains("assets"));
        assert!(json.contains("groupName"));
    }
}
