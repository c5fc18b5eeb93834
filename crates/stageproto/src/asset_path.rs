//! AssetPath: a project-rooted asset identifier.
//!
//! The host addresses every asset by a forward-slash path under the
//! project's `Assets/` root. Normalization happens in exactly one place so
//! tools never hand-munge path strings: backslashes become forward slashes,
//! trailing slashes are trimmed, and paths gain the `Assets/` prefix when
//! missing (prefix check is case-insensitive, matching the host).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A normalized, project-rooted asset path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetPath(String);

/// Errors from asset path normalization.
#[derive(Debug, Error)]
pub enum AssetPathError {
    #[error("asset path is empty")]
    Empty,
}

impl AssetPath {
    /// Normalize a user-supplied path into project-rooted form.
    pub fn normalize(path: &str) -> Result<Self, AssetPathError> {
        if path.is_empty() {
            return Err(AssetPathError::Empty);
        }
        let path = path.replace('\\', "/");
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return Err(AssetPathError::Empty);
        }
        if path == "Assets" || has_assets_prefix(path) {
            Ok(Self(path.to_string()))
        } else {
            Ok(Self(format!("Assets/{}", path.trim_start_matches('/'))))
        }
    }

    /// Get the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }

    /// The last path segment (file or folder name).
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Append a segment, treating `self` as a folder.
    pub fn join(&self, name: &str) -> AssetPath {
        AssetPath(format!("{}/{}", self.0, name.trim_start_matches('/')))
    }

    /// The containing folder, or `None` at the project root.
    pub fn parent(&self) -> Option<AssetPath> {
        self.0.rfind('/').map(|idx| AssetPath(self.0[..idx].to_string()))
    }
}

fn has_assets_prefix(path: &str) -> bool {
    path.get(..7)
        .is_some_and(|head| head.eq_ignore_ascii_case("assets/"))
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AssetPath {
    type Err = AssetPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl AsRef<str> for AssetPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_path_gains_prefix() {
        let path = AssetPath::normalize("Textures/hero.png").unwrap();
        assert_eq!(path.as_str(), "Assets/Textures/hero.png");
    }

    #[test]
    fn rooted_path_unchanged() {
        let path = AssetPath::normalize("Assets/Textures/hero.png").unwrap();
        assert_eq!(path.as_str(), "Assets/Textures/hero.png");
    }

    #[test]
    fn prefix_check_is_case_insensitive() {
        let path = AssetPath::normalize("assets/Textures/hero.png").unwrap();
        assert_eq!(path.as_str(), "assets/Textures/hero.png");
    }

    #[test]
    fn backslashes_become_forward_slashes() {
        let path = AssetPath::normalize("Assets\\Textures\\hero.png").unwrap();
        assert_eq!(path.as_str(), "Assets/Textures/hero.png");
    }

    #[test]
    fn leading_slash_trimmed_before_prefixing() {
        let path = AssetPath::normalize("/Textures/hero.png").unwrap();
        assert_eq!(path.as_str(), "Assets/Textures/hero.png");
    }

    #[test]
    fn trailing_slash_trimmed() {
        let path = AssetPath::normalize("Assets/Textures/").unwrap();
        assert_eq!(path.as_str(), "Assets/Textures");
    }

    #[test]
    fn bare_root_stays_bare() {
        let path = AssetPath::normalize("Assets").unwrap();
        assert_eq!(path.as_str(), "Assets");
    }

    #[test]
    fn empty_rejected() {
        assert!(matches!(AssetPath::normalize(""), Err(AssetPathError::Empty)));
        assert!(matches!(AssetPath::normalize("/"), Err(AssetPathError::Empty)));
    }

    #[test]
    fn file_name_is_last_segment() {
        let path = AssetPath::normalize("Assets/Textures/hero.png").unwrap();
        assert_eq!(path.file_name(), "hero.png");
        assert_eq!(AssetPath::normalize("Assets").unwrap().file_name(), "Assets");
    }

    #[test]
    fn join_appends_segment() {
        let folder = AssetPath::normalize("Assets/Textures").unwrap();
        assert_eq!(folder.join("hero.png").as_str(), "Assets/Textures/hero.png");
        assert_eq!(folder.join("/hero.png").as_str(), "Assets/Textures/hero.png");
    }

    #[test]
    fn parent_walks_up() {
        let path = AssetPath::normalize("Assets/Textures/hero.png").unwrap();
        assert_eq!(path.parent().unwrap().as_str(), "Assets/Textures");
        assert_eq!(AssetPath::normalize("Assets").unwrap().parent(), None);
    }

    #[test]
    fn serde_is_transparent() {
        let path = AssetPath::normalize("Assets/Textures/hero.png").unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"Assets/Textures/hero.png\"");
        let back: AssetPath = serde_json::from_str(&json).unwrap();
        assert_eq!(path, back);
    }

    #[test]
    fn from_str_normalizes() {
        let path: AssetPath = "Textures/hero.png".parse().unwrap();
        assert_eq!(path.as_str(), "Assets/Textures/hero.png");
    }
}
