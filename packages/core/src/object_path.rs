//! Object paths: `/Package/Sub/Asset.Object`.

use std::fmt;

use thiserror::Error;

/// Delimiter that introduces the defining module of a native class path.
pub const SCRIPT_ROOT: &str = "/Script/";

/// Errors related to object path parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("object path is empty")]
    Empty,

    #[error("object path '{path}' must start with '/'")]
    NotRooted { path: String },

    #[error("object path '{path}' has an empty segment at position {position}")]
    EmptySegment { path: String, position: usize },

    #[error("object path '{path}' contains whitespace")]
    Whitespace { path: String },

    #[error("object path '{path}' has more than one object separator")]
    MultipleObjects { path: String },
}

/// A validated object path.
///
/// The package part is a `/`-separated list of non-empty segments. An optional
/// object name follows a single `.` after the last segment:
///
/// ```rust
/// use classbridge_core::ObjectPath;
///
/// let path = ObjectPath::parse("/Script/Engine.Actor").unwrap();
/// assert_eq!(path.package(), "/Script/Engine");
/// assert_eq!(path.object_name(), "Actor");
/// assert_eq!(path.module(), Some("Engine"));
/// ```
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectPath {
    raw: String,
    // Byte offset of the '.' separating package from object, if any.
    object_at: Option<usize>,
}

impl ObjectPath {
    /// Parse and validate a path string.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        if !s.starts_with('/') {
            return Err(PathError::NotRooted {
                path: s.to_string(),
            });
        }
        if s.chars().any(char::is_whitespace) {
            return Err(PathError::Whitespace {
                path: s.to_string(),
            });
        }

        let last_slash = s.rfind('/').unwrap_or(0);
        let tail = &s[last_slash..];
        if tail.matches('.').count() > 1 {
            return Err(PathError::MultipleObjects {
                path: s.to_string(),
            });
        }
        let object_at = tail.find('.').map(|i| last_slash + i);

        let package = &s[..object_at.unwrap_or(s.len())];
        for (position, segment) in package.split('/').skip(1).enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: s.to_string(),
                    position,
                });
            }
        }
        if let Some(dot) = object_at {
            if dot + 1 == s.len() {
                return Err(PathError::EmptySegment {
                    path: s.to_string(),
                    position: package.split('/').count() - 1,
                });
            }
        }

        Ok(ObjectPath {
            raw: s.to_string(),
            object_at,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The package part, without the object name.
    pub fn package(&self) -> &str {
        &self.raw[..self.object_at.unwrap_or(self.raw.len())]
    }

    /// The object name, or the last package segment when there is none.
    pub fn object_name(&self) -> &str {
        match self.object_at {
            Some(dot) => &self.raw[dot + 1..],
            None => self.package().rsplit('/').next().unwrap_or_default(),
        }
    }

    pub fn has_object(&self) -> bool {
        self.object_at.is_some()
    }

    /// The defining module of a native path (`/Script/<Module>.<Class>`).
    pub fn module(&self) -> Option<&str> {
        module_segment(&self.raw, SCRIPT_ROOT)
    }

    /// Check whether the package lies under `root` on a segment boundary.
    ///
    /// `/Game/Blueprints` is under `/Game`; `/GameData` is not.
    pub fn is_under(&self, root: &str) -> bool {
        let root = root.trim_end_matches('/');
        if root.is_empty() {
            return true;
        }
        let package = self.package();
        package == root
            || package
                .strip_prefix(root)
                .is_some_and(|rest| rest.starts_with('/'))
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.raw.contains(needle)
    }
}

/// Locate `delimiter` in `path` and return the text up to the following `.`.
///
/// ```rust
/// use classbridge_core::naming::module_segment;
///
/// assert_eq!(module_segment("/Script/Game.Hero", "/Script/"), Some("Game"));
/// assert_eq!(module_segment("/Game/BP_Hero.BP_Hero_C", "/Script/"), None);
/// ```
pub fn module_segment<'a>(path: &'a str, delimiter: &str) -> Option<&'a str> {
    let start = path.find(delimiter)? + delimiter.len();
    let rest = &path[start..];
    let end = rest.find('.')?;
    Some(&rest[..end])
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl std::str::FromStr for ObjectPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_native_and_asset_paths() {
        let native = ObjectPath::parse("/Script/Engine.Pawn").unwrap();
        assert_eq!(native.package(), "/Script/Engine");
        assert_eq!(native.object_name(), "Pawn");
        assert_eq!(native.module(), Some("Engine"));

        let asset = ObjectPath::parse("/Game/Weapons/Sword.Sword_C").unwrap();
        assert_eq!(asset.package(), "/Game/Weapons/Sword");
        assert_eq!(asset.object_name(), "Sword_C");
        assert_eq!(asset.module(), None);
    }

    #[test]
    fn package_only_paths_name_their_last_segment() {
        let p = ObjectPath::parse("/Game/Sword").unwrap();
        assert!(!p.has_object());
        assert_eq!(p.object_name(), "Sword");
    }

    #[test]
    fn dots_in_earlier_segments_belong_to_the_package_check() {
        // Only the tail after the last '/' may carry the object separator.
        let p = ObjectPath::parse("/Engine/Transient.REINST_Hero").unwrap();
        assert_eq!(p.package(), "/Engine/Transient");
        assert_eq!(p.object_name(), "REINST_Hero");
    }

    #[test]
    fn invalid_paths_rejected() {
        assert_eq!(ObjectPath::parse(""), Err(PathError::Empty));
        assert!(matches!(
            ObjectPath::parse("Game/Sword"),
            Err(PathError::NotRooted { .. })
        ));
        assert!(matches!(
            ObjectPath::parse("/Game//Sword"),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            ObjectPath::parse("/Game/Sword."),
            Err(PathError::EmptySegment { .. })
        ));
        assert!(matches!(
            ObjectPath::parse("/Game/My Sword"),
            Err(PathError::Whitespace { .. })
        ));
        assert!(matches!(
            ObjectPath::parse("/Game/Sword.A.B"),
            Err(PathError::MultipleObjects { .. })
        ));
    }

    #[test]
    fn is_under_respects_segment_boundaries() {
        let p = ObjectPath::parse("/Game/Blueprints/BP_Hero.BP_Hero").unwrap();
        assert!(p.is_under("/Game"));
        assert!(p.is_under("/Game/"));
        assert!(p.is_under("/Game/Blueprints"));
        assert!(!p.is_under("/Gam"));
        assert!(!p.is_under("/Game/Blue"));
        assert!(p.is_under(""));
    }

    #[test]
    fn module_segment_needs_a_following_separator() {
        assert_eq!(module_segment("/Script/Game", SCRIPT_ROOT), None);
        assert_eq!(
            module_segment("/Script/GameCore.Hero", SCRIPT_ROOT),
            Some("GameCore")
        );
    }
}
