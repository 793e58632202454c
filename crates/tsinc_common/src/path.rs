//! Case-insensitive path keys and lexical path normalization.

use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Key type for maps indexed by file path.
///
/// Wraps the case-folded textual form of a path so that two spellings of
/// the same file (`C:\Lib\A.TS` vs `c:\lib\a.ts`) compare equal. Source
/// files reference each other with hand-written directives, and the same
/// file is routinely spelled with differing case by different referrers.
/// The original spelling is not kept here; callers that need it store
/// the path alongside the key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PathKey(String);

impl PathKey {
    /// Builds a key from a path, folding case.
    pub fn new(path: &Path) -> Self {
        Self(path.to_string_lossy().to_lowercase())
    }

    /// Returns the folded textual form of the key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PathKey({})", self.0)
    }
}

impl From<&Path> for PathKey {
    fn from(path: &Path) -> Self {
        Self::new(path)
    }
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// Unlike `std::fs::canonicalize`, this works for paths that do not
/// exist yet. Dependency directives routinely point at files relative to
/// their referrer (`../lib/core.ts`), and the joined result must be
/// collapsed into one canonical spelling before it can serve as a key.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::Normal(name) => out.push(name),
            Component::CurDir => {}
            Component::ParentDir => {
                // Above the root of an absolute path there is nothing to
                // pop to; the component is dropped.
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn keys_ignore_case() {
        let a = PathKey::new(Path::new("/src/App.TS"));
        let b = PathKey::new(Path::new("/SRC/app.ts"));
        assert_eq!(a, b);
    }

    #[test]
    fn distinct_paths_differ() {
        let a = PathKey::new(Path::new("/src/a.ts"));
        let b = PathKey::new(Path::new("/src/b.ts"));
        assert_ne!(a, b);
    }

    #[test]
    fn keys_order_by_folded_text() {
        let mut map = BTreeMap::new();
        map.insert(PathKey::new(Path::new("/src/B.ts")), 1);
        map.insert(PathKey::new(Path::new("/src/a.ts")), 2);
        let keys: Vec<_> = map.keys().map(|k| k.as_str().to_string()).collect();
        assert_eq!(keys, vec!["/src/a.ts", "/src/b.ts"]);
    }

    #[test]
    fn debug_shows_folded_form() {
        let key = PathKey::new(Path::new("/Src/Main.ts"));
        assert_eq!(format!("{key:?}"), "PathKey(/src/main.ts)");
    }

    #[test]
    fn normalize_removes_current_dir() {
        assert_eq!(
            normalize_path(Path::new("/a/./b/./c.ts")),
            PathBuf::from("/a/b/c.ts")
        );
    }

    #[test]
    fn normalize_resolves_parent_dir() {
        assert_eq!(
            normalize_path(Path::new("/a/b/../c.ts")),
            PathBuf::from("/a/c.ts")
        );
    }

    #[test]
    fn normalize_resolves_chained_parents() {
        assert_eq!(
            normalize_path(Path::new("/a/b/c/../../d.ts")),
            PathBuf::from("/a/d.ts")
        );
    }

    #[test]
    fn normalize_keeps_leading_parents_of_relative_paths() {
        assert_eq!(
            normalize_path(Path::new("a/../../b.ts")),
            PathBuf::from("../b.ts")
        );
    }

    #[test]
    fn normalize_stops_at_root() {
        assert_eq!(normalize_path(Path::new("/../a.ts")), PathBuf::from("/a.ts"));
    }

    #[test]
    fn normalize_leaves_clean_paths_alone() {
        assert_eq!(
            normalize_path(Path::new("/lib/core.ts")),
            PathBuf::from("/lib/core.ts")
        );
    }
}
