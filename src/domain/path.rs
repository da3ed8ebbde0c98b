//! Resource paths naming documents in the content tree.
//!
//! A [`ResourcePath`] keeps the raw segments supplied by a caller. Validation
//! always runs against those raw segments; every derived form (cache key,
//! backing-store path, display path) is built from the repaired sequence in
//! which `..` has been collapsed and `.`/empty segments dropped.

use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;

const KEY_SEPARATOR: &str = ":";
const DISPLAY_SEPARATOR: &str = "/";

/// Reasons a resource path is rejected before any storage or cache access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PathError {
    #[error("path `{path}` contains invalid segment `{segment}`")]
    InvalidSegment { path: String, segment: String },
    #[error("path `{path}` climbs out of the content root")]
    EscapesRoot { path: String },
    #[error("path `{path}` does not name anything below the content root")]
    Empty { path: String },
}

/// Ordered identifier segments naming a document, e.g. `["cs1", "intro", "index.hy"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath {
    segments: Vec<String>,
}

impl ResourcePath {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// Split a slash-delimited relative path, e.g. a request URL tail.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(DISPLAY_SEPARATOR))
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Check the raw segments.
    ///
    /// Scanning left to right, ordinary names add one level of depth, `..`
    /// removes one and `.`/empty segments are ignored. The path is rejected as
    /// soon as a segment is not a valid name or the depth would drop to zero,
    /// and it must end strictly below the root.
    pub fn validate(&self) -> Result<(), PathError> {
        let mut depth = 0usize;
        for segment in &self.segments {
            match segment.as_str() {
                "" | "." => {}
                ".." => {
                    if depth <= 1 {
                        return Err(PathError::EscapesRoot {
                            path: self.to_string(),
                        });
                    }
                    depth -= 1;
                }
                name if is_valid_name(name) => depth += 1,
                name => {
                    return Err(PathError::InvalidSegment {
                        path: self.to_string(),
                        segment: name.to_string(),
                    });
                }
            }
        }

        if depth == 0 {
            return Err(PathError::Empty {
                path: self.to_string(),
            });
        }
        Ok(())
    }

    /// Collapse `..` against the nearest preceding segment (dropping it when
    /// there is none) and drop `.`/empty segments.
    pub fn repaired(&self) -> Vec<&str> {
        let mut repaired = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment.as_str() {
                ".." => {
                    repaired.pop();
                }
                "" | "." => {}
                name => repaired.push(name),
            }
        }
        repaired
    }

    /// Namespace shared by every cache entry belonging to this resource.
    pub fn cache_key(&self) -> String {
        self.repaired().join(KEY_SEPARATOR)
    }

    pub fn backing_path(&self, root: &Path) -> PathBuf {
        let mut path = root.to_path_buf();
        path.extend(self.repaired());
        path
    }

    pub fn display_path(&self) -> String {
        self.repaired().join(DISPLAY_SEPARATOR)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join(DISPLAY_SEPARATOR))
    }
}

impl<S: Into<String>> FromIterator<S> for ResourcePath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// `[A-Za-z0-9_-][A-Za-z0-9_.-]*`
fn is_valid_name(segment: &str) -> bool {
    let mut chars = segment.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphanumeric() || first == '_' || first == '-')
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn accepts_plain_document_paths() {
        let path = ResourcePath::new(["cs1", "intro", "index.hy"]);
        assert!(path.validate().is_ok());
        assert_eq!(path.cache_key(), "cs1:intro:index.hy");
        assert_eq!(path.display_path(), "cs1/intro/index.hy");
        assert_eq!(
            path.backing_path(Path::new("/srv/content")),
            PathBuf::from("/srv/content/cs1/intro/index.hy")
        );
    }

    #[test]
    fn ignores_dot_and_empty_segments() {
        let path = ResourcePath::parse("cs1//./index.hy");
        assert!(path.validate().is_ok());
        assert_eq!(path.cache_key(), "cs1:index.hy");
    }

    #[test]
    fn allows_parent_segment_while_depth_stays_positive() {
        let path = ResourcePath::new(["cs1", "intro", "..", "index.hy"]);
        assert!(path.validate().is_ok());
        assert_eq!(path.display_path(), "cs1/index.hy");
    }

    #[test]
    fn rejects_climbing_through_the_root_even_when_repair_succeeds() {
        let path = ResourcePath::new(["a", "..", "..", "b"]);
        assert_eq!(
            path.validate(),
            Err(PathError::EscapesRoot {
                path: "a/../../b".to_string()
            })
        );
        assert_eq!(path.repaired(), vec!["b"]);
    }

    #[test]
    fn rejects_leading_parent_segment() {
        let path = ResourcePath::new(["..", "etc", "passwd"]);
        assert!(matches!(
            path.validate(),
            Err(PathError::EscapesRoot { .. })
        ));
    }

    #[test]
    fn rejects_invalid_segment_after_valid_ones() {
        let path = ResourcePath::new(["cs1", "intro", ".hidden", "x", "y"]);
        assert_eq!(
            path.validate(),
            Err(PathError::InvalidSegment {
                path: "cs1/intro/.hidden/x/y".to_string(),
                segment: ".hidden".to_string(),
            })
        );
    }

    #[test]
    fn rejects_paths_that_name_the_root() {
        assert!(matches!(
            ResourcePath::new(Vec::<String>::new()).validate(),
            Err(PathError::Empty { .. })
        ));
        assert!(matches!(
            ResourcePath::parse("./").validate(),
            Err(PathError::Empty { .. })
        ));
    }

    #[test]
    fn name_charset() {
        assert!(is_valid_name("index.hy"));
        assert!(is_valid_name("-draft_2"));
        assert!(!is_valid_name(".profile"));
        assert!(!is_valid_name("a b"));
        assert!(!is_valid_name("a:b"));
        assert!(!is_valid_name(""));
    }

    fn segment() -> impl Strategy<Value = String> {
        prop_oneof![
            Just("..".to_string()),
            Just(".".to_string()),
            Just(String::new()),
            "[A-Za-z0-9_-][A-Za-z0-9_-]{0,6}",
        ]
    }

    proptest! {
        #[test]
        fn repaired_key_is_stable_and_clean(segments in proptest::collection::vec(segment(), 0..12)) {
            let path = ResourcePath::new(segments);
            let key = path.cache_key();

            let reparsed = ResourcePath::new(path.repaired());
            prop_assert_eq!(reparsed.cache_key(), key.clone());

            if !key.is_empty() {
                for component in key.split(KEY_SEPARATOR) {
                    prop_assert!(!component.is_empty());
                    prop_assert!(component != ".." && component != ".");
                }
            }
        }

        #[test]
        fn valid_paths_never_repair_to_empty(segments in proptest::collection::vec(segment(), 0..12)) {
            let path = ResourcePath::new(segments);
            if path.validate().is_ok() {
                prop_assert!(!path.repaired().is_empty());
            }
        }
    }
}
