//! Shared-cache key definitions.
//!
//! Every key is namespaced by the repaired resource path:
//!
//! - `file-<key>`: main attribute entry
//! - `file-<key>::<name>`: one long attribute value
//! - `stat-<key>`: stat record

use crate::domain::path::ResourcePath;

const ATTRIBUTE_PREFIX: &str = "file-";
const STAT_PREFIX: &str = "stat-";
const LONG_VALUE_SEPARATOR: &str = "::";

pub fn attribute_key(path: &ResourcePath) -> String {
    format!("{ATTRIBUTE_PREFIX}{}", path.cache_key())
}

pub fn long_value_key(attribute_key: &str, name: &str) -> String {
    format!("{attribute_key}{LONG_VALUE_SEPARATOR}{name}")
}

pub fn stat_key(path: &ResourcePath) -> String {
    format!("{STAT_PREFIX}{}", path.cache_key())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_use_repaired_path() {
        let path = ResourcePath::new(["cs1", ".", "intro", "", "index.hy"]);
        assert_eq!(attribute_key(&path), "file-cs1:intro:index.hy");
        assert_eq!(stat_key(&path), "stat-cs1:intro:index.hy");
    }

    #[test]
    fn long_value_key_extends_main_key() {
        let main = attribute_key(&ResourcePath::new(["cs1", "index.hy"]));
        assert_eq!(long_value_key(&main, "html"), "file-cs1:index.hy::html");
    }

    #[test]
    fn equivalent_paths_share_keys() {
        let direct = ResourcePath::new(["cs1", "index.hy"]);
        let detour = ResourcePath::new(["cs1", "intro", "..", "index.hy"]);
        assert_eq!(attribute_key(&direct), attribute_key(&detour));
        assert_ne!(attribute_key(&direct), stat_key(&direct));
    }
}
