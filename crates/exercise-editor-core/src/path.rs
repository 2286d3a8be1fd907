//! Paths locating nodes inside an exercise tree.
//!
//! A path is an ordered list of keys from the document root: struct fields
//! (`"title"`, `"solutions"`, `"answer"`) and list indices. Paths are derived
//! from the live tree on every render pass and round-trip through the DOM as
//! the JSON array stored in `data-path`.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Field name of an exercise's title.
pub const TITLE: &str = "title";
/// Field name of an exercise's solution list.
pub const SOLUTIONS: &str = "solutions";
/// Field name of a solution's answer text.
pub const ANSWER: &str = "answer";

/// A single step in a [`Path`].
///
/// Serialized untagged, so a field is a JSON string and an index is a JSON
/// number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathKey {
    Index(usize),
    Field(SmolStr),
}

impl PathKey {
    pub fn field(name: impl Into<SmolStr>) -> Self {
        PathKey::Field(name.into())
    }

    pub fn as_field(&self) -> Option<&str> {
        match self {
            PathKey::Field(name) => Some(name.as_str()),
            PathKey::Index(_) => None,
        }
    }

    pub fn as_index(&self) -> Option<usize> {
        match self {
            PathKey::Index(i) => Some(*i),
            PathKey::Field(_) => None,
        }
    }
}

impl From<usize> for PathKey {
    fn from(i: usize) -> Self {
        PathKey::Index(i)
    }
}

impl From<&str> for PathKey {
    fn from(s: &str) -> Self {
        PathKey::Field(SmolStr::new(s))
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(i) => write!(f, "{i}"),
            PathKey::Field(name) => write!(f, "{name}"),
        }
    }
}

/// Error parsing a serialized path.
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("invalid path attribute {attribute:?}: {source}")]
    InvalidAttribute {
        attribute: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Location of a node from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    keys: Vec<PathKey>,
}

impl Path {
    /// The empty path, addressing the document root.
    pub fn root() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn from_keys(keys: Vec<PathKey>) -> Self {
        Self { keys }
    }

    /// New path extended by one key. The receiver is left unchanged.
    pub fn child(&self, key: impl Into<PathKey>) -> Self {
        let mut keys = Vec::with_capacity(self.keys.len() + 1);
        keys.extend(self.keys.iter().cloned());
        keys.push(key.into());
        Self { keys }
    }

    /// The path with its last key removed, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.keys.split_last()?;
        Some(Self {
            keys: init.to_vec(),
        })
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    /// Canonical serialized form used for the `data-path` attribute.
    pub fn to_attribute(&self) -> String {
        let keys = self
            .keys
            .iter()
            .map(|key| match key {
                PathKey::Index(idx) => serde_json::Value::from(*idx),
                PathKey::Field(name) => serde_json::Value::from(name.as_str()),
            })
            .collect();
        serde_json::Value::Array(keys).to_string()
    }

    /// Parse a `data-path` attribute value.
    pub fn from_attribute(attribute: &str) -> Result<Self, PathError> {
        serde_json::from_str(attribute).map_err(|source| PathError::InvalidAttribute {
            attribute: attribute.to_string(),
            source,
        })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attribute())
    }
}

impl From<Vec<PathKey>> for Path {
    fn from(keys: Vec<PathKey>) -> Self {
        Self { keys }
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathKey;
    type IntoIter = std::slice::Iter<'a, PathKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// Build a [`Path`] from a list of keys.
///
/// ```
/// use exercise_editor_core::path;
/// let p = path!["solutions", 0, "answer"];
/// assert_eq!(p.to_attribute(), r#"["solutions",0,"answer"]"#);
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::Path::from_keys(vec![$($crate::PathKey::from($key)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_format() {
        assert_eq!(Path::root().to_attribute(), "[]");
        assert_eq!(path!["title"].to_attribute(), r#"["title"]"#);
        assert_eq!(
            path!["solutions", 2, "answer"].to_attribute(),
            r#"["solutions",2,"answer"]"#
        );
    }

    #[test]
    fn test_attribute_matches_serde() {
        let p = path!["solutions", 3, "answer"];
        assert_eq!(p.to_attribute(), serde_json::to_string(&p).unwrap());

        let quoted = path!["say \"hi\"", 0];
        assert_eq!(quoted.to_attribute(), r#"["say \"hi\"",0]"#);
        assert_eq!(Path::from_attribute(&quoted.to_attribute()).unwrap(), quoted);
    }

    #[test]
    fn test_parse_attribute() {
        let p = Path::from_attribute(r#"["solutions",0,"answer"]"#).unwrap();
        assert_eq!(p, path!["solutions", 0, "answer"]);
        assert_eq!(p.keys()[1], PathKey::Index(0));
        assert_eq!(Path::from_attribute("[]").unwrap(), Path::root());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Path::from_attribute("solutions.0").is_err());
        assert!(Path::from_attribute(r#"{"a":1}"#).is_err());
        assert!(Path::from_attribute("[-1]").is_err());
        assert!(Path::from_attribute("[true]").is_err());
    }

    #[test]
    fn test_child_and_parent() {
        let root = Path::root();
        let solutions = root.child(SOLUTIONS);
        let first = solutions.child(0);
        assert!(root.is_root());
        assert_eq!(first, path!["solutions", 0]);
        assert_eq!(first.parent(), Some(solutions.clone()));
        assert_eq!(root.parent(), None);
        // Extending never mutates the receiver.
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_field_names_are_escaped() {
        let p = path!["we\"ird"];
        let attr = p.to_attribute();
        assert_eq!(Path::from_attribute(&attr).unwrap(), p);
    }
}
