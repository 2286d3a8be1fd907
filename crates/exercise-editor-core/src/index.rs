//! Index from tree paths to rendered node handles.
//!
//! Rebuilt on every render pass from the markup the renderer produced, so it
//! never outlives the tree it was built from. Lookups compare structured
//! [`Path`] values rather than serialized attribute strings.

use std::collections::HashMap;

use crate::path::Path;

/// Mapping from canonical path to a backend node handle (a DOM element in the
/// browser, a markup reference in tests).
#[derive(Debug, Clone)]
pub struct PathIndex<H> {
    entries: Vec<(Path, H)>,
    by_path: HashMap<Path, usize>,
}

impl<H> Default for PathIndex<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            by_path: HashMap::new(),
        }
    }
}

impl<H> PathIndex<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the handle rendered for `path`.
    ///
    /// A repeated path replaces the earlier handle; the renderer never emits
    /// one, so this only matters for hand-built indices.
    pub fn insert(&mut self, path: Path, handle: H) {
        if let Some(&slot) = self.by_path.get(&path) {
            tracing::warn!(%path, "duplicate path in index, replacing handle");
            self.entries[slot].1 = handle;
            return;
        }
        self.by_path.insert(path.clone(), self.entries.len());
        self.entries.push((path, handle));
    }

    pub fn get(&self, path: &Path) -> Option<&H> {
        self.by_path.get(path).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.by_path.clear();
    }

    /// Entries in render order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &H)> {
        self.entries.iter().map(|(p, h)| (p, h))
    }
}

impl<H> FromIterator<(Path, H)> for PathIndex<H> {
    fn from_iter<I: IntoIterator<Item = (Path, H)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (path, handle) in iter {
            index.insert(path, handle);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::sample_exercise;
    use crate::path;
    use crate::render::render_document;

    #[test]
    fn test_index_from_markup() {
        let markup = render_document(&sample_exercise());
        let index: PathIndex<String> = markup
            .tagged_elements()
            .into_iter()
            .map(|(p, el)| (p.clone(), el.tag.to_string()))
            .collect();

        assert_eq!(index.len(), 11);
        assert_eq!(index.get(&path![]).map(String::as_str), Some("div"));
        assert_eq!(index.get(&path!["solutions"]).map(String::as_str), Some("ol"));
        assert_eq!(
            index.get(&path!["solutions", 1, "answer"]).map(String::as_str),
            Some("span")
        );
        assert!(!index.contains(&path!["solutions", 4]));
    }

    #[test]
    fn test_duplicate_replaces() {
        let mut index = PathIndex::new();
        index.insert(path!["title"], 'a');
        index.insert(path!["title"], 'b');
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(&path!["title"]), Some(&'b'));
    }

    #[test]
    fn test_clear() {
        let mut index: PathIndex<u8> = [(path!["title"], 1)].into_iter().collect();
        assert!(!index.is_empty());
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.get(&path!["title"]), None);
    }
}
