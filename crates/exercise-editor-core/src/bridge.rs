//! Selection bridge between native selections and document coordinates.
//!
//! Forward: walk up from the anchor of a collapsed native selection to the
//! nearest element carrying `data-path`, parse it, and record a text offset if
//! that element is a text leaf. Reverse: find the rendered handle for a stored
//! selection through the [`PathIndex`].

use crate::index::PathIndex;
use crate::node::NodeKind;
use crate::path::Path;
use crate::platform::{NativeSelection, SelectionNode};
use crate::render::{DATA_PATH, DATA_TYPE};
use crate::text::{char_len, utf16_len, utf16_to_char_offset};
use crate::types::Selection;

/// Resolve a native selection to a document selection.
pub fn resolve_selection<N: SelectionNode>(native: Option<&NativeSelection<N>>) -> Option<Selection> {
    let native = native?;
    if !native.is_collapsed {
        tracing::trace!("resolve_selection: ranged selection, clearing");
        return None;
    }
    let anchor = native.anchor.as_ref()?;
    resolve_anchor(anchor, native.anchor_offset)
}

/// Resolve a collapsed selection anchored at `anchor` / `anchor_offset`.
pub fn resolve_anchor<N: SelectionNode>(anchor: &N, anchor_offset: usize) -> Option<Selection> {
    let (container, path_attr, walked) = find_tagged_ancestor(anchor)?;

    let path = match Path::from_attribute(&path_attr) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!(error = %e, "resolve_selection: unparseable data-path");
            return None;
        }
    };

    let kind = container
        .attribute(DATA_TYPE)
        .and_then(|value| value.parse::<NodeKind>().ok());
    if kind != Some(NodeKind::Text) {
        tracing::trace!(%path, "resolve_selection: node selected");
        return Some(Selection::node(path));
    }

    let offset = if anchor.is_element() {
        // Element anchors report a child index, not a text position.
        char_len(&anchor.text_before_child(anchor_offset))
    } else {
        let prefix = anchor.preceding_sibling_text();
        let mut text = prefix.clone();
        text.push_str(&anchor.text());
        utf16_to_char_offset(&text, utf16_len(&prefix) + anchor_offset)
    };

    tracing::trace!(%path, offset, walked, "resolve_selection: text selected");
    Some(Selection::caret(path, offset))
}

/// Nearest element at or above `node` carrying `data-path`, its attribute
/// value, and how many steps up it was.
fn find_tagged_ancestor<N: SelectionNode>(node: &N) -> Option<(N, String, usize)> {
    let mut current = node.clone();
    let mut walked = 0;
    loop {
        if current.is_element() {
            if let Some(attr) = current.attribute(DATA_PATH) {
                return Some((current, attr, walked));
            }
        }
        current = current.parent()?;
        walked += 1;
    }
}

/// Where a stored selection lands on the rendered surface.
#[derive(Debug, PartialEq, Eq)]
pub enum SelectionTarget<'a, H> {
    /// Select the whole element.
    Node(&'a H),
    /// Collapsed caret `offset` chars into the element's text.
    Caret { handle: &'a H, offset: usize },
}

impl<'a, H> SelectionTarget<'a, H> {
    pub fn handle(&self) -> &'a H {
        match self {
            SelectionTarget::Node(handle) => handle,
            SelectionTarget::Caret { handle, .. } => handle,
        }
    }
}

/// Find the rendered handle for a stored selection.
pub fn locate_selection<'a, H>(
    selection: &Selection,
    index: &'a PathIndex<H>,
) -> Option<SelectionTarget<'a, H>> {
    let Some(handle) = index.get(&selection.path) else {
        tracing::debug!(path = %selection.path, "locate_selection: path not rendered");
        return None;
    };
    Some(match selection.offset {
        Some(offset) => SelectionTarget::Caret { handle, offset },
        None => SelectionTarget::Node(handle),
    })
}

/// The native selection a projection installed.
///
/// Installing a node range makes the platform report a ranged selection,
/// which the forward direction would read as "no selection". Change
/// notifications that still report exactly the installed selection are
/// recognized here and skipped.
#[derive(Debug, Clone)]
pub struct InstalledSelection<N> {
    installed: Option<Option<NativeSelection<N>>>,
}

impl<N> Default for InstalledSelection<N> {
    fn default() -> Self {
        Self { installed: None }
    }
}

impl<N: PartialEq> InstalledSelection<N> {
    /// Remember what the platform reports right after a projection.
    pub fn record(&mut self, native: Option<NativeSelection<N>>) {
        self.installed = Some(native);
    }

    /// Whether `native` is still the installed selection. Anything else
    /// forgets the record.
    pub fn is_echo(&mut self, native: Option<&NativeSelection<N>>) -> bool {
        match &self.installed {
            Some(installed) if installed.as_ref() == native => true,
            _ => {
                self.installed = None;
                false
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::fake::{FakeDom, FakeNode};
    use super::*;
    use crate::node::{Node, sample_exercise};
    use crate::path;
    use crate::render::render_document;

    fn sample_dom() -> FakeDom {
        FakeDom::from_markup(&render_document(&sample_exercise()))
    }

    fn tagged(dom: &FakeDom, path: &Path) -> FakeNode {
        dom.find(DATA_PATH, &path.to_attribute())
            .unwrap_or_else(|| panic!("no element for {path}"))
    }

    fn collapsed(anchor: FakeNode, anchor_offset: usize) -> NativeSelection<FakeNode> {
        NativeSelection {
            anchor: Some(anchor),
            anchor_offset,
            is_collapsed: true,
        }
    }

    fn fake_index(dom: &FakeDom) -> PathIndex<FakeNode> {
        dom.elements()
            .into_iter()
            .filter_map(|el| {
                let path = Path::from_attribute(&el.attribute(DATA_PATH)?).ok()?;
                Some((path, el))
            })
            .collect()
    }

    #[test]
    fn test_no_selection() {
        assert_eq!(resolve_selection::<FakeNode>(None), None);
        let empty = NativeSelection::<FakeNode> {
            anchor: None,
            anchor_offset: 0,
            is_collapsed: true,
        };
        assert_eq!(resolve_selection(Some(&empty)), None);
    }

    #[test]
    fn test_ranged_selection_clears() {
        let dom = sample_dom();
        let text = tagged(&dom, &path!["title"]).first_child().unwrap();
        let ranged = NativeSelection {
            anchor: Some(text),
            anchor_offset: 2,
            is_collapsed: false,
        };
        assert_eq!(resolve_selection(Some(&ranged)), None);
    }

    #[test]
    fn test_text_anchor_records_offset() {
        let dom = sample_dom();
        let span = tagged(&dom, &path!["solutions", 0, "answer"]);
        let text = span.first_child().unwrap();
        assert!(!text.is_element());

        let selection = resolve_selection(Some(&collapsed(text, 4))).unwrap();
        assert_eq!(selection, Selection::caret(path!["solutions", 0, "answer"], 4));
    }

    #[test]
    fn test_list_item_anchor_selects_node() {
        let dom = sample_dom();
        let li = tagged(&dom, &path!["solutions", 2]);
        assert_eq!(li.tag(), Some("li"));

        let selection = resolve_selection(Some(&collapsed(li, 0))).unwrap();
        assert_eq!(selection.path, path!["solutions", 2]);
        assert_eq!(selection.offset, None);
    }

    #[test]
    fn test_untagged_heading_walks_to_exercise() {
        let dom = sample_dom();
        let h2 = dom.find_tag("h2");
        let selection = resolve_selection(Some(&collapsed(h2, 0))).unwrap();
        assert_eq!(selection, Selection::node(Path::root()));
    }

    #[test]
    fn test_span_anchor_uses_child_index() {
        let dom = sample_dom();
        let span = tagged(&dom, &path!["title"]);
        let at_start = resolve_selection(Some(&collapsed(span.clone(), 0))).unwrap();
        assert_eq!(at_start.offset, Some(0));
        let at_end = resolve_selection(Some(&collapsed(span, 1))).unwrap();
        assert_eq!(at_end.offset, Some(char_len(
            "Which of the following are programming languages?"
        )));
    }

    #[test]
    fn test_outside_tagged_elements_clears() {
        // A detached text node has no tagged ancestor.
        let dom = FakeDom::from_markup(&crate::render::Markup::Text("loose".into()));
        assert_eq!(resolve_selection(Some(&collapsed(dom.root(), 1))), None);
    }

    #[test]
    fn test_malformed_path_clears() {
        use crate::render::{Markup, MarkupElement};
        let broken = Markup::Element(MarkupElement {
            tag: "span".into(),
            attributes: vec![(DATA_PATH.into(), "not json".into())],
            children: vec![Markup::Text("x".into())],
            path: None,
            kind: None,
        });
        let dom = FakeDom::from_markup(&broken);
        let text = dom.root().first_child().unwrap();
        assert_eq!(resolve_selection(Some(&collapsed(text, 0))), None);
    }

    #[test]
    fn test_utf16_anchor_offset() {
        let root = Node::exercise("🦀 crab", []);
        let dom = FakeDom::from_markup(&render_document(&root));
        let text = tagged(&dom, &path!["title"]).first_child().unwrap();
        // After the crab (2 UTF-16 units) and the space.
        let selection = resolve_selection(Some(&collapsed(text, 3))).unwrap();
        assert_eq!(selection.offset, Some(2));
    }

    #[test]
    fn test_locate_selection() {
        let dom = sample_dom();
        let index = fake_index(&dom);

        let caret = Selection::caret(path!["solutions", 1, "answer"], 2);
        match locate_selection(&caret, &index) {
            Some(SelectionTarget::Caret { handle, offset }) => {
                assert_eq!(handle.text(), "Python");
                assert_eq!(offset, 2);
            }
            other => panic!("unexpected {other:?}"),
        }

        let node = Selection::node(path!["solutions", 3]);
        let target = locate_selection(&node, &index).unwrap();
        assert!(matches!(target, SelectionTarget::Node(_)));
        assert_eq!(target.handle().tag(), Some("li"));

        let stale = Selection::node(path!["solutions", 9]);
        assert!(locate_selection(&stale, &index).is_none());
    }

    #[test]
    fn test_round_trip_every_text_position() {
        let root = Arc::new(sample_exercise());
        let dom = FakeDom::from_markup(&render_document(&root));
        let index = fake_index(&dom);

        for (path, element) in index.iter() {
            if element.attribute(DATA_TYPE).as_deref() != Some("text") {
                let back = resolve_selection(Some(&collapsed(element.clone(), 0))).unwrap();
                assert_eq!(back, Selection::node(path.clone()));
                continue;
            }
            let len = char_len(&element.text());
            for offset in 0..=len {
                let stored = Selection::caret(path.clone(), offset);
                let Some(SelectionTarget::Caret { handle, offset: o }) =
                    locate_selection(&stored, &index)
                else {
                    panic!("no caret target for {path}");
                };
                // Reverse places the caret in the first child; forward reads it back.
                let text_node = handle.first_child().unwrap();
                let utf16 = crate::text::char_to_utf16_offset(&handle.text(), o);
                let back = resolve_selection(Some(&collapsed(text_node, utf16))).unwrap();
                assert_eq!(back, stored);
            }
        }
    }

    #[test]
    fn test_installed_node_range_is_echo() {
        let dom = sample_dom();
        let li = tagged(&dom, &path!["solutions", 2]);
        let stored = resolve_selection(Some(&collapsed(li.clone(), 0))).unwrap();
        assert_eq!(stored, Selection::node(path!["solutions", 2]));

        // Selecting the <li> as a node range anchors on the <ol> before it.
        let node_range = NativeSelection {
            anchor: li.parent(),
            anchor_offset: 2,
            is_collapsed: false,
        };
        assert_eq!(resolve_selection(Some(&node_range)), None);

        let mut installed = InstalledSelection::default();
        installed.record(Some(node_range.clone()));
        assert!(installed.is_echo(Some(&node_range)));
        assert!(installed.is_echo(Some(&node_range)));

        // A real change forgets the record.
        let text = tagged(&dom, &path!["title"]).first_child().unwrap();
        assert!(!installed.is_echo(Some(&collapsed(text, 1))));
        assert!(!installed.is_echo(Some(&node_range)));
    }

    #[test]
    fn test_echo_requires_a_record() {
        let mut installed = InstalledSelection::<FakeNode>::default();
        assert!(!installed.is_echo(None));
        installed.record(None);
        assert!(installed.is_echo(None));
    }

    impl FakeDom {
        fn find_tag(&self, tag: &str) -> FakeNode {
            self.elements()
                .into_iter()
                .find(|n| n.tag() == Some(tag))
                .unwrap()
        }
    }
}

#[cfg(test)]
mod proptests {
    use std::sync::Arc;

    use proptest::prelude::*;

    use super::fake::FakeDom;
    use super::*;
    use crate::node::Node;
    use crate::render::render_document;
    use crate::text::char_to_utf16_offset;

    proptest! {
        #[test]
        fn forward_after_reverse_is_identity(
            title in "(🦀|\\PC{0,6})",
            answers in prop::collection::vec(("(𝄞a|\\PC{0,6})", any::<bool>()), 0..5),
        ) {
            let root = Arc::new(Node::exercise(
                title,
                answers.into_iter().map(|(a, c)| Node::solution(a, c)),
            ));
            let dom = FakeDom::from_markup(&render_document(&root));
            let index: PathIndex<_> = dom
                .elements()
                .into_iter()
                .filter_map(|el| {
                    let path = Path::from_attribute(&el.attribute(DATA_PATH)?).ok()?;
                    Some((path, el))
                })
                .collect();

            for (path, element) in index.iter() {
                if element.attribute(DATA_TYPE).as_deref() != Some(NodeKind::Text.as_str()) {
                    let native = NativeSelection {
                        anchor: Some(element.clone()),
                        anchor_offset: 0,
                        is_collapsed: true,
                    };
                    prop_assert_eq!(resolve_selection(Some(&native)), Some(Selection::node(path.clone())));
                    continue;
                }

                let text = element.text();
                for offset in 0..=char_len(&text) {
                    let stored = Selection::caret(path.clone(), offset);
                    let Some(SelectionTarget::Caret { handle, offset }) = locate_selection(&stored, &index) else {
                        return Err(TestCaseError::fail(format!("no caret target for {path}")));
                    };
                    let native = NativeSelection {
                        anchor: handle.first_child(),
                        anchor_offset: char_to_utf16_offset(&text, offset),
                        is_collapsed: true,
                    };
                    prop_assert_eq!(resolve_selection(Some(&native)), Some(stored));
                }
            }
        }
    }
}
