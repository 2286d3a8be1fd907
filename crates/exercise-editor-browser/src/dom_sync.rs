//! DOM synchronization for the exercise editor.
//!
//! Builds the DOM from rendered markup, and reads the browser selection back
//! into the document model through the core bridge.

use exercise_editor_core::{
    ExerciseDocument, InstalledSelection, Markup, NativeSelection, Node, PathIndex, PlatformError, Selection,
    SelectionNode, SelectionOrigin, render_document, resolve_selection,
};
use wasm_bindgen::JsCast;

/// A DOM node seen by the selection bridge.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode(pub web_sys::Node);

impl From<web_sys::Node> for DomNode {
    fn from(node: web_sys::Node) -> Self {
        Self(node)
    }
}

impl DomNode {
    fn text_of(node: &web_sys::Node) -> String {
        node.text_content().unwrap_or_default()
    }
}

impl SelectionNode for DomNode {
    fn parent(&self) -> Option<Self> {
        self.0.parent_node().map(DomNode)
    }

    fn is_element(&self) -> bool {
        self.0.node_type() == web_sys::Node::ELEMENT_NODE
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0
            .dyn_ref::<web_sys::Element>()
            .and_then(|el| el.get_attribute(name))
    }

    fn text(&self) -> String {
        Self::text_of(&self.0)
    }

    fn preceding_sibling_text(&self) -> String {
        let mut parts = Vec::new();
        let mut sibling = self.0.previous_sibling();
        while let Some(node) = sibling {
            parts.push(Self::text_of(&node));
            sibling = node.previous_sibling();
        }
        parts.into_iter().rev().collect()
    }

    fn text_before_child(&self, child_index: usize) -> String {
        let children = self.0.child_nodes();
        (0..child_index.min(children.length() as usize))
            .filter_map(|i| children.item(i as u32))
            .map(|child| Self::text_of(&child))
            .collect()
    }
}

/// Snapshot the browser's current selection.
pub fn read_native_selection() -> Option<NativeSelection<DomNode>> {
    let window = web_sys::window()?;
    let selection = window.get_selection().ok()??;
    if selection.range_count() == 0 {
        return None;
    }

    let anchor = selection.anchor_node().map(DomNode);
    let anchor_offset = selection.anchor_offset() as usize;

    tracing::trace!(
        target: "exercise::dom_sync",
        anchor_node_name = ?anchor.as_ref().map(|n| n.0.node_name()),
        anchor_offset,
        is_collapsed = selection.is_collapsed(),
        "read_native_selection: browser selection state"
    );

    Some(NativeSelection {
        anchor,
        anchor_offset,
        is_collapsed: selection.is_collapsed(),
    })
}

/// Resolve the browser selection to document coordinates.
pub fn selection_from_dom() -> Option<Selection> {
    resolve_selection(read_native_selection().as_ref())
}

/// Store the browser selection in `doc` with origin `Platform`.
///
/// A notification that only reports the selection a projection installed is
/// skipped. Returns whether the stored selection changed.
pub fn sync_selection_from_dom<D: ExerciseDocument + ?Sized>(
    doc: &mut D,
    installed: &mut InstalledSelection<DomNode>,
) -> bool {
    let native = read_native_selection();
    if installed.is_echo(native.as_ref()) {
        tracing::trace!(target: "exercise::dom_sync", "selectionchange from projection, skipping");
        return false;
    }
    doc.set_selection(resolve_selection(native.as_ref()), SelectionOrigin::Platform)
}

/// Replace the children of `root` with the rendered `content`.
///
/// Returns the path index for the freshly built elements.
pub fn render_into(
    root: &web_sys::Element,
    content: &Node,
) -> Result<PathIndex<web_sys::Element>, PlatformError> {
    let document = root.owner_document().ok_or("root has no owner document")?;
    let markup = render_document(content);

    let mut index = PathIndex::new();
    let built = build_node(&document, &markup, &mut index)?;

    root.set_text_content(None);
    root.append_child(&built)
        .map_err(|e| format!("append_child failed: {:?}", e))?;

    tracing::trace!(
        target: "exercise::dom_sync",
        tagged = index.len(),
        "render_into: rebuilt editor DOM"
    );
    Ok(index)
}

/// Build a DOM subtree from markup, recording tagged elements in `index`.
pub fn build_node(
    document: &web_sys::Document,
    markup: &Markup,
    index: &mut PathIndex<web_sys::Element>,
) -> Result<web_sys::Node, PlatformError> {
    match markup {
        Markup::Text(text) => Ok(document.create_text_node(text).into()),
        Markup::Element(el) => {
            let element = document
                .create_element(&el.tag)
                .map_err(|e| format!("create_element({}) failed: {:?}", el.tag, e))?;
            for (name, value) in &el.attributes {
                element
                    .set_attribute(name, value)
                    .map_err(|e| format!("set_attribute({}) failed: {:?}", name, e))?;
            }
            if let Some(path) = &el.path {
                index.insert(path.clone(), element.clone());
            }
            for child in &el.children {
                let child = build_node(document, child, index)?;
                element
                    .append_child(&child)
                    .map_err(|e| format!("append_child failed: {:?}", e))?;
            }
            Ok(element.into())
        }
    }
}
