//! Browser implementation of selection platform operations.
//!
//! Uses the DOM Selection API to project a stored [`Selection`] back onto the
//! rendered elements.

use exercise_editor_core::text::char_to_utf16_offset;
use exercise_editor_core::{
    DATA_PATH, ExerciseDocument, InstalledSelection, Path, PathIndex, PlatformError, Selection,
    SelectionPlatform, SelectionTarget, locate_selection,
};

use crate::dom_sync::{DomNode, read_native_selection, selection_from_dom};

/// Browser-based selection platform.
///
/// Holds the editor root and the path index from the latest render pass.
pub struct BrowserSelection<'a> {
    root: &'a web_sys::Element,
    index: &'a PathIndex<web_sys::Element>,
}

impl<'a> BrowserSelection<'a> {
    pub fn new(root: &'a web_sys::Element, index: &'a PathIndex<web_sys::Element>) -> Self {
        Self { root, index }
    }
}

impl SelectionPlatform for BrowserSelection<'_> {
    fn read_selection(&self) -> Option<Selection> {
        selection_from_dom()
    }

    fn apply_selection(&self, selection: Option<&Selection>) -> Result<(), PlatformError> {
        apply_selection_to_dom(selection, self.index, self.root)
    }
}

/// Show the document's pending selection change on the DOM, if any.
///
/// Must run against DOM rendered from the current tree. What the browser
/// reports afterwards is recorded in `installed`, so the resulting
/// `selectionchange` is not read back as a new selection.
pub fn project_selection<D: ExerciseDocument + ?Sized>(
    doc: &mut D,
    index: &PathIndex<web_sys::Element>,
    root: &web_sys::Element,
    installed: &mut InstalledSelection<DomNode>,
) -> Result<(), PlatformError> {
    let Some(selection) = doc.take_projection() else {
        return Ok(());
    };
    apply_selection_to_dom(selection.as_ref(), index, root)?;
    installed.record(read_native_selection());
    Ok(())
}

/// Replace the browser selection with `selection`.
///
/// All native ranges are removed first. Element lookup goes through the path
/// index, then an attribute query under `root`; a path with no element
/// leaves the browser selection empty.
pub fn apply_selection_to_dom(
    selection: Option<&Selection>,
    index: &PathIndex<web_sys::Element>,
    root: &web_sys::Element,
) -> Result<(), PlatformError> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;
    let native = window
        .get_selection()
        .map_err(|e| format!("get_selection failed: {:?}", e))?
        .ok_or("no selection object")?;

    native
        .remove_all_ranges()
        .map_err(|e| format!("remove_all_ranges failed: {:?}", e))?;

    let Some(selection) = selection else {
        return Ok(());
    };

    let (element, offset) = match locate_selection(selection, index) {
        Some(SelectionTarget::Node(el)) => (el.clone(), None),
        Some(SelectionTarget::Caret { handle, offset }) => (handle.clone(), Some(offset)),
        None => match query_path(root, &selection.path)? {
            Some(el) => (el, selection.offset),
            None => {
                tracing::debug!(
                    target: "exercise::cursor",
                    path = %selection.path,
                    "apply_selection_to_dom: no element for path"
                );
                return Ok(());
            }
        },
    };

    let range = document
        .create_range()
        .map_err(|e| format!("create_range failed: {:?}", e))?;

    match offset {
        None => {
            range
                .select_node(&element)
                .map_err(|e| format!("select_node failed: {:?}", e))?;
        }
        Some(offset) => match element.first_child() {
            Some(child) => {
                let text = child.text_content().unwrap_or_default();
                let utf16 = char_to_utf16_offset(&text, offset);
                range
                    .set_start(&child, utf16 as u32)
                    .map_err(|e| format!("set_start failed: {:?}", e))?;
                range.collapse_with_to_start(true);
            }
            None => {
                range
                    .set_start(&element, 0)
                    .map_err(|e| format!("set_start failed: {:?}", e))?;
                range.collapse_with_to_start(true);
            }
        },
    }

    tracing::trace!(
        target: "exercise::cursor",
        path = %selection.path,
        offset = ?offset,
        "apply_selection_to_dom: installing range"
    );

    native
        .add_range(&range)
        .map_err(|e| format!("add_range failed: {:?}", e))?;
    Ok(())
}

/// The element under `root` whose `data-path` is exactly `path`.
pub fn query_path(
    root: &web_sys::Element,
    path: &Path,
) -> Result<Option<web_sys::Element>, PlatformError> {
    let selector = format!("[{}='{}']", DATA_PATH, escape_attribute_value(&path.to_attribute()));
    let found = root
        .query_selector(&selector)
        .map_err(|e| format!("query_selector({}) failed: {:?}", selector, e))?;
    // The root itself can carry the path, and querySelector only searches below it.
    if found.is_none() && root.get_attribute(DATA_PATH).as_deref() == Some(&path.to_attribute()) {
        return Ok(Some(root.clone()));
    }
    Ok(found)
}

/// Escape a value for a single-quoted CSS attribute selector.
fn escape_attribute_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '\'') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
