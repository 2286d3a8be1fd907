//! Core editor document trait and implementations.
//!
//! Defines the `ExerciseDocument` trait for abstracting editor state, so the
//! applier and the selection bridge work over any storage strategy while
//! sharing the same editing logic.

use std::sync::Arc;

use crate::execute::{EditOutcome, insert_at_selection};
use crate::lens::{self, Focus, LensError};
use crate::node::Node;
use crate::path::Path;
use crate::types::{Selection, SelectionOrigin, SelectionState};

/// Core trait for editor documents.
///
/// The tree and the selection live in independent slots. Both are replaced
/// wholesale on every change: an edit installs a new root, a selection change
/// installs a new value. A selection is never repaired when the tree under it
/// changes.
pub trait ExerciseDocument {
    // === Required: content ===

    /// The current tree snapshot.
    fn content(&self) -> &Arc<Node>;

    /// Install a new tree snapshot.
    fn set_content(&mut self, content: Arc<Node>);

    // === Required: selection ===

    fn selection(&self) -> Option<&Selection>;

    /// Where the current selection came from.
    fn selection_origin(&self) -> SelectionOrigin;

    /// Overwrite the selection slot unconditionally.
    fn store_selection(&mut self, selection: Option<Selection>, origin: SelectionOrigin);

    // === Provided ===

    /// Replace the selection if it differs from the stored one.
    ///
    /// Returns whether anything changed. An equal value is not stored again,
    /// so re-reading a just-applied selection settles without a further
    /// update.
    fn set_selection(&mut self, selection: Option<Selection>, origin: SelectionOrigin) -> bool {
        if self.selection() == selection.as_ref() {
            return false;
        }
        tracing::trace!(?selection, ?origin, "selection changed");
        self.store_selection(selection, origin);
        true
    }

    fn selection_state(&self) -> SelectionState<'_> {
        SelectionState::of(self.selection())
    }

    /// The selection the platform still has to show, if it changed since the
    /// last projection. `Some(None)` means the native selection must be
    /// cleared.
    ///
    /// Marks it as projected; a second call returns `None` until the next
    /// change.
    fn take_projection(&mut self) -> Option<Option<Selection>> {
        if !self.selection_origin().needs_projection() {
            return None;
        }
        let selection = self.selection().cloned();
        self.store_selection(selection.clone(), SelectionOrigin::Projected);
        Some(selection)
    }

    /// Resolve `path` in the current tree.
    fn resolve(&self, path: &Path) -> Result<Focus<'_>, LensError> {
        lens::get(self.content(), path.keys())
    }

    /// Insert `text` at the caret.
    fn insert_text(&mut self, text: &str) -> EditOutcome {
        insert_at_selection(self, text)
    }

    /// Pretty JSON of `{ "selection": …, "content": … }`.
    fn debug_dump(&self) -> Result<String, serde_json::Error> {
        let dump = serde_json::json!({
            "selection": self.selection(),
            "content": self.content(),
        });
        serde_json::to_string_pretty(&dump)
    }
}

/// Simple field-based implementation of ExerciseDocument.
///
/// Stores content and selection as plain fields.
#[derive(Debug, Clone)]
pub struct PlainEditor {
    content: Arc<Node>,
    selection: Option<Selection>,
    origin: SelectionOrigin,
}

impl PlainEditor {
    pub fn new(content: impl Into<Arc<Node>>) -> Self {
        Self {
            content: content.into(),
            selection: None,
            origin: SelectionOrigin::Projected,
        }
    }

    /// Parse a tree from JSON and start with no selection.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(Node::from_json(json)?))
    }
}

impl Default for PlainEditor {
    fn default() -> Self {
        Self::new(crate::node::sample_exercise())
    }
}

impl ExerciseDocument for PlainEditor {
    fn content(&self) -> &Arc<Node> {
        &self.content
    }

    fn set_content(&mut self, content: Arc<Node>) {
        self.content = content;
    }

    fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    fn selection_origin(&self) -> SelectionOrigin {
        self.origin
    }

    fn store_selection(&mut self, selection: Option<Selection>, origin: SelectionOrigin) {
        self.selection = selection;
        self.origin = origin;
    }
}
