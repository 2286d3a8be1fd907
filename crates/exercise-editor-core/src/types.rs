//! Core editor types: selection and its state machine.
//!
//! These types are framework-agnostic and are shared by the bridge, the edit
//! applier and every platform layer.

use serde::{Deserialize, Serialize};

use crate::path::Path;

/// The editor's selection in document coordinates.
///
/// `offset == None` means the whole node at `path` is selected. `Some(o)` is a
/// caret inside a text leaf, `o` chars from its start (NOT bytes, NOT UTF-16).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Selection {
    /// Select a whole node.
    pub fn node(path: Path) -> Self {
        Self { path, offset: None }
    }

    /// Place a caret inside a text leaf.
    pub fn caret(path: Path, offset: usize) -> Self {
        Self {
            path,
            offset: Some(offset),
        }
    }

    pub fn is_caret(&self) -> bool {
        self.offset.is_some()
    }

    pub fn state(&self) -> SelectionState<'_> {
        match self.offset {
            Some(offset) => SelectionState::TextSelected {
                path: &self.path,
                offset,
            },
            None => SelectionState::NodeSelected { path: &self.path },
        }
    }
}

/// View of the selection state machine.
///
/// `None ⇄ NodeSelected ⇄ TextSelected`. Transitions come from native
/// selection changes; the edit applier only advances the offset inside
/// `TextSelected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionState<'a> {
    None,
    NodeSelected { path: &'a Path },
    TextSelected { path: &'a Path, offset: usize },
}

impl<'a> SelectionState<'a> {
    pub fn of(selection: Option<&'a Selection>) -> Self {
        selection.map_or(SelectionState::None, Selection::state)
    }
}

/// Where the stored selection came from, and whether the platform shows it.
///
/// Every change is projected back onto the platform once: a native change
/// right away, since the surface already matches the tree, an edit-produced
/// one after the re-render. Projection marks it `Projected`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SelectionOrigin {
    /// Read from the native selection, not yet projected back.
    Platform,
    /// Produced by the edit applier, waiting for the re-render.
    Edit,
    /// Already installed as the native selection.
    #[default]
    Projected,
}

impl SelectionOrigin {
    pub fn needs_projection(&self) -> bool {
        !matches!(self, SelectionOrigin::Projected)
    }
}
