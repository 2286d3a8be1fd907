//! Platform abstraction traits for selection handling.
//!
//! These traits define the interface between the editor logic and
//! platform-specific implementations (browser DOM, tests over rendered
//! markup). The same bridge logic then works unchanged on every platform.

use crate::types::Selection;

/// Error type for platform operations.
#[derive(Debug, Clone)]
pub struct PlatformError(pub String);

impl std::fmt::Display for PlatformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PlatformError {}

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// A node of the rendered surface, as seen from a native selection anchor.
///
/// Implemented for DOM nodes in the browser layer. Only what the forward
/// bridge needs to walk from an anchor to its path-tagged container is
/// required.
pub trait SelectionNode: Sized + Clone {
    /// The parent node, or `None` at the root.
    fn parent(&self) -> Option<Self>;

    /// Whether this is an element (as opposed to a text node).
    fn is_element(&self) -> bool;

    /// An attribute value; always `None` for non-elements.
    fn attribute(&self, name: &str) -> Option<String>;

    /// The node's text: character data for text nodes, concatenated
    /// descendant text for elements.
    fn text(&self) -> String;

    /// Concatenated text of the siblings before this node.
    fn preceding_sibling_text(&self) -> String;

    /// Concatenated text of the first `child_index` children.
    fn text_before_child(&self, child_index: usize) -> String;
}

/// Snapshot of a native selection.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeSelection<N> {
    pub anchor: Option<N>,
    /// Anchor offset as reported by the platform: UTF-16 units inside a text
    /// node, a child index inside an element.
    pub anchor_offset: usize,
    pub is_collapsed: bool,
}

/// Platform-specific selection synchronization, both directions.
pub trait SelectionPlatform {
    /// Read the current native selection as a document selection.
    ///
    /// `None` when there is no selection, it spans a range, or it is outside
    /// every path-tagged element.
    fn read_selection(&self) -> Option<Selection>;

    /// Replace the native selection with `selection`.
    ///
    /// `None` clears the native selection. A path that matches no rendered
    /// element leaves the native selection cleared.
    fn apply_selection(&self, selection: Option<&Selection>) -> Result<(), PlatformError>;
}
