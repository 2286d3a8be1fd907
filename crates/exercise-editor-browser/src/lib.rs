//! Browser DOM layer for the exercise editor.
//!
//! This crate provides DOM construction, selection bridging and browser event
//! handling, generic over any `ExerciseDocument` implementation. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom_sync`: markup → DOM, and DOM selection → document selection
//! - `cursor`: document selection → DOM selection, after every change
//! - `events`: beforeinput and keydown handlers
//!
//! # Re-exports
//!
//! This crate re-exports `exercise-editor-core` for convenience, so consumers
//! only need to depend on `exercise-editor-browser`.

// Re-export core crate
pub use exercise_editor_core;
pub use exercise_editor_core::*;

pub mod cursor;
pub mod dom_sync;
pub mod events;

pub use cursor::{BrowserSelection, apply_selection_to_dom, project_selection, query_path};
pub use dom_sync::{
    DomNode, build_node, read_native_selection, render_into, selection_from_dom,
    sync_selection_from_dom,
};
pub use events::{
    EditorListeners, context_from_event, get_data_from_event, handle_beforeinput_event,
    handle_keydown_event, modifiers_from_event, parse_browser_input_type,
};
