//! exercise-editor-core: Pure Rust exercise editor logic without framework dependencies.
//!
//! This crate provides:
//! - `Node` - the immutable exercise / solution / text tree
//! - `Path` and the `lens` functions for reading and rebuilding it
//! - `render` - markup with `data-path` / `data-type` tagging, plus `PathIndex`
//! - `bridge` - native selection ↔ `Selection`, generic over `SelectionNode`
//! - `ExerciseDocument` / `PlainEditor` and the beforeinput applier

pub mod actions;
pub mod bridge;
pub mod config;
pub mod document;
pub mod execute;
pub mod index;
pub mod lens;
pub mod node;
pub mod path;
pub mod platform;
pub mod render;
pub mod text;
pub mod types;

pub use actions::{BeforeInputContext, BeforeInputResult, InputType, Modifiers, should_suppress_key};
pub use bridge::{InstalledSelection, SelectionTarget, locate_selection, resolve_anchor, resolve_selection};
pub use config::{ConfigError, EditorConfig, LogLevel};
pub use document::{ExerciseDocument, PlainEditor};
pub use execute::{EditOutcome, IgnoreReason, apply_input, handle_beforeinput, insert_at_selection};
pub use index::PathIndex;
pub use lens::{Focus, LensError};
pub use node::{Node, NodeKind, UnknownKind, sample_exercise};
pub use path::{Path, PathError, PathKey};
pub use platform::{NativeSelection, PlatformError, SelectionNode, SelectionPlatform};
pub use render::{DATA_PATH, DATA_TYPE, Markup, MarkupElement, render, render_document};
pub use smol_str::SmolStr;
pub use types::{Selection, SelectionOrigin, SelectionState};
