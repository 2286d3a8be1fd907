//! Edit application for exercise documents.
//!
//! The applier is authoritative over DOM text: every `beforeinput` outside an
//! IME composition is handled here and its default suppressed, whether or not
//! it changes the tree. Only plain text insertion at a caret edits.

use std::sync::Arc;

use crate::actions::{BeforeInputContext, BeforeInputResult, InputType};
use crate::document::ExerciseDocument;
use crate::lens::{self, LensError};
use crate::path::Path;
use crate::text::char_len;
use crate::types::{Selection, SelectionOrigin};

/// What an input did to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// The text leaf at `path` changed and the caret moved to `offset`.
    Applied { path: Path, offset: usize },
    Ignored(IgnoreReason),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// Why an input left the document untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum IgnoreReason {
    /// The IME owns the DOM until composition ends.
    Composing,
    UnsupportedInput(InputType),
    EmptyPayload,
    NoSelection,
    /// A whole node is selected, not a caret inside text.
    NodeSelected,
    /// The selection no longer resolves to a text leaf.
    Unresolved(LensError),
}

/// Handle a `beforeinput` event.
///
/// Composition passes through untouched; everything else is `Handled`.
pub fn handle_beforeinput<D: ExerciseDocument + ?Sized>(
    doc: &mut D,
    ctx: &BeforeInputContext,
) -> BeforeInputResult {
    match apply_input(doc, ctx) {
        EditOutcome::Ignored(IgnoreReason::Composing) => BeforeInputResult::PassThrough,
        _ => BeforeInputResult::Handled,
    }
}

/// Apply an input intent and report the outcome.
pub fn apply_input<D: ExerciseDocument + ?Sized>(
    doc: &mut D,
    ctx: &BeforeInputContext,
) -> EditOutcome {
    if ctx.is_composing || ctx.input_type == InputType::InsertCompositionText {
        tracing::trace!(input_type = %ctx.input_type, "composition input passes through");
        return EditOutcome::Ignored(IgnoreReason::Composing);
    }

    if ctx.input_type != InputType::InsertText {
        tracing::debug!(input_type = %ctx.input_type, "unsupported input suppressed");
        return EditOutcome::Ignored(IgnoreReason::UnsupportedInput(ctx.input_type.clone()));
    }

    insert_at_selection(doc, ctx.data.as_deref().unwrap_or_default())
}

/// Insert `text` at the caret and advance the caret past it.
pub fn insert_at_selection<D: ExerciseDocument + ?Sized>(doc: &mut D, text: &str) -> EditOutcome {
    let outcome = try_insert(doc, text);
    match &outcome {
        EditOutcome::Applied { path, offset } => {
            tracing::debug!(%path, offset, inserted_len = char_len(text), "inserted text");
        }
        EditOutcome::Ignored(reason) => {
            tracing::debug!(?reason, "insert ignored");
        }
    }
    outcome
}

fn try_insert<D: ExerciseDocument + ?Sized>(doc: &mut D, text: &str) -> EditOutcome {
    if text.is_empty() {
        return EditOutcome::Ignored(IgnoreReason::EmptyPayload);
    }
    let Some(selection) = doc.selection() else {
        return EditOutcome::Ignored(IgnoreReason::NoSelection);
    };
    let Some(offset) = selection.offset else {
        return EditOutcome::Ignored(IgnoreReason::NodeSelected);
    };
    let path = selection.path.clone();

    let (new_root, offset) = match splice(doc.content(), &path, offset, text) {
        Ok(spliced) => spliced,
        Err(e) => return EditOutcome::Ignored(IgnoreReason::Unresolved(e)),
    };

    doc.set_content(new_root);
    doc.set_selection(
        Some(Selection::caret(path.clone(), offset)),
        SelectionOrigin::Edit,
    );
    EditOutcome::Applied { path, offset }
}

/// New root and caret offset after inserting `text` at `offset`.
fn splice(
    root: &Arc<crate::node::Node>,
    path: &Path,
    offset: usize,
    text: &str,
) -> Result<(Arc<crate::node::Node>, usize), LensError> {
    let current = lens::get_text(root, path.keys())?;
    let at = offset.min(char_len(current));
    let new_root = lens::splice_text(root, path.keys(), at, text)?;
    Ok((new_root, at + char_len(text)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::PlainEditor;
    use crate::node::{Node, sample_exercise};
    use crate::path;

    fn editor_at(path: Path, offset: Option<usize>) -> PlainEditor {
        let mut editor = PlainEditor::new(sample_exercise());
        editor.set_selection(Some(Selection { path, offset }), SelectionOrigin::Platform);
        editor
    }

    fn text_at(editor: &PlainEditor, path: &Path) -> String {
        lens::get_text(editor.content(), path.keys())
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_insert_into_answer() {
        let answer = path!["solutions", 0, "answer"];
        let mut editor = editor_at(answer.clone(), Some(4));
        let before = Arc::clone(editor.content());

        let result = handle_beforeinput(&mut editor, &BeforeInputContext::insert_text("X"));

        assert_eq!(result, BeforeInputResult::Handled);
        assert_eq!(text_at(&editor, &answer), "JavaXScript");
        assert_eq!(editor.selection(), Some(&Selection::caret(answer, 5)));
        assert_eq!(editor.selection_origin(), SelectionOrigin::Edit);

        // Untouched siblings keep their identity.
        let (Node::Exercise { title: old_title, solutions: old }, Node::Exercise { title, solutions }) =
            (before.as_ref(), editor.content().as_ref())
        else {
            panic!("root is not an exercise");
        };
        assert!(Arc::ptr_eq(old_title, title));
        for i in 1..4 {
            assert!(Arc::ptr_eq(&old[i], &solutions[i]));
        }
        assert!(!Arc::ptr_eq(&old[0], &solutions[0]));
    }

    #[test]
    fn test_offset_boundaries() {
        let answer = path!["solutions", 1, "answer"];

        let mut editor = editor_at(answer.clone(), Some(0));
        editor.insert_text(">");
        assert_eq!(text_at(&editor, &answer), ">Python");

        let mut editor = editor_at(answer.clone(), Some(6));
        editor.insert_text("!");
        assert_eq!(text_at(&editor, &answer), "Python!");
        assert_eq!(editor.selection().and_then(|s| s.offset), Some(7));
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let answer = path!["solutions", 3, "answer"];
        let mut editor = editor_at(answer.clone(), Some(99));
        let outcome = editor.insert_text("y");
        assert_eq!(
            outcome,
            EditOutcome::Applied {
                path: answer.clone(),
                offset: 5
            }
        );
        assert_eq!(text_at(&editor, &answer), "Rusty");
    }

    #[test]
    fn test_consecutive_inserts_advance() {
        let title = path!["title"];
        let mut editor = editor_at(title.clone(), Some(0));
        for ch in ["a", "b", "c"] {
            handle_beforeinput(&mut editor, &BeforeInputContext::insert_text(ch));
        }
        assert!(text_at(&editor, &title).starts_with("abcWhich"));
        assert_eq!(editor.selection().and_then(|s| s.offset), Some(3));
    }

    #[test]
    fn test_multibyte_offsets_count_chars() {
        let mut editor = PlainEditor::new(Node::exercise("żółw", []));
        editor.set_selection(Some(Selection::caret(path!["title"], 2)), SelectionOrigin::Platform);
        editor.insert_text("🦀");
        assert_eq!(text_at(&editor, &path!["title"]), "żó🦀łw");
        assert_eq!(editor.selection().and_then(|s| s.offset), Some(3));
    }

    #[test]
    fn test_empty_payload_is_noop() {
        let mut editor = editor_at(path!["title"], Some(1));
        let before = Arc::clone(editor.content());
        let ctx = BeforeInputContext::new("insertText", Some(String::new()), false);
        assert_eq!(handle_beforeinput(&mut editor, &ctx), BeforeInputResult::Handled);
        assert_eq!(
            apply_input(&mut editor, &ctx),
            EditOutcome::Ignored(IgnoreReason::EmptyPayload)
        );
        assert!(Arc::ptr_eq(&before, editor.content()));

        let missing = BeforeInputContext::new("insertText", None, false);
        assert_eq!(
            apply_input(&mut editor, &missing),
            EditOutcome::Ignored(IgnoreReason::EmptyPayload)
        );
    }

    #[test]
    fn test_no_selection_is_noop() {
        let mut editor = PlainEditor::new(sample_exercise());
        let result = handle_beforeinput(&mut editor, &BeforeInputContext::insert_text("x"));
        assert_eq!(result, BeforeInputResult::Handled);
        assert_eq!(editor.insert_text("x"), EditOutcome::Ignored(IgnoreReason::NoSelection));
        assert_eq!(editor.selection(), None);
    }

    #[test]
    fn test_node_selection_is_noop() {
        let mut editor = editor_at(path!["solutions", 2], None);
        let before = Arc::clone(editor.content());
        assert_eq!(
            editor.insert_text("x"),
            EditOutcome::Ignored(IgnoreReason::NodeSelected)
        );
        assert!(Arc::ptr_eq(&before, editor.content()));
        assert_eq!(editor.selection_origin(), SelectionOrigin::Platform);
    }

    #[test]
    fn test_other_inputs_suppressed_without_edit() {
        let mut editor = editor_at(path!["title"], Some(3));
        let before = Arc::clone(editor.content());
        for input in ["deleteContentBackward", "insertParagraph", "insertFromPaste", "historyUndo"] {
            let ctx = BeforeInputContext::new(input, Some("x".into()), false);
            assert_eq!(handle_beforeinput(&mut editor, &ctx), BeforeInputResult::Handled);
        }
        assert!(Arc::ptr_eq(&before, editor.content()));
    }

    #[test]
    fn test_composition_passes_through() {
        let mut editor = editor_at(path!["title"], Some(3));
        let before = Arc::clone(editor.content());

        let composing = BeforeInputContext::new("insertText", Some("か".into()), true);
        assert_eq!(handle_beforeinput(&mut editor, &composing), BeforeInputResult::PassThrough);

        let composition = BeforeInputContext::new("insertCompositionText", Some("か".into()), false);
        assert_eq!(
            handle_beforeinput(&mut editor, &composition),
            BeforeInputResult::PassThrough
        );
        assert!(Arc::ptr_eq(&before, editor.content()));
    }

    #[test]
    fn test_stale_selection_is_noop() {
        let mut editor = editor_at(path!["solutions", 7, "answer"], Some(0));
        assert!(matches!(
            editor.insert_text("x"),
            EditOutcome::Ignored(IgnoreReason::Unresolved(LensError::IndexOutOfBounds { .. }))
        ));

        let mut editor = editor_at(path!["solutions", 1], Some(0));
        assert!(matches!(
            editor.insert_text("x"),
            EditOutcome::Ignored(IgnoreReason::Unresolved(LensError::NotText { .. }))
        ));
    }
}
