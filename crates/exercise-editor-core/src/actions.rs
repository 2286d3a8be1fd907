//! Input intents and keyboard policy.
//!
//! Platform layers translate native events into these types; the applier in
//! [`crate::execute`] decides what each one does to the document.

/// Semantic input types from input events.
///
/// Parsed from the W3C Input Events `inputType` string. Only the kinds the
/// editor distinguishes get their own variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    // === Insertion ===
    /// Insert typed text.
    InsertText,
    /// Insert text from IME composition.
    InsertCompositionText,
    /// Insert replacement text (e.g., spell check correction).
    InsertReplacementText,
    InsertFromPaste,
    InsertFromDrop,
    InsertLineBreak,
    InsertParagraph,

    // === Deletion ===
    DeleteContentBackward,
    DeleteContentForward,
    DeleteWordBackward,
    DeleteWordForward,
    DeleteByCut,
    DeleteContent,

    // === History ===
    HistoryUndo,
    HistoryRedo,

    /// Unrecognized input type.
    Unknown(String),
}

impl InputType {
    /// Parse a W3C `inputType` string.
    pub fn parse(s: &str) -> Self {
        match s {
            "insertText" => Self::InsertText,
            "insertCompositionText" => Self::InsertCompositionText,
            "insertReplacementText" => Self::InsertReplacementText,
            "insertFromPaste" => Self::InsertFromPaste,
            "insertFromDrop" => Self::InsertFromDrop,
            "insertLineBreak" => Self::InsertLineBreak,
            "insertParagraph" => Self::InsertParagraph,
            "deleteContentBackward" => Self::DeleteContentBackward,
            "deleteContentForward" => Self::DeleteContentForward,
            "deleteWordBackward" => Self::DeleteWordBackward,
            "deleteWordForward" => Self::DeleteWordForward,
            "deleteByCut" => Self::DeleteByCut,
            "deleteContent" => Self::DeleteContent,
            "historyUndo" => Self::HistoryUndo,
            "historyRedo" => Self::HistoryRedo,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::InsertText => "insertText",
            Self::InsertCompositionText => "insertCompositionText",
            Self::InsertReplacementText => "insertReplacementText",
            Self::InsertFromPaste => "insertFromPaste",
            Self::InsertFromDrop => "insertFromDrop",
            Self::InsertLineBreak => "insertLineBreak",
            Self::InsertParagraph => "insertParagraph",
            Self::DeleteContentBackward => "deleteContentBackward",
            Self::DeleteContentForward => "deleteContentForward",
            Self::DeleteWordBackward => "deleteWordBackward",
            Self::DeleteWordForward => "deleteWordForward",
            Self::DeleteByCut => "deleteByCut",
            Self::DeleteContent => "deleteContent",
            Self::HistoryUndo => "historyUndo",
            Self::HistoryRedo => "historyRedo",
            Self::Unknown(s) => s,
        }
    }
}

impl std::fmt::Display for InputType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the applier needs from a `beforeinput` event.
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeInputContext {
    pub input_type: InputType,
    pub data: Option<String>,
    pub is_composing: bool,
}

impl BeforeInputContext {
    pub fn new(input_type: &str, data: Option<String>, is_composing: bool) -> Self {
        Self {
            input_type: InputType::parse(input_type),
            data,
            is_composing,
        }
    }

    /// Plain typed text, as the browser reports a keystroke.
    pub fn insert_text(data: impl Into<String>) -> Self {
        Self {
            input_type: InputType::InsertText,
            data: Some(data.into()),
            is_composing: false,
        }
    }
}

/// Result of handling a beforeinput event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeforeInputResult {
    /// Event was handled, prevent default browser behavior.
    Handled,
    /// Let the browser handle it (IME composition).
    PassThrough,
}

impl BeforeInputResult {
    pub fn prevents_default(&self) -> bool {
        matches!(self, Self::Handled)
    }
}

/// Modifier key state for a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Whether this is a shortcut chord. Shift alone does not count.
    pub fn is_shortcut(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

const ARROW_KEYS: [&str; 4] = ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown"];

/// Whether a keydown's default action must be suppressed.
///
/// Named keys (Enter, Backspace, Delete, Tab, ...) would mutate the DOM behind
/// the document's back, so they are blocked. Single characters reach
/// `beforeinput`, arrows move the caret, and shortcut chords stay with the
/// browser.
pub fn should_suppress_key(key: &str, modifiers: Modifiers) -> bool {
    if modifiers.is_shortcut() || ARROW_KEYS.contains(&key) {
        return false;
    }
    let mut chars = key.chars();
    let single = chars.next().is_some() && chars.next().is_none();
    !single
}
