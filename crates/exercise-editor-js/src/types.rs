//! Types exposed to JavaScript via wasm-bindgen.

use exercise_editor_core::{BeforeInputResult, EditorConfig};
use wasm_bindgen::prelude::*;

/// Result of handling an event.
#[wasm_bindgen]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was handled, call preventDefault.
    Handled,
    /// Event should pass through to browser.
    PassThrough,
}

impl From<BeforeInputResult> for EventResult {
    fn from(r: BeforeInputResult) -> Self {
        match r {
            BeforeInputResult::Handled => EventResult::Handled,
            BeforeInputResult::PassThrough => EventResult::PassThrough,
        }
    }
}

impl From<bool> for EventResult {
    fn from(suppressed: bool) -> Self {
        if suppressed {
            EventResult::Handled
        } else {
            EventResult::PassThrough
        }
    }
}

/// Read an optional JS config object. `undefined` and `null` give defaults.
pub fn config_from_js(value: JsValue) -> Result<EditorConfig, JsError> {
    if value.is_undefined() || value.is_null() {
        return Ok(EditorConfig::default());
    }
    let config: EditorConfig = serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsError::new(&format!("Invalid config: {}", e)))?;
    config
        .validate()
        .map_err(|e| JsError::new(&e.to_string()))
}
