//! Event handlers exposed to JavaScript.
//!
//! For hosts that route DOM events themselves instead of relying on the
//! listeners `mount` attaches. Each handler updates state and returns whether
//! to preventDefault.

use wasm_bindgen::prelude::*;

use exercise_editor_core::{BeforeInputContext, Modifiers, should_suppress_key};

use crate::editor::{JsEditor, notify_change};
use crate::types::EventResult;

#[wasm_bindgen]
impl JsEditor {
    // === Event handlers ===

    /// Handle beforeinput event.
    ///
    /// Returns whether to preventDefault.
    #[wasm_bindgen(js_name = handleBeforeInput)]
    pub fn handle_before_input(
        &mut self,
        input_type: &str,
        data: Option<String>,
        is_composing: bool,
    ) -> EventResult {
        let ctx = BeforeInputContext::new(input_type, data, is_composing);
        let (result, on_change) = self.state.borrow_mut().apply_beforeinput(&ctx);
        if let Some(callback) = on_change {
            notify_change(&callback);
        }
        result.into()
    }

    /// Handle keydown event.
    ///
    /// Returns whether to preventDefault.
    #[wasm_bindgen(js_name = handleKeydown)]
    pub fn handle_keydown(&self, key: &str, ctrl: bool, alt: bool, meta: bool) -> EventResult {
        let modifiers = Modifiers {
            ctrl,
            alt,
            shift: false,
            meta,
        };
        should_suppress_key(key, modifiers).into()
    }

    /// Sync selection from the DOM.
    ///
    /// Call this after click, select, or other events that change selection.
    #[wasm_bindgen(js_name = syncSelection)]
    pub fn sync_selection(&mut self) {
        self.state.borrow_mut().sync_selection();
    }
}
