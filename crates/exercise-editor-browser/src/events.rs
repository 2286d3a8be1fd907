//! Browser event handling for the exercise editor.
//!
//! Provides conversion from `beforeinput` / `keydown` events to the core input
//! types, and the handlers that run the applier and decide `preventDefault`.

use exercise_editor_core::{
    BeforeInputContext, BeforeInputResult, ExerciseDocument, InputType, Modifiers,
    handle_beforeinput, should_suppress_key,
};
use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;

/// Parse a browser `inputType` string.
pub fn parse_browser_input_type(s: &str) -> InputType {
    InputType::parse(s)
}

/// Get data from a beforeinput event, handling different sources.
pub fn get_data_from_event(event: &web_sys::InputEvent) -> Option<String> {
    if let Some(data) = event.data() {
        if !data.is_empty() {
            return Some(data);
        }
    }

    // For paste/drop, try dataTransfer.
    if let Some(data_transfer) = event.data_transfer() {
        if let Ok(text) = data_transfer.get_data("text/plain") {
            if !text.is_empty() {
                return Some(text);
            }
        }
    }

    None
}

/// Everything the applier needs from a `beforeinput` event.
pub fn context_from_event(event: &web_sys::InputEvent) -> BeforeInputContext {
    BeforeInputContext {
        input_type: parse_browser_input_type(&event.input_type()),
        data: get_data_from_event(event),
        is_composing: event.is_composing(),
    }
}

pub fn modifiers_from_event(event: &web_sys::KeyboardEvent) -> Modifiers {
    Modifiers {
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        shift: event.shift_key(),
        meta: event.meta_key(),
    }
}

/// Run the applier for a `beforeinput` event and suppress the default when
/// the editor handled it.
pub fn handle_beforeinput_event<D: ExerciseDocument + ?Sized>(
    doc: &mut D,
    event: &web_sys::InputEvent,
) -> BeforeInputResult {
    let ctx = context_from_event(event);
    let result = handle_beforeinput(doc, &ctx);
    if result.prevents_default() {
        event.prevent_default();
    }
    tracing::trace!(
        target: "exercise::events",
        input_type = %ctx.input_type,
        ?result,
        "beforeinput handled"
    );
    result
}

/// Suppress the default action of a keydown that would edit the DOM directly.
///
/// Returns whether the default was suppressed.
pub fn handle_keydown_event(event: &web_sys::KeyboardEvent) -> bool {
    let key = event.key();
    let suppress = should_suppress_key(&key, modifiers_from_event(event));
    if suppress {
        tracing::trace!(target: "exercise::events", %key, "keydown suppressed");
        event.prevent_default();
    }
    suppress
}

/// Event subscriptions of a mounted editor.
///
/// `beforeinput` and `keydown` are observed on the editor root,
/// `selectionchange` on the document. Dropping the value unregisters all
/// three.
pub struct EditorListeners {
    _beforeinput: EventListener,
    _keydown: EventListener,
    _selectionchange: EventListener,
}

impl EditorListeners {
    pub fn attach<B, K, S>(
        root: &web_sys::Element,
        document: &web_sys::Document,
        mut on_beforeinput: B,
        mut on_keydown: K,
        mut on_selectionchange: S,
    ) -> Self
    where
        B: FnMut(&web_sys::InputEvent) + 'static,
        K: FnMut(&web_sys::KeyboardEvent) + 'static,
        S: FnMut() + 'static,
    {
        let beforeinput = EventListener::new_with_options(
            root,
            "beforeinput",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::InputEvent>() {
                    on_beforeinput(event);
                }
            },
        );
        let keydown = EventListener::new_with_options(
            root,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                if let Some(event) = event.dyn_ref::<web_sys::KeyboardEvent>() {
                    on_keydown(event);
                }
            },
        );
        let selectionchange =
            EventListener::new(document, "selectionchange", move |_| on_selectionchange());

        Self {
            _beforeinput: beforeinput,
            _keydown: keydown,
            _selectionchange: selectionchange,
        }
    }
}
