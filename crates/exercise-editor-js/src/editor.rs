//! JsEditor - the main editor wrapper for JavaScript.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::Arc;

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use exercise_editor_browser::{
    DomNode, EditorListeners, InstalledSelection, PathIndex, handle_beforeinput_event,
    handle_keydown_event, project_selection, render_into, sync_selection_from_dom,
};
use exercise_editor_core::{
    BeforeInputContext, BeforeInputResult, EditorConfig, ExerciseDocument, Node, PlainEditor,
    PlatformError, handle_beforeinput, sample_exercise,
};

use crate::types::config_from_js;

/// DOM handles of a mounted editor.
pub(crate) struct Mounted {
    pub(crate) root: web_sys::Element,
    pub(crate) debug_panel: Option<web_sys::Element>,
    pub(crate) index: PathIndex<web_sys::Element>,
    /// What the last projection left in the browser selection.
    pub(crate) installed: InstalledSelection<DomNode>,
    pub(crate) on_change: Option<js_sys::Function>,
}

/// Editor state shared between the JS handle and the event listeners.
pub(crate) struct EditorState {
    pub(crate) doc: PlainEditor,
    pub(crate) config: EditorConfig,
    pub(crate) mounted: Option<Mounted>,
}

/// The main editor instance exposed to JavaScript.
///
/// Wraps the core editor with WASM bindings for browser use.
#[wasm_bindgen]
pub struct JsEditor {
    pub(crate) state: Rc<RefCell<EditorState>>,
    listeners: Option<EditorListeners>,
}

#[wasm_bindgen]
impl JsEditor {
    /// Create an editor from a JSON exercise tree.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, config: JsValue) -> Result<JsEditor, JsError> {
        let config = config_from_js(config)?;
        let doc = PlainEditor::from_json(json)
            .map_err(|e| JsError::new(&format!("Invalid exercise JSON: {}", e)))?;
        Ok(Self::with_doc(doc, config))
    }

    /// Create an editor holding the built-in sample exercise.
    pub fn sample(config: JsValue) -> Result<JsEditor, JsError> {
        let config = config_from_js(config)?;
        Ok(Self::with_doc(PlainEditor::new(sample_exercise()), config))
    }

    // === Content ===

    /// Current tree as JSON.
    #[wasm_bindgen(js_name = getContent)]
    pub fn get_content(&self) -> Result<String, JsError> {
        let state = self.state.borrow();
        serde_json::to_string(state.doc.content())
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Replace the tree from JSON. The selection is kept as is.
    #[wasm_bindgen(js_name = setContent)]
    pub fn set_content(&mut self, json: &str) -> Result<(), JsError> {
        let content = Node::from_json(json)
            .map_err(|e| JsError::new(&format!("Invalid exercise JSON: {}", e)))?;
        self.state.borrow_mut().replace_content(content);
        Ok(())
    }

    /// Current selection as JSON, or `undefined` when there is none.
    #[wasm_bindgen(js_name = getSelection)]
    pub fn get_selection(&self) -> Result<Option<String>, JsError> {
        let state = self.state.borrow();
        state
            .doc
            .selection()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    /// Pretty JSON of selection and content.
    #[wasm_bindgen(js_name = debugDump)]
    pub fn debug_dump(&self) -> Result<String, JsError> {
        self.state
            .borrow()
            .doc
            .debug_dump()
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }

    // === Mounting ===

    /// Mount the editor into a container element.
    ///
    /// Creates a contenteditable div inside the container and attaches event
    /// listeners. The onChange callback is called after each edit.
    #[wasm_bindgen]
    pub fn mount(
        &mut self,
        container: &HtmlElement,
        on_change: Option<js_sys::Function>,
    ) -> Result<(), JsError> {
        if self.is_mounted() {
            self.unmount();
        }

        let window = web_sys::window().ok_or_else(|| JsError::new("No window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("No document"))?;

        let (editor_class, show_debug) = {
            let state = self.state.borrow();
            (state.config.editor_class.clone(), state.config.debug_panel)
        };

        let root = document
            .create_element("div")
            .map_err(|e| JsError::new(&format!("Failed to create element: {:?}", e)))?;
        root.set_attribute("contenteditable", "true")
            .map_err(|e| JsError::new(&format!("Failed to set contenteditable: {:?}", e)))?;
        root.set_attribute("class", &editor_class)
            .map_err(|e| JsError::new(&format!("Failed to set class: {:?}", e)))?;
        container
            .append_child(&root)
            .map_err(|e| JsError::new(&format!("Failed to append child: {:?}", e)))?;

        let debug_panel = if show_debug {
            let pre = document
                .create_element("pre")
                .map_err(|e| JsError::new(&format!("Failed to create element: {:?}", e)))?;
            pre.set_attribute("class", &format!("{}-debug", editor_class))
                .map_err(|e| JsError::new(&format!("Failed to set class: {:?}", e)))?;
            container
                .append_child(&pre)
                .map_err(|e| JsError::new(&format!("Failed to append child: {:?}", e)))?;
            Some(pre)
        } else {
            None
        };

        {
            let mut state = self.state.borrow_mut();
            state.mounted = Some(Mounted {
                root: root.clone(),
                debug_panel,
                index: PathIndex::new(),
                installed: InstalledSelection::default(),
                on_change,
            });
            state.render_and_update_dom();
        }

        let weak = Rc::downgrade(&self.state);
        self.listeners = Some(EditorListeners::attach(
            &root,
            &document,
            {
                let weak = weak.clone();
                move |event| {
                    if let Some(Some(callback)) =
                        with_state(&weak, |state| state.on_beforeinput_event(event))
                    {
                        notify_change(&callback);
                    }
                }
            },
            move |event| {
                handle_keydown_event(event);
            },
            move || {
                with_state(&weak, EditorState::sync_selection);
            },
        ));

        tracing::debug!(target: "exercise::editor", "editor mounted");
        Ok(())
    }

    /// Check if the editor is mounted.
    #[wasm_bindgen(js_name = isMounted)]
    pub fn is_mounted(&self) -> bool {
        self.state.borrow().mounted.is_some()
    }

    /// Unmount the editor and clean up.
    #[wasm_bindgen]
    pub fn unmount(&mut self) {
        self.listeners = None;
        if let Some(mounted) = self.state.borrow_mut().mounted.take() {
            mounted.root.remove();
            if let Some(panel) = mounted.debug_panel {
                panel.remove();
            }
            tracing::debug!(target: "exercise::editor", "editor unmounted");
        }
    }
}

impl JsEditor {
    fn with_doc(doc: PlainEditor, config: EditorConfig) -> Self {
        crate::init_tracing(config.max_level());
        Self {
            state: Rc::new(RefCell::new(EditorState {
                doc,
                config,
                mounted: None,
            })),
            listeners: None,
        }
    }
}

/// Run `f` on the shared state if the editor is still alive and not already
/// borrowed.
fn with_state<R>(
    weak: &Weak<RefCell<EditorState>>,
    f: impl FnOnce(&mut EditorState) -> R,
) -> Option<R> {
    let state = weak.upgrade()?;
    let Ok(mut state) = state.try_borrow_mut() else {
        tracing::warn!(target: "exercise::editor", "editor state busy, dropping event");
        return None;
    };
    Some(f(&mut state))
}

/// Call the onChange callback. Must run with the state released, since the
/// callback may call back into the editor.
pub(crate) fn notify_change(callback: &js_sys::Function) {
    if let Err(e) = callback.call0(&JsValue::null()) {
        tracing::warn!(target: "exercise::editor", error = ?e, "onChange callback threw");
    }
}

// Internal methods (not exposed to JS)
impl EditorState {
    /// Run the applier and re-render when the tree changed.
    ///
    /// Returns the onChange callback to invoke once the state is released.
    pub(crate) fn apply_beforeinput(
        &mut self,
        ctx: &BeforeInputContext,
    ) -> (BeforeInputResult, Option<js_sys::Function>) {
        let before = Arc::clone(self.doc.content());
        let result = handle_beforeinput(&mut self.doc, ctx);
        (result, self.after_input(&before))
    }

    fn on_beforeinput_event(&mut self, event: &web_sys::InputEvent) -> Option<js_sys::Function> {
        let before = Arc::clone(self.doc.content());
        handle_beforeinput_event(&mut self.doc, event);
        self.after_input(&before)
    }

    fn after_input(&mut self, before: &Arc<Node>) -> Option<js_sys::Function> {
        if Arc::ptr_eq(before, self.doc.content()) {
            return None;
        }
        self.render_and_update_dom();
        self.mounted.as_ref().and_then(|m| m.on_change.clone())
    }

    /// Store the browser selection. A change is projected straight back,
    /// since the DOM already shows the current tree, and the debug panel
    /// refreshed.
    pub(crate) fn sync_selection(&mut self) {
        let Some(mounted) = self.mounted.as_mut() else {
            return;
        };
        if !sync_selection_from_dom(&mut self.doc, &mut mounted.installed) {
            return;
        }
        if let Err(e) = project_selection(
            &mut self.doc,
            &mounted.index,
            &mounted.root,
            &mut mounted.installed,
        ) {
            tracing::warn!(target: "exercise::editor", error = %e, "selection projection failed");
        }
        self.update_debug_panel();
    }

    /// Render the tree into the editor root, then project a pending selection
    /// change onto the new DOM.
    pub(crate) fn render_and_update_dom(&mut self) {
        if let Err(e) = self.try_render() {
            tracing::warn!(target: "exercise::editor", error = %e, "render failed");
        }
        self.update_debug_panel();
    }

    fn try_render(&mut self) -> Result<(), PlatformError> {
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(());
        };
        mounted.index = render_into(&mounted.root, self.doc.content())?;
        project_selection(
            &mut self.doc,
            &mounted.index,
            &mounted.root,
            &mut mounted.installed,
        )
    }

    fn update_debug_panel(&self) {
        let Some(panel) = self.mounted.as_ref().and_then(|m| m.debug_panel.as_ref()) else {
            return;
        };
        match self.doc.debug_dump() {
            Ok(dump) => panel.set_text_content(Some(&dump)),
            Err(e) => tracing::warn!(target: "exercise::editor", error = %e, "debug dump failed"),
        }
    }

    /// Replace the tree wholesale, as after loading new content.
    pub(crate) fn replace_content(&mut self, content: Node) {
        self.doc.set_content(Arc::new(content));
        self.render_and_update_dom();
    }
}
