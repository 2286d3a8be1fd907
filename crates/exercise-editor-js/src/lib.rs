//! WASM bindings for the exercise editor.
//!
//! Provides an embeddable exercise editor for JavaScript/TypeScript apps.

mod editor;
mod events;
mod types;

pub use editor::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Install the console tracing subscriber.
///
/// Only the first call per page takes effect; later ones keep the existing
/// subscriber and its level.
pub(crate) fn init_tracing(max_level: tracing::Level) {
    #[cfg(target_arch = "wasm32")]
    {
        use tracing::subscriber::set_global_default;
        use tracing_subscriber::Registry;
        use tracing_subscriber::layer::SubscriberExt;

        let wasm_layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(max_level)
                .build(),
        );
        let _ = set_global_default(Registry::default().with(wasm_layer));
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = max_level;
}
