//! Spine-structured musical text engine
//!
//! Parses tab-separated, spine-based musical data (the Humdrum layout) into
//! lines and tokens, reconstructs the spine graph across split, merge,
//! exchange, add and terminate manipulators, and derives exact rational
//! timing from rhythm tokens. A thin WASM API exposes the analyzed document
//! to JavaScript.

pub mod diagnostics;
pub mod models;
pub mod parse;
pub mod structure;
pub mod renderers;
pub mod api;

// Re-export commonly used types
pub use diagnostics::{BestEffort, ErrorKind, HumdrumError};
pub use models::*;
pub use structure::{HumdrumFile, Strand, TrackFilter};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A logger may already be installed by the host page.
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Humdrum WASM module initialized");
}
