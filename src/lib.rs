//! Score transposition WASM module
//!
//! Transposes a score document by key or by interval, keeps staff key
//! signatures and instrument transpositions consistent, and fits parts into
//! an instrument's range.

pub mod models;
pub mod transposition;
pub mod api;

// Re-export commonly used types
pub use models::*;
pub use transposition::{Interval, TransposeError, TransposeSession, TransposeSettings};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // fails only when a logger is already installed
    #[cfg(feature = "console_log")]
    let _ = console_log::init_with_level(log::Level::Debug);

    log::info!("Transposition WASM module initialized");
}
