//! Transposition WASM API
//!
//! This module provides the JavaScript-facing API for the transposition core.
//!
//! # Module Structure
//!
//! - `helpers`: Shared utilities for serialization, error conversion and logging
//! - `workspace`: The loaded document, its session and editor action dispatch
//! - `core`: `#[wasm_bindgen]` entry points over a shared workspace

pub mod helpers;
pub mod workspace;
pub mod core;

pub use self::core::*;
pub use workspace::{ActionResult, EditorAction, KeySignatureInfo, Workspace};
