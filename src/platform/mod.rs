//! Platform frontends
//!
//! The browser frontend lives in `main.rs` (canvas + WebGPU). Natively the
//! game runs in the terminal.

#[cfg(not(target_arch = "wasm32"))]
pub mod terminal;
