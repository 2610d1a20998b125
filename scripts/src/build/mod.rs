//! Compilation of the contracts to WASM

pub mod wasm;

pub use wasm::WasmBuilder;
