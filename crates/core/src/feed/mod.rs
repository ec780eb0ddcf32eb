pub mod traits;

// Feed implementations
#[cfg(not(target_arch = "wasm32"))]
pub mod simulated;
