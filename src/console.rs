//! Browser console diagnostics.
//!
//! Messages are prefixed so they are easy to filter in devtools. Off wasm
//! (host tests) every helper is a no-op.

#[cfg(target_arch = "wasm32")]
const PREFIX: &str = "Cookie Bakery: ";

#[cfg(target_arch = "wasm32")]
pub fn debug(msg: &str) {
    web_sys::console::debug_1(&format!("{PREFIX}{msg}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn log(msg: &str) {
    web_sys::console::log_1(&format!("{PREFIX}{msg}").into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(msg: &str) {
    web_sys::console::warn_1(&format!("{PREFIX}{msg}").into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn debug(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(_msg: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(_msg: &str) {}
