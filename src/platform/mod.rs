//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logger setup
//! - Progress storage location
//! - The JS-facing arcade handle (web only)

#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::persistence::ProgressBackend;
use crate::progress::ProgressStore;

/// Install the logger for this platform
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
}

/// Install the logger for this platform (`RUST_LOG` controls the filter)
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init();
}

/// Default progress backend for this platform
#[cfg(target_arch = "wasm32")]
pub fn default_progress_backend() -> Box<dyn ProgressBackend> {
    Box::new(crate::persistence::LocalStorageBackend::new(ProgressStore::STORAGE_KEY))
}

/// Default progress backend for this platform
#[cfg(not(target_arch = "wasm32"))]
pub fn default_progress_backend() -> Box<dyn ProgressBackend> {
    let file = format!("{}.json", ProgressStore::STORAGE_KEY);
    Box::new(crate::persistence::FileBackend::beside_executable(&file))
}
