//! Key-value storage
//!
//! LocalStorage on web. Native builds have no backing store, so reads miss
//! and writes are dropped.

/// Read a raw string value
#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    let Some(storage) = storage else {
        log::warn!("LocalStorage unavailable, cannot read '{}'", key);
        return None;
    };

    storage.get_item(key).ok().flatten()
}

/// Write a raw string value (best effort)
#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();

    match storage {
        Some(storage) => {
            if storage.set_item(key, value).is_err() {
                log::warn!("Failed to write '{}' to LocalStorage", key);
            }
        }
        None => log::warn!("LocalStorage unavailable, dropping write to '{}'", key),
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(key: &str, _value: &str) {
    log::debug!("No storage on native, dropping write to '{}'", key);
}
