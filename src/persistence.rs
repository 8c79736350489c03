//! LocalStorage persistence
//!
//! Every stored value in the game (scores, settings) goes through these
//! helpers. An unavailable or failing store degrades to "no data"; nothing
//! here surfaces an error to the caller.

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten()
}

#[cfg(target_arch = "wasm32")]
pub fn get_item(key: &str) -> Option<String> {
    storage()?.get_item(key).ok().flatten()
}

#[cfg(target_arch = "wasm32")]
pub fn set_item(key: &str, value: &str) {
    match storage() {
        Some(storage) => {
            let _ = storage.set_item(key, value);
        }
        None => log::warn!("LocalStorage unavailable; {key} not saved"),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn remove_item(key: &str) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(key);
    }
}

/// Native stubs - the native binary keeps no state between runs
#[cfg(not(target_arch = "wasm32"))]
pub fn get_item(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn set_item(_key: &str, _value: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove_item(_key: &str) {}
