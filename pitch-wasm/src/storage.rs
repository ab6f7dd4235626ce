use pitch_core::{Confirm, KeyValueStore, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Storage, Window};

/// `window.localStorage`. Missing storage (private mode, blocked cookies)
/// behaves as an empty store that rejects writes.
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("localStorage unavailable; board changes will not persist");
        }
        LocalStore { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

fn write_error(key: &str, e: JsValue) -> StorageError {
    match e.dyn_ref::<web_sys::DomException>().map(|d| d.name()) {
        Some(name) if name == "QuotaExceededError" => StorageError::QuotaExceeded {
            key: key.to_string(),
        },
        _ => StorageError::Backend(format!("{e:?}")),
    }
}

impl KeyValueStore for LocalStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.storage.as_ref() {
            Some(s) => s
                .get_item(key)
                .map_err(|e| StorageError::Backend(format!("{e:?}"))),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| write_error(key, e))
    }
}

/// `window.confirm` as the formation guard.
pub struct WindowConfirm<'a>(pub &'a Window);

impl Confirm for WindowConfirm<'_> {
    fn confirm(&mut self, message: &str) -> bool {
        self.0.confirm_with_message(message).unwrap_or(false)
    }
}

/// `window.prompt`; `None` when cancelled.
pub fn prompt(window: &Window, message: &str, default: &str) -> Option<String> {
    window
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
}
