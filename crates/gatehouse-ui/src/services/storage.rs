//! `localStorage` implementation of the key-value seam.

use gatehouse_auth::KeyValueStore;
use gloo::console;
use gloo::storage::{LocalStorage, Storage};

/// Raw string access to `window.localStorage`.
///
/// Values are stored verbatim; the session store owns the JSON encoding.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStore;

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        match LocalStorage::raw().get_item(key) {
            Ok(value) => value,
            Err(err) => {
                console::error!(format!("storage read failed for {key}: {err:?}"));
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| format!("{err:?}"))
    }

    fn delete(&self, key: &str) {
        if let Err(err) = LocalStorage::raw().remove_item(key) {
            console::error!(format!("storage delete failed for {key}: {err:?}"));
        }
    }
}
