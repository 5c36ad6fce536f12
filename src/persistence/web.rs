//! Browser backends: LocalStorage and `document.cookie`

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{HtmlDocument, Storage};

use super::FlagStore;
use super::cookie::CookieJar;
use crate::error::StorageError;

fn js_error(backend: &'static str, err: JsValue) -> StorageError {
    StorageError::Backend {
        backend,
        message: format!("{:?}", err),
    }
}

/// `window.localStorage`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage(&self) -> Result<Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StorageError::Unavailable("localStorage"))
    }
}

impl FlagStore for LocalStorageStore {
    fn name(&self) -> &'static str {
        "localStorage"
    }

    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| js_error("localStorage", e))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| js_error("localStorage", e))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| js_error("localStorage", e))
    }
}

/// `document.cookie` of the current page
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentCookieJar;

impl DocumentCookieJar {
    fn document(&self) -> Result<HtmlDocument, StorageError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
            .ok_or(StorageError::Unavailable("document.cookie"))
    }
}

impl CookieJar for DocumentCookieJar {
    fn header(&self) -> Result<String, StorageError> {
        self.document()?
            .cookie()
            .map_err(|e| js_error("document.cookie", e))
    }

    fn set_cookie(&mut self, line: &str) -> Result<(), StorageError> {
        self.document()?
            .set_cookie(line)
            .map_err(|e| js_error("document.cookie", e))
    }
}
