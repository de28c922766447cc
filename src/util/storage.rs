//! Cookie and localStorage persistence behind one trait.
//!
//! SYSTEM CONTEXT
//! ==============
//! The bearer token lives in a cookie and the non-sensitive session record in
//! localStorage. [`BrowserStorage`] is the hydrate-only web-sys glue;
//! [`MemoryStorage`] stands in during SSR and tests.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Persistent key/value storage for session state.
pub trait SessionStorage {
    fn read_cookie(&self, name: &str) -> Option<String>;
    fn write_cookie(&self, name: &str, value: &str, max_age_secs: u64);
    fn remove_cookie(&self, name: &str);
    fn read_item(&self, key: &str) -> Option<String>;
    fn write_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// Load a JSON value stored under `key`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn SessionStorage, key: &str) -> Option<T> {
    let raw = storage.read_item(key)?;
    serde_json::from_str(&raw).ok()
}

/// Save a JSON value under `key`. Serialization failures are logged and dropped.
pub fn save_json<T: Serialize>(storage: &dyn SessionStorage, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(raw) => storage.write_item(key, &raw),
        Err(e) => leptos::logging::warn!("failed to serialize {key}: {e}"),
    }
}

/// Build a `document.cookie` assignment for `name`.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub(crate) fn cookie_assignment(name: &str, value: &str, max_age_secs: u64) -> String {
    format!("{name}={value}; Max-Age={max_age_secs}; Path=/; SameSite=Lax")
}

/// Find `name` in a `document.cookie` style header (`a=1; b=2`).
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub(crate) fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// In-process storage used during SSR and in tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    cookies: RefCell<HashMap<String, (String, u64)>>,
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Max-age recorded for cookie `name`, if set.
    #[must_use]
    pub fn cookie_max_age(&self, name: &str) -> Option<u64> {
        self.cookies.borrow().get(name).map(|(_, age)| *age)
    }
}

impl SessionStorage for MemoryStorage {
    fn read_cookie(&self, name: &str) -> Option<String> {
        self.cookies.borrow().get(name).map(|(value, _)| value.clone())
    }

    fn write_cookie(&self, name: &str, value: &str, max_age_secs: u64) {
        self.cookies
            .borrow_mut()
            .insert(name.to_owned(), (value.to_owned(), max_age_secs));
    }

    fn remove_cookie(&self, name: &str) {
        self.cookies.borrow_mut().remove(name);
    }

    fn read_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn write_item(&self, key: &str, value: &str) {
        self.items.borrow_mut().insert(key.to_owned(), value.to_owned());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

// =============================================================================
// BROWSER
// =============================================================================

/// `document.cookie` + `window.localStorage` storage.
///
/// Outside the `hydrate` build every read misses and every write is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
impl BrowserStorage {
    fn document() -> Option<web_sys::HtmlDocument> {
        use wasm_bindgen::JsCast;

        web_sys::window()?.document()?.dyn_into::<web_sys::HtmlDocument>().ok()
    }

    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    fn set_cookie_raw(assignment: &str) {
        let Some(doc) = Self::document() else {
            return;
        };
        if let Err(e) = doc.set_cookie(assignment) {
            leptos::logging::warn!("cookie write failed: {e:?}");
        }
    }
}

impl SessionStorage for BrowserStorage {
    fn read_cookie(&self, name: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            let header = Self::document()?.cookie().ok()?;
            let raw = find_cookie(&header, name)?;
            js_sys::decode_uri_component(raw).ok().map(String::from)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
            None
        }
    }

    fn write_cookie(&self, name: &str, value: &str, max_age_secs: u64) {
        #[cfg(feature = "hydrate")]
        {
            let encoded = String::from(js_sys::encode_uri_component(value));
            Self::set_cookie_raw(&cookie_assignment(name, &encoded, max_age_secs));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (name, value, max_age_secs);
        }
    }

    fn remove_cookie(&self, name: &str) {
        #[cfg(feature = "hydrate")]
        {
            Self::set_cookie_raw(&cookie_assignment(name, "", 0));
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = name;
        }
    }

    fn read_item(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            Self::local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn write_item(&self, key: &str, value: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = Self::local_storage() {
                let _ = storage.set_item(key, value);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
        }
    }

    fn remove_item(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = Self::local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}
