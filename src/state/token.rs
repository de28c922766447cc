//! Bearer token cache backed by a persisted cookie.
//!
//! The cookie is the source of truth; the in-memory copy is refilled from it
//! whenever it is empty.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::util::storage::SessionStorage;

/// Current bearer token plus its cookie persistence.
pub struct TokenStore {
    storage: Rc<dyn SessionStorage>,
    cookie: String,
    max_age_secs: u64,
    token: RefCell<Option<String>>,
}

impl TokenStore {
    #[must_use]
    pub fn new(storage: Rc<dyn SessionStorage>, cookie: impl Into<String>, max_age_secs: u64) -> Self {
        Self { storage, cookie: cookie.into(), max_age_secs, token: RefCell::new(None) }
    }

    /// In-memory token, without consulting the cookie.
    #[must_use]
    pub fn get(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        self.token.borrow().is_some()
    }

    /// Store `token` in memory and in the cookie.
    pub fn set(&self, token: &str) {
        self.storage.write_cookie(&self.cookie, token, self.max_age_secs);
        *self.token.borrow_mut() = Some(token.to_owned());
    }

    /// Drop the token from memory and expire the cookie.
    pub fn clear(&self) {
        self.storage.remove_cookie(&self.cookie);
        *self.token.borrow_mut() = None;
    }

    /// Refill the in-memory token from the cookie if it is empty.
    ///
    /// Returns the token now held in memory.
    pub fn rehydrate(&self) -> Option<String> {
        if self.token.borrow().is_none() {
            let persisted = self
                .storage
                .read_cookie(&self.cookie)
                .filter(|t| !t.is_empty());
            *self.token.borrow_mut() = persisted;
        }
        self.get()
    }
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("cookie", &self.cookie)
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}
