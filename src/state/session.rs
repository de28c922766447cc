//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! One [`SessionStore`] per tab holds identity, token, and the role's menu
//! tree. The HTTP client reads the token and clears the store on 401; the
//! auth operations and route guard mutate it. Non-sensitive fields are
//! mirrored to localStorage so a reload can rehydrate without a round trip.
//!
//! INVARIANTS
//! ==========
//! - `is_authenticated()` never reports true without a token in memory.
//! - `permissions` is always the flattening of `menus`.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::token::TokenStore;
use crate::config::ClientConfig;
use crate::net::types::{MenuNode, User, flatten_permissions};
use crate::util::storage::{SessionStorage, load_json, save_json};

/// Snapshot of the session, cheap to clone into a reactive signal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<User>,
    pub is_authenticated: bool,
    pub menus: Vec<MenuNode>,
    pub permissions: Vec<String>,
    pub loading: bool,
}

impl AuthState {
    /// Display role: inline role name, raw role string, or `"guest"`.
    #[must_use]
    pub fn role_name(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_ref())
            .map(crate::net::types::UserRole::display_name)
            .filter(|name| !name.is_empty())
            .unwrap_or("guest")
    }

    /// Membership test; an empty permission set grants nothing.
    #[must_use]
    pub fn has_permission(&self, key: &str) -> bool {
        self.permissions.iter().any(|p| p == key)
    }

    #[must_use]
    pub fn has_any_permission(&self, keys: &[&str]) -> bool {
        keys.iter().any(|k| self.has_permission(k))
    }

    #[must_use]
    pub fn has_all_permissions(&self, keys: &[&str]) -> bool {
        keys.iter().all(|k| self.has_permission(k))
    }
}

/// Non-sensitive fields mirrored to localStorage. Never holds the token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSession {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    menus: Vec<MenuNode>,
}

/// Shared, interior-mutable session owned by one browser tab.
pub struct SessionStore {
    storage: Rc<dyn SessionStorage>,
    tokens: TokenStore,
    session_key: String,
    state: RefCell<AuthState>,
    /// Bumped by every menu load and every clear; responses carry the value
    /// they started with.
    menu_generation: Cell<u64>,
}

impl SessionStore {
    #[must_use]
    pub fn new(storage: Rc<dyn SessionStorage>, config: &ClientConfig) -> Self {
        let tokens = TokenStore::new(storage.clone(), config.token_cookie.clone(), config.token_max_age_secs());
        Self {
            storage,
            tokens,
            session_key: config.session_key.clone(),
            state: RefCell::new(AuthState::default()),
            menu_generation: Cell::new(0),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// Read the state without cloning.
    pub fn with_state<R>(&self, f: impl FnOnce(&AuthState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Token to inject into the next request, refilled from the cookie if
    /// memory is empty.
    #[must_use]
    pub fn current_token(&self) -> Option<String> {
        self.tokens.rehydrate()
    }

    /// In-memory token only.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.tokens.get()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated && self.tokens.is_present()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Role id of the current user, if any and non-empty.
    #[must_use]
    pub fn role_id(&self) -> Option<String> {
        self.state
            .borrow()
            .user
            .as_ref()
            .map(|u| u.role_id.clone())
            .filter(|id| !id.is_empty())
    }

    #[must_use]
    pub fn role_name(&self) -> String {
        self.state.borrow().role_name().to_owned()
    }

    #[must_use]
    pub fn permissions_empty(&self) -> bool {
        self.state.borrow().permissions.is_empty()
    }

    #[must_use]
    pub fn has_permission(&self, key: &str) -> bool {
        self.state.borrow().has_permission(key)
    }

    /// Reconcile memory with persisted storage.
    ///
    /// Refills the token from the cookie when absent, and the user/menus
    /// from the localStorage record when no user is loaded. The record's
    /// authenticated flag only counts if a token was found.
    pub fn rehydrate(&self) -> bool {
        let token_present = self.tokens.rehydrate().is_some();
        let needs_record = self.state.borrow().user.is_none();
        if needs_record {
            if let Some(record) = load_json::<PersistedSession>(self.storage.as_ref(), &self.session_key) {
                if record.is_authenticated && token_present && record.user.is_some() {
                    let mut state = self.state.borrow_mut();
                    state.permissions = flatten_permissions(&record.menus);
                    state.user = record.user;
                    state.menus = record.menus;
                    state.is_authenticated = true;
                }
            }
        }
        self.is_authenticated()
    }

    /// Record a successful login.
    pub fn establish(&self, token: &str, user: User) {
        self.tokens.set(token);
        {
            let mut state = self.state.borrow_mut();
            state.user = Some(user);
            state.is_authenticated = true;
        }
        self.persist();
    }

    pub fn set_user(&self, user: User) {
        self.state.borrow_mut().user = Some(user);
        self.persist();
    }

    /// Install a token obtained outside `login` and mark the session live.
    pub fn set_token(&self, token: &str) {
        self.tokens.set(token);
        self.state.borrow_mut().is_authenticated = true;
        self.persist();
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.borrow_mut().loading = loading;
    }

    /// Replace the menu tree and recompute the permission set.
    pub fn replace_menus(&self, menus: Vec<MenuNode>) {
        {
            let mut state = self.state.borrow_mut();
            state.permissions = flatten_permissions(&menus);
            state.menus = menus;
        }
        self.persist();
    }

    /// Start a menu load and return its generation.
    pub fn begin_menu_load(&self) -> u64 {
        self.menu_generation.set(self.menu_generation.get() + 1);
        self.menu_generation.get()
    }

    /// Whether a load started at `generation` is still the latest, with no
    /// clear in between.
    #[must_use]
    pub fn is_current_menu_load(&self, generation: u64) -> bool {
        self.menu_generation.get() == generation
    }

    /// Drop every credential and derived field. Safe to call repeatedly.
    /// In-flight menu loads are invalidated.
    pub fn clear(&self) {
        self.menu_generation.set(self.menu_generation.get() + 1);
        self.tokens.clear();
        self.storage.remove_item(&self.session_key);
        let mut state = self.state.borrow_mut();
        let loading = state.loading;
        *state = AuthState { loading, ..AuthState::default() };
    }

    fn persist(&self) {
        let record = {
            let state = self.state.borrow();
            PersistedSession {
                user: state.user.clone(),
                is_authenticated: state.is_authenticated,
                menus: state.menus.clone(),
            }
        };
        save_json(self.storage.as_ref(), &self.session_key, &record);
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("tokens", &self.tokens)
            .field("state", &self.state.borrow())
            .finish_non_exhaustive()
    }
}
