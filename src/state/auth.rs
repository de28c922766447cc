//! Authentication lifecycle: login, logout, menu load, session check.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login forms and the route guard drive the session through [`AuthSession`].
//! It owns no state of its own; identity, permissions, and the menu-load
//! generation live in the shared [`SessionStore`].
//!
//! ERROR HANDLING
//! ==============
//! `login` never fails: every path resolves to a [`LoginResult`], and a
//! failed attempt clears the session so no partial credentials survive.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use serde::Serialize;

use super::session::{AuthState, SessionStore};
use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::services::MenuService;
use crate::net::types::{LoginPayload, User, parse_login_response, parse_menu_response};
use crate::routing::Navigator;
use crate::util::notify::Notifier;

pub const LOGIN_PATH: &str = "/user/login";
pub const MSG_NO_TOKEN: &str = "Login failed: No token received";
pub const MSG_ACCESS_DENIED: &str = "You do not have access to this page.";

/// Outcome of a login attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LoginResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LoginResult {
    #[must_use]
    pub fn ok() -> Self {
        Self { success: true, error: None }
    }

    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self { success: false, error: Some(message.into()) }
    }
}

/// Auth operations over the shared session.
pub struct AuthSession {
    session: Rc<SessionStore>,
    api: ApiClient,
    menus: MenuService,
    notifier: Rc<dyn Notifier>,
    navigator: Rc<dyn Navigator>,
    logout_route: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(
        config: &ClientConfig,
        session: Rc<SessionStore>,
        api: ApiClient,
        notifier: Rc<dyn Notifier>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            menus: MenuService::new(api.clone()),
            session,
            api,
            notifier,
            navigator,
            logout_route: config.logout_route.clone(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Rc<SessionStore> {
        &self.session
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.session.snapshot()
    }

    /// Exchange credentials for a token and identity.
    pub async fn login(&self, username: &str, password: &str) -> LoginResult {
        self.session.set_loading(true);

        let result = match self.request_login(username, password).await {
            Ok(payload) => {
                leptos::logging::log!("login succeeded for {}", payload.user.username);
                self.session.establish(&payload.token, payload.user);
                LoginResult::ok()
            }
            Err(message) => {
                leptos::logging::warn!("login failed: {message}");
                self.logout();
                LoginResult::failed(message)
            }
        };

        self.session.set_loading(false);
        result
    }

    async fn request_login(&self, username: &str, password: &str) -> Result<LoginPayload, String> {
        let body = serde_json::json!({ "username": username, "password": password });
        let resp = self
            .api
            .post(LOGIN_PATH, &body)
            .await
            .map_err(|e| e.message().to_owned())?;
        parse_login_response(&resp).ok_or_else(|| MSG_NO_TOKEN.to_owned())
    }

    /// Clear token, identity, and menus. Idempotent.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// Fetch the role's menu tree and recompute permissions.
    ///
    /// On failure the previous menus stay in place and the server message is
    /// shown. A response for a load that has since been superseded, or that
    /// arrives after the session was cleared, is dropped.
    pub async fn load_auth_menu(&self, role_id: &str) {
        let generation = self.session.begin_menu_load();

        let result = self.menus.retrieve_role_menu(&[("roleId", role_id)]).await;
        if !self.session.is_current_menu_load(generation) {
            leptos::logging::log!("dropping stale menu response for role {role_id}");
            return;
        }

        match result.map(|body| parse_menu_response(&body)) {
            Ok(Ok(menus)) => self.session.replace_menus(menus),
            Ok(Err(e)) => {
                leptos::logging::warn!("menu payload for role {role_id} malformed: {e}");
                self.notifier.error("Failed to load menu", Some(e.to_string().as_str()));
            }
            Err(e) => self.notifier.error("Failed to load menu", Some(e.message())),
        }
    }

    /// Reconcile with persisted storage and report whether the session is live.
    ///
    /// Does not contact the backend; an expired token is discovered on the
    /// next 401.
    pub fn check_auth(&self) -> bool {
        self.session.rehydrate()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[must_use]
    pub fn role_name(&self) -> String {
        self.session.role_name()
    }

    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn set_user(&self, user: User) {
        self.session.set_user(user);
    }

    pub fn set_token(&self, token: &str) {
        self.session.set_token(token);
    }

    #[must_use]
    pub fn has_permission(&self, key: &str) -> bool {
        self.session.has_permission(key)
    }

    #[must_use]
    pub fn has_any_permission(&self, keys: &[&str]) -> bool {
        self.session.with_state(|s| s.has_any_permission(keys))
    }

    #[must_use]
    pub fn has_all_permissions(&self, keys: &[&str]) -> bool {
        self.session.with_state(|s| s.has_all_permissions(keys))
    }

    /// Gate an action on `key`; without it, notify and redirect to logout.
    pub fn check_permission(&self, key: &str) -> bool {
        if self.has_permission(key) {
            return true;
        }
        self.notifier.error("Access Denied", Some(MSG_ACCESS_DENIED));
        self.navigator.navigate(&self.logout_route);
        false
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
