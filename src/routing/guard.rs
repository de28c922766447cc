//! Per-navigation auth and permission guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Runs on every client-side navigation. It rehydrates the session from
//! storage, keeps unauthenticated users on public routes, loads the role's
//! menus once per authenticated span, and enforces route permissions.
//!
//! DESIGN
//! ======
//! The once-per-session menu latch is a field on the guard rather than a
//! global, so each mounted app (and each test) gets its own. Denials are
//! redirects, never errors.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::Cell;
use std::rc::Rc;

use super::routes::{RouteTable, normalize_path};
use crate::config::ClientConfig;
use crate::state::auth::{AuthSession, MSG_ACCESS_DENIED};
use crate::util::notify::Notifier;

/// Which rendering pass the guard is running in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderPass {
    Server,
    Client,
}

impl RenderPass {
    /// Pass implied by the enabled build features.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(all(feature = "ssr", not(feature = "hydrate"))) { Self::Server } else { Self::Client }
    }
}

/// Terminal result of one navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Server-render pass; nothing was evaluated.
    Skip,
    Allow,
    Redirect(String),
}

/// Navigation guard holding the menu-load latch.
pub struct RouteGuard {
    config: ClientConfig,
    table: RouteTable,
    notifier: Rc<dyn Notifier>,
    pass: RenderPass,
    menus_loaded: Cell<bool>,
}

impl RouteGuard {
    #[must_use]
    pub fn new(config: &ClientConfig, table: RouteTable, notifier: Rc<dyn Notifier>) -> Self {
        Self {
            config: config.clone(),
            table,
            notifier,
            pass: RenderPass::current(),
            menus_loaded: Cell::new(false),
        }
    }

    #[must_use]
    pub fn with_pass(mut self, pass: RenderPass) -> Self {
        self.pass = pass;
        self
    }

    /// Whether the role's menus have been loaded this session span.
    #[must_use]
    pub fn menus_loaded(&self) -> bool {
        self.menus_loaded.get()
    }

    pub fn reset_latch(&self) {
        self.menus_loaded.set(false);
    }

    /// Decide the outcome of navigating to `to`.
    pub async fn run(&self, auth: &AuthSession, to: &str) -> GuardOutcome {
        if self.pass == RenderPass::Server {
            return GuardOutcome::Skip;
        }

        let path = normalize_path(to);
        let authenticated = auth.check_auth();

        if path == self.config.login_route && authenticated {
            self.reset_latch();
            return GuardOutcome::Redirect(self.config.home_route.clone());
        }

        if self.config.is_public_route(&path) {
            self.reset_latch();
            return GuardOutcome::Allow;
        }

        if !authenticated {
            self.reset_latch();
            return GuardOutcome::Redirect(self.config.login_route.clone());
        }

        let mut loaded_now = false;
        if !self.menus_loaded.get() {
            if let Some(role_id) = auth.store().role_id() {
                auth.load_auth_menu(&role_id).await;
                self.menus_loaded.set(true);
                loaded_now = true;
            }
        }

        let Some(required) = self.table.required_permission(&path) else {
            return GuardOutcome::Allow;
        };

        if auth.store().permissions_empty() && loaded_now {
            return GuardOutcome::Allow;
        }
        if !auth.has_permission(required) {
            leptos::logging::warn!("navigation to {path} denied: missing permission {required}");
            self.notifier.error("Access Denied", Some(MSG_ACCESS_DENIED));
            return GuardOutcome::Redirect(self.config.logout_route.clone());
        }
        GuardOutcome::Allow
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("pass", &self.pass)
            .field("menus_loaded", &self.menus_loaded.get())
            .finish_non_exhaustive()
    }
}
