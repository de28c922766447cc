//! Leptos glue for the session core.
//!
//! SYSTEM CONTEXT
//! ==============
//! The shell provides one [`AuthContext`] to every route. The guard runs on
//! each location change, and failures surface through a toast signal.
//!
//! DESIGN
//! ======
//! The router has no pre-navigation hook. The guard runs when the location
//! changes, and route content stays unmounted until a verdict for that exact
//! path allows it. Verdicts for a path the user already left are dropped.
//! Redirects use `replace` so a denied page never lands in history.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_location;

use crate::config::ClientConfig;
use crate::routing::Navigator;
use crate::routing::guard::{GuardOutcome, RouteGuard};
use crate::state::auth::AuthSession;
use crate::state::session::AuthState;
use crate::state::toast::ToastState;
use crate::util::notify::{LogNotifier, Notifier, Severity};

/// Session handles shared through Leptos context.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub config: StoredValue<ClientConfig>,
    pub auth: StoredValue<Rc<AuthSession>, LocalStorage>,
    pub guard: StoredValue<Rc<RouteGuard>, LocalStorage>,
    /// Reactive mirror of the session, refreshed after each guard run.
    pub state: RwSignal<AuthState>,
    pub toasts: RwSignal<ToastState>,
    /// Latest guard result, keyed by the path it was computed for.
    pub verdict: RwSignal<Option<GuardVerdict>>,
}

/// Guard outcome for one path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardVerdict {
    pub path: String,
    pub outcome: GuardOutcome,
}

impl AuthContext {
    #[must_use]
    pub fn new(config: ClientConfig, auth: Rc<AuthSession>, guard: Rc<RouteGuard>, toasts: RwSignal<ToastState>) -> Self {
        let state = RwSignal::new(auth.snapshot());
        Self {
            config: StoredValue::new(config),
            auth: StoredValue::new_local(auth),
            guard: StoredValue::new_local(guard),
            state,
            toasts,
            verdict: RwSignal::new(None),
        }
    }

    /// Copy the session into the reactive mirror.
    pub fn refresh(&self) {
        let snapshot = self.auth.with_value(|auth| auth.snapshot());
        self.state.set(snapshot);
    }

    #[must_use]
    pub fn route(&self, pick: impl FnOnce(&ClientConfig) -> &String) -> String {
        self.config.with_value(|c| pick(c).clone())
    }
}

/// Run the route guard whenever the location changes.
pub fn install_route_guard<F>(ctx: AuthContext, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    let pathname = use_location().pathname;
    Effect::new(move || {
        let path = pathname.get();
        let navigate = navigate.clone();
        let auth = ctx.auth.get_value();
        let guard = ctx.guard.get_value();
        leptos::task::spawn_local(async move {
            let outcome = guard.run(&auth, &path).await;
            ctx.refresh();
            if pathname.get_untracked() != path {
                leptos::logging::log!("dropping guard result for {path}: location changed");
                return;
            }
            if let Some(to) = redirect_target(&outcome, &path) {
                navigate(to, NavigateOptions { replace: true, ..NavigateOptions::default() });
            }
            ctx.verdict.set(Some(GuardVerdict { path, outcome }));
        });
    });
}

/// Redirect path for an outcome, unless it points back at `current`.
pub(crate) fn redirect_target<'a>(outcome: &'a GuardOutcome, current: &str) -> Option<&'a str> {
    match outcome {
        GuardOutcome::Redirect(to) if to != current => Some(to.as_str()),
        _ => None,
    }
}

/// Whether route content for `current` may mount.
///
/// Only a verdict computed for `current` counts. While it is missing, or
/// while a redirect away from `current` is under way, nothing renders.
pub(crate) fn may_render(verdict: Option<&GuardVerdict>, current: &str) -> bool {
    match verdict {
        Some(v) if v.path == current => redirect_target(&v.outcome, current).is_none(),
        _ => false,
    }
}

// =============================================================================
// NAVIGATOR
// =============================================================================

/// [`Navigator`] backed by the router's `use_navigate`.
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    pub fn new<F>(navigate: F) -> Self
    where
        F: Fn(&str, NavigateOptions) + 'static,
    {
        Self { navigate: Rc::new(navigate) }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, path: &str) {
        (self.navigate)(path, NavigateOptions::default());
    }
}

// =============================================================================
// NOTIFIER
// =============================================================================

/// [`Notifier`] that logs and queues a toast, auto-dismissed in the browser.
#[derive(Clone, Copy)]
pub struct SignalNotifier {
    toasts: RwSignal<ToastState>,
}

impl SignalNotifier {
    #[must_use]
    pub fn new(toasts: RwSignal<ToastState>) -> Self {
        Self { toasts }
    }
}

impl Notifier for SignalNotifier {
    fn notify(&self, severity: Severity, title: &str, message: Option<&str>) {
        LogNotifier.notify(severity, title, message);

        let mut queued = (0, 0);
        self.toasts.update(|q| {
            let id = q.push(severity, title, message, None);
            let duration = q.toasts.last().map_or(0, |t| t.duration_ms);
            queued = (id, duration);
        });

        #[cfg(feature = "hydrate")]
        {
            let (id, duration_ms) = queued;
            let toasts = self.toasts;
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(duration_ms))).await;
                toasts.update(|q| {
                    q.remove(id);
                });
            });
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = queued;
    }
}
