//! Root application component with routing and context providers.

#[cfg(test)]
#[path = "app_test.rs"]
mod app_test;

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
    hooks::{use_location, use_navigate},
};

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::transport::Transport;
use crate::pages::{home::HomePage, login::LoginPage, logout::LogoutPage};
use crate::routing::Navigator;
use crate::routing::guard::RouteGuard;
use crate::routing::routes::{RouteMeta, RouteTable};
use crate::state::auth::AuthSession;
use crate::state::session::SessionStore;
use crate::state::toast::ToastState;
use crate::util::auth::{AuthContext, RouterNavigator, SignalNotifier, install_route_guard, may_render};
use crate::util::notify::Notifier;
use crate::util::storage::BrowserStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="Admin"/>
        <Router>
            <SessionShell/>
        </Router>
    }
}

/// Builds the session stack inside the router so redirects can use it.
#[component]
fn SessionShell() -> impl IntoView {
    let config = load_config();
    let navigate = use_navigate();

    let toasts = RwSignal::new(ToastState::with_duration(config.toast_duration_ms));
    let notifier: Rc<dyn Notifier> = Rc::new(SignalNotifier::new(toasts));
    let navigator: Rc<dyn Navigator> = Rc::new(RouterNavigator::new(navigate.clone()));

    let session = Rc::new(SessionStore::new(Rc::new(BrowserStorage), &config));
    let api = ApiClient::new(&config, transport(), session.clone(), notifier.clone(), navigator.clone());
    let auth = Rc::new(AuthSession::new(&config, session, api, notifier.clone(), navigator));
    let guard = Rc::new(RouteGuard::new(&config, route_table(), notifier));

    let ctx = AuthContext::new(config, auth, guard, toasts);
    provide_context(ctx);
    install_route_guard(ctx, navigate);

    let pathname = use_location().pathname;
    let allowed = move || ctx.verdict.with(|v| pathname.with(|path| may_render(v.as_ref(), path)));

    view! {
        <Show when=allowed fallback=|| view! { <p class="route-pending">"Loading..."</p> }>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("logout") view=LogoutPage/>
                <Route path=StaticSegment("") view=HomePage/>
            </Routes>
        </Show>
    }
}

/// Environment overrides where a process environment exists, else defaults.
pub fn load_config() -> ClientConfig {
    ClientConfig::from_env().unwrap_or_else(|e| {
        leptos::logging::warn!("config override rejected, using defaults: {e}");
        ClientConfig::default()
    })
}

/// Permission required by each management route.
pub fn route_table() -> RouteTable {
    RouteTable::new()
        .route("/users", RouteMeta::requires("user-list"))
        .route("/users/create", RouteMeta::requires("user-create"))
        .route("/users/:id", RouteMeta::requires("user-update"))
        .route("/roles", RouteMeta::requires("role-list"))
        .route("/roles/:id", RouteMeta::requires("role-update"))
        .route("/menus", RouteMeta::requires("menu-list"))
        .route("/menus/:id", RouteMeta::requires("menu-update"))
        .route("/", RouteMeta::default())
}

fn transport() -> Rc<dyn Transport> {
    #[cfg(feature = "hydrate")]
    {
        Rc::new(crate::net::transport::GlooTransport)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Rc::new(crate::net::transport::UnavailableTransport)
    }
}
