//! Logout route: clears the session and returns to login.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::util::auth::AuthContext;

#[component]
pub fn LogoutPage() -> impl IntoView {
    let ctx = expect_context::<AuthContext>();
    let navigate = use_navigate();
    let login = ctx.route(|c| &c.login_route);

    Effect::new(move || {
        ctx.auth.with_value(|auth| auth.logout());
        ctx.refresh();
        navigate(&login, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });

    view! { <p class="logout-message">"Signing out..."</p> }
}
