//! Username + password login page.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::util::auth::AuthContext;

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = expect_context::<AuthContext>();
    let navigate = use_navigate();
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());

    let busy = move || ctx.state.get().loading;

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy() {
            return;
        }
        let user_value = username.get().trim().to_owned();
        let pass_value = password.get();
        if user_value.is_empty() || pass_value.is_empty() {
            info.set("Enter both username and password.".to_owned());
            return;
        }
        info.set(String::new());

        let auth = ctx.auth.get_value();
        let navigate = navigate.clone();
        let home = ctx.route(|c| &c.home_route);
        ctx.state.update(|s| s.loading = true);
        leptos::task::spawn_local(async move {
            let result = auth.login(&user_value, &pass_value).await;
            ctx.refresh();
            if result.success {
                navigate(&home, NavigateOptions::default());
            } else {
                info.set(result.error.unwrap_or_default());
            }
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Admin"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="text"
                        placeholder="Username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=busy>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
