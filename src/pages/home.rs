//! Authenticated landing page listing the role's menu tree.

use leptos::prelude::*;

use crate::net::types::MenuNode;
use crate::util::auth::AuthContext;

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = expect_context::<AuthContext>();

    let greeting = move || {
        let state = ctx.state.get();
        let name = state.user.as_ref().map(|u| u.name.clone()).unwrap_or_default();
        format!("{name} ({})", state.role_name())
    };
    let menus = move || ctx.state.get().menus;
    let logout = ctx.route(|c| &c.logout_route);

    view! {
        <div class="home-page">
            <h1>{greeting}</h1>
            <ul class="menu-tree">
                <For each=menus key=|m| m.id.clone() children=move |menu: MenuNode| view! { <MenuItem menu/> }/>
            </ul>
            <a href=logout>"Sign out"</a>
        </div>
    }
}

#[component]
fn MenuItem(menu: MenuNode) -> impl IntoView {
    let href = menu.path.clone().unwrap_or_else(|| "#".to_owned());
    let children: Vec<String> = menu.children.iter().map(|c| c.name.clone()).collect();

    view! {
        <li>
            <a href=href>{menu.name}</a>
            <ul>
                {children.into_iter().map(|name| view! { <li>{name}</li> }).collect_view()}
            </ul>
        </li>
    }
}
