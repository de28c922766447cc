//! # admin-client
//!
//! Leptos + WASM client-session core for the admin dashboard: the HTTP
//! client every API call goes through, the auth session with its
//! role-scoped permissions, and the guard that runs on each navigation.

pub mod app;
pub mod config;
pub mod net;
pub mod pages;
pub mod routing;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

/// Browser entry point: install logging and hydrate the server markup.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let level = app::load_config().log_level.as_log_level();
    if let Err(e) = console_log::init_with_level(level) {
        leptos::logging::warn!("console logger already installed: {e}");
    }
    leptos::mount::hydrate_body(app::App);
}
