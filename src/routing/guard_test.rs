use serde_json::json;

use super::*;
use crate::routing::routes::RouteMeta;
use crate::test_support::{Harness, menus_json};

fn table() -> RouteTable {
    RouteTable::new()
        .route("/", RouteMeta::default())
        .route("/secret", RouteMeta::requires("x"))
        .route("/users/:id", RouteMeta::requires("user.view"))
}

#[tokio::test]
async fn server_pass_skips_without_touching_session() {
    let h = Harness::new();
    let guard = RouteGuard::new(&h.config, table(), h.notifier.clone()).with_pass(RenderPass::Server);

    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Skip);
    assert!(h.transport.requests().is_empty());
    assert!(h.notifier.notices().is_empty());
}

#[tokio::test]
async fn authenticated_user_on_login_goes_home() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);

    assert_eq!(guard.run(&h.auth, "/login?next=/secret").await, GuardOutcome::Redirect("/".to_owned()));
    assert!(!guard.menus_loaded());
}

#[tokio::test]
async fn menus_reload_after_visiting_login_while_authenticated() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);
    assert_eq!(guard.run(&h.auth, "/login").await, GuardOutcome::Redirect("/".to_owned()));

    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);

    let menu_loads = h.transport.requests().iter().filter(|r| r.url == "/api/menu-role").count();
    assert_eq!(menu_loads, 2);
    assert!(guard.menus_loaded());
}

#[tokio::test]
async fn public_route_is_allowed_and_resets_latch() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);
    assert!(guard.menus_loaded());

    assert_eq!(guard.run(&h.auth, "/register").await, GuardOutcome::Allow);
    assert!(!guard.menus_loaded());
}

#[tokio::test]
async fn anonymous_user_may_open_public_routes() {
    let h = Harness::new();
    let guard = h.guard(table());

    for route in ["/login", "/login-v2", "/register", "/forgot-password", "/reset-password"] {
        assert_eq!(guard.run(&h.auth, route).await, GuardOutcome::Allow, "{route}");
    }
}

#[tokio::test]
async fn anonymous_user_is_sent_to_login() {
    let h = Harness::new();
    let guard = h.guard(table());

    assert_eq!(guard.run(&h.auth, "/users/7").await, GuardOutcome::Redirect("/login".to_owned()));
    assert!(h.transport.requests().is_empty());
}

#[tokio::test]
async fn menus_load_once_per_authenticated_span() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &["user.view"]));

    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);
    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Allow);
    assert_eq!(guard.run(&h.auth, "/users/9").await, GuardOutcome::Allow);

    let requests = h.transport.requests();
    assert_eq!(requests.len(), 2, "login plus a single menu load");
    assert_eq!(requests[1].url, "/api/menu-role");
    assert_eq!(requests[1].query, vec![("roleId".to_owned(), "3".to_owned())]);
}

#[tokio::test]
async fn missing_permission_redirects_to_logout_with_one_notice() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["y"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);

    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Redirect("/logout".to_owned()));
    assert_eq!(h.notifier.count_titled("Access Denied"), 1);
}

#[tokio::test]
async fn non_empty_permissions_deny_even_on_the_loading_navigation() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["y"], &[]));

    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Redirect("/logout".to_owned()));
}

#[tokio::test]
async fn empty_permissions_pass_only_on_the_loading_navigation() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &json!({"data": []}));

    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Allow);
    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Redirect("/logout".to_owned()));
}

#[tokio::test]
async fn failed_menu_load_still_sets_latch() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(500, &json!({}));

    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);
    assert!(guard.menus_loaded());
    assert_eq!(h.notifier.count_titled("Failed to load menu"), 1);
}

#[tokio::test]
async fn session_restored_from_storage_passes_guard() {
    let first = Harness::new().logged_in().await;
    first.transport.respond(200, &menus_json(&["x"], &[]));
    first.auth.load_auth_menu("3").await;

    let h = Harness::with_storage(first.storage.clone());
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &[]));

    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Allow);
    assert_eq!(h.transport.last_request().header("Authorization"), Some("Bearer T"));
}

#[tokio::test]
async fn logout_resets_latch_and_next_login_reloads_menus() {
    let h = Harness::new().logged_in().await;
    let guard = h.guard(table());
    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/").await, GuardOutcome::Allow);

    h.auth.logout();
    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Redirect("/login".to_owned()));
    assert!(!guard.menus_loaded());

    let h = h.logged_in().await;
    h.transport.respond(200, &menus_json(&["x"], &[]));
    assert_eq!(guard.run(&h.auth, "/secret").await, GuardOutcome::Allow);
    assert_eq!(h.transport.requests().len(), 4);
}
