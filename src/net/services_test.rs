use serde_json::json;

use super::*;
use crate::net::transport::Method;
use crate::test_support::Harness;

#[test]
fn body_id_accepts_only_truthy_ids() {
    assert_eq!(body_id(&json!({"id": 7})), Some("7".to_owned()));
    assert_eq!(body_id(&json!({"id": "abc"})), Some("abc".to_owned()));
    assert_eq!(body_id(&json!({"id": 0})), None);
    assert_eq!(body_id(&json!({"id": ""})), None);
    assert_eq!(body_id(&json!({"id": null})), None);
    assert_eq!(body_id(&json!({"name": "x"})), None);
}

#[tokio::test]
async fn crud_verbs_hit_resource_paths() {
    let h = Harness::new();
    let roles = role_service(h.api.clone());
    for _ in 0..5 {
        h.transport.respond(200, &json!({}));
    }

    roles.retrieve(&[("page", "1")]).await.unwrap();
    roles.retrieve_all(&[]).await.unwrap();
    roles.retrieve_by_id("4").await.unwrap();
    roles.update("4", &json!({"name": "ops"})).await.unwrap();
    roles.destroy("4").await.unwrap();

    let seen: Vec<(Method, String)> = h
        .transport
        .requests()
        .into_iter()
        .map(|r| (r.method, r.url))
        .collect();
    assert_eq!(
        seen,
        vec![
            (Method::Get, "/api/roles".to_owned()),
            (Method::Get, "/api/roles/all".to_owned()),
            (Method::Get, "/api/roles/4".to_owned()),
            (Method::Put, "/api/roles/4".to_owned()),
            (Method::Delete, "/api/roles/4".to_owned()),
        ]
    );
    assert_eq!(h.transport.requests()[0].query, vec![("page".to_owned(), "1".to_owned())]);
}

#[tokio::test]
async fn save_creates_without_id_and_updates_with_one() {
    let h = Harness::new();
    let users = UserService::new(h.api.clone());
    h.transport.respond(201, &json!({"id": 9}));
    h.transport.respond(200, &json!({"id": 9}));

    users.crud.save(&json!({"name": "new"})).await.unwrap();
    users.crud.save(&json!({"id": 9, "name": "renamed"})).await.unwrap();

    let requests = h.transport.requests();
    assert_eq!((requests[0].method, requests[0].url.as_str()), (Method::Post, "/api/user"));
    assert_eq!((requests[1].method, requests[1].url.as_str()), (Method::Put, "/api/user/9"));
}

#[tokio::test]
async fn password_reset_targets_user_endpoint() {
    let h = Harness::new();
    let users = UserService::new(h.api.clone());
    h.transport.respond(200, &json!({}));

    users.reset_password("12", &json!({"password": "pw"})).await.unwrap();

    let req = h.transport.last_request();
    assert_eq!(req.method, Method::Put);
    assert_eq!(req.url, "/api/user/password/reset/12");
}

#[tokio::test]
async fn role_menu_endpoints() {
    let h = Harness::new();
    let menus = MenuService::new(h.api.clone());
    for _ in 0..3 {
        h.transport.respond(200, &json!({"data": []}));
    }

    menus.retrieve_role_menu(&[("roleId", "3")]).await.unwrap();
    menus.retrieve_role_menu_trx(&[("roleId", "3")]).await.unwrap();
    menus.create_bulk_role_menu(&json!({"roleId": 3, "menuIds": [1, 2]})).await.unwrap();

    let urls: Vec<String> = h.transport.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec!["/api/menu-role", "/api/menu-role/trx", "/api/menu-role/bulk"]);
    assert_eq!(h.transport.last_request().method, Method::Post);
    assert_eq!(menus.crud.base(), MENU_BASE);
}
