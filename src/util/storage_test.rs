use super::*;

#[test]
fn cookie_assignment_sets_path_and_same_site() {
    assert_eq!(
        cookie_assignment("auth_token", "abc", 604_800),
        "auth_token=abc; Max-Age=604800; Path=/; SameSite=Lax"
    );
}

#[test]
fn find_cookie_picks_named_pair() {
    let header = "theme=dark; auth_token=T123; other=1";
    assert_eq!(find_cookie(header, "auth_token"), Some("T123"));
    assert_eq!(find_cookie(header, "theme"), Some("dark"));
}

#[test]
fn find_cookie_ignores_prefix_matches_and_empty_values() {
    assert_eq!(find_cookie("auth_token_old=x", "auth_token"), None);
    assert_eq!(find_cookie("auth_token=", "auth_token"), None);
    assert_eq!(find_cookie("", "auth_token"), None);
}

#[test]
fn memory_storage_round_trips_cookies_and_items() {
    let storage = MemoryStorage::new();
    storage.write_cookie("auth_token", "T", 60);
    storage.write_item("auth", "{}");

    assert_eq!(storage.read_cookie("auth_token").as_deref(), Some("T"));
    assert_eq!(storage.cookie_max_age("auth_token"), Some(60));
    assert_eq!(storage.read_item("auth").as_deref(), Some("{}"));

    storage.remove_cookie("auth_token");
    storage.remove_item("auth");
    assert!(storage.read_cookie("auth_token").is_none());
    assert!(storage.read_item("auth").is_none());
}

#[test]
fn load_json_returns_none_for_malformed_payload() {
    let storage = MemoryStorage::new();
    storage.write_item("auth", "{not json");
    assert!(load_json::<serde_json::Value>(&storage, "auth").is_none());
}

#[test]
fn save_json_then_load_json_preserves_value() {
    let storage = MemoryStorage::new();
    save_json(&storage, "prefs", &vec!["a".to_owned(), "b".to_owned()]);
    let loaded: Vec<String> = load_json(&storage, "prefs").unwrap();
    assert_eq!(loaded, vec!["a", "b"]);
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_storage_is_inert_outside_hydrate() {
    let storage = BrowserStorage;
    storage.write_cookie("auth_token", "T", 60);
    storage.write_item("auth", "{}");
    assert!(storage.read_cookie("auth_token").is_none());
    assert!(storage.read_item("auth").is_none());
}
