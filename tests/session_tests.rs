//! File-backed login session.

use hrm_cache::infrastructure::storage::FileSessionStore;
use hrm_cache::SessionStore;
use serde_json::json;
use std::fs;

fn write(path: &std::path::Path, value: serde_json::Value) {
    fs::write(path, serde_json::to_string(&value).unwrap()).unwrap();
}

#[test]
fn reads_token_and_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    write(
        &path,
        json!({
            "authToken": "abc",
            "loggedInUser": { "employeeId": "E1", "fullName": "A" }
        }),
    );

    let store = FileSessionStore::new(&path);
    assert_eq!(store.path(), path.as_path());
    assert_eq!(store.auth_token().as_deref(), Some("abc"));
    let identity = store.identity().unwrap();
    assert_eq!(identity.employee_id, "E1");
    assert_eq!(identity.to_profile().full_name.as_deref(), Some("A"));
}

#[test]
fn legacy_login_id_inside_a_string() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    write(
        &path,
        json!({
            "authToken": "abc",
            "loggedInUser": "{\"loginEmployeeId\":\"E5\"}"
        }),
    );

    let store = FileSessionStore::new(&path);
    assert_eq!(store.identity().unwrap().employee_id, "E5");
}

#[test]
fn missing_file_means_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSessionStore::new(dir.path().join("session.json"));

    assert!(store.auth_token().is_none());
    assert!(store.identity().is_none());
}

#[test]
fn logout_is_seen_on_the_next_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    write(&path, json!({ "authToken": "abc", "loggedInUser": { "employeeId": "E1" } }));

    let store = FileSessionStore::new(&path);
    assert!(store.auth_token().is_some());

    write(&path, json!({}));
    assert!(store.auth_token().is_none());
    assert!(store.identity().is_none());
}

#[test]
fn user_without_an_id_is_no_identity() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    write(&path, json!({ "authToken": "abc", "loggedInUser": { "employeeId": "  " } }));

    let store = FileSessionStore::new(&path);
    assert!(store.identity().is_none());
    assert_eq!(store.auth_token().as_deref(), Some("abc"));
}

#[test]
fn broken_json_is_treated_as_logged_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, "{ not json").unwrap();

    let store = FileSessionStore::new(&path);
    assert!(store.auth_token().is_none());
    assert!(store.identity().is_none());
}
