//! Dashboard and single-resource loading on top of the shared cache.

mod common;

use common::{as_backend, MockBackend};
use hrm_cache::application::dashboard::{load_dashboard, refresh_dashboard};
use hrm_cache::application::query::{load_resource, refresh_resource, ResourceData};
use hrm_cache::infrastructure::config::Config;
use hrm_cache::state::AppState;
use hrm_cache::{Identity, ManualClock, MemorySessionStore, RequestCache, Resource};
use serde_json::json;
use std::sync::Arc;

fn app(backend: &Arc<MockBackend>, session: MemorySessionStore) -> AppState {
    let session = Arc::new(session);
    let cache = RequestCache::new(
        as_backend(backend),
        session.clone(),
        Arc::new(ManualClock::new()),
    );
    AppState::with_cache(Config::default(), cache, session)
}

fn logged_in() -> MemorySessionStore {
    MemorySessionStore::logged_in("token-a", Identity::new("E1"))
}

#[tokio::test]
async fn failing_panel_does_not_take_down_the_dashboard() {
    let backend = Arc::new(
        MockBackend::new()
            .respond("getUser", json!({ "employeeId": "E1", "fullName": "A" }))
            .fail("getDashboardStats", "timeout")
            .respond("getStores", json!([{ "storeId": "S1" }]))
            .respond("getUsers", json!([{ "employeeId": "E1" }, { "employeeId": "E2" }])),
    );
    let state = app(&backend, logged_in());

    let dashboard = load_dashboard(&state).await;

    assert_eq!(dashboard.failed_panels(), 1);
    assert_eq!(dashboard.user.data().unwrap().full_name.as_deref(), Some("A"));
    assert_eq!(dashboard.stores.data().unwrap().len(), 1);
    assert_eq!(dashboard.users.data().unwrap().len(), 2);

    let error = dashboard.stats.error().unwrap();
    assert_eq!(error.message, "Failed to fetch dashboard stats: API Error: timeout");
    assert!(!error.login_required);
}

#[tokio::test]
async fn logged_out_dashboard_asks_for_login() {
    let backend = Arc::new(MockBackend::new());
    let state = app(&backend, MemorySessionStore::new());

    let dashboard = load_dashboard(&state).await;

    assert_eq!(dashboard.failed_panels(), 4);
    assert!(dashboard.stats.error().unwrap().login_required);
    assert!(dashboard.user.error().unwrap().login_required);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn dashboard_and_profile_view_share_the_user_fetch() {
    let backend = Arc::new(
        MockBackend::gated()
            .respond("getUser", json!({ "employeeId": "E1" }))
            .respond("getDashboardStats", json!({}))
            .respond("getStores", json!([]))
            .respond("getUsers", json!([])),
    );
    let state = app(&backend, logged_in());

    let release = async {
        // four dashboard panels, the profile view joins the running getUser
        backend.wait_for_calls(4).await;
        backend.open(4);
    };
    let (dashboard, profile, ()) = tokio::join!(
        load_dashboard(&state),
        load_resource(&state, Resource::CurrentUser),
        release
    );

    assert_eq!(dashboard.failed_panels(), 0);
    assert_eq!(backend.calls_for("getUser"), 1);
    match profile.unwrap() {
        ResourceData::CurrentUser(user) => {
            assert!(Arc::ptr_eq(&user, dashboard.user.data().unwrap()))
        }
        other => panic!("unexpected resource: {:?}", other.resource()),
    }
}

#[tokio::test]
async fn refresh_resource_refetches_only_that_resource() {
    let backend = Arc::new(
        MockBackend::new()
            .respond("getStores", json!([]))
            .respond("getWorkTasks", json!([{ "title": "Count stock" }])),
    );
    let state = app(&backend, logged_in());

    load_resource(&state, Resource::StoreList).await.unwrap();
    load_resource(&state, Resource::WorkTasks).await.unwrap();
    let refreshed = refresh_resource(&state, Resource::WorkTasks).await.unwrap();
    load_resource(&state, Resource::StoreList).await.unwrap();

    assert_eq!(refreshed.resource(), Resource::WorkTasks);
    assert_eq!(backend.calls_for("getWorkTasks"), 2);
    assert_eq!(backend.calls_for("getStores"), 1);
}

#[tokio::test]
async fn json_output_tags_the_resource() {
    let backend = Arc::new(MockBackend::new().respond("getDashboardStats", json!({ "totalEmployees": 4 })));
    let state = app(&backend, logged_in());

    let data = load_resource(&state, Resource::DashboardStats).await.unwrap();
    let value = serde_json::to_value(&data).unwrap();

    assert_eq!(value["resource"], "dashboardStats");
    assert_eq!(value["data"]["totalEmployees"], 4);
}

#[tokio::test]
async fn refresh_dashboard_keeps_unrelated_views_cached() {
    let backend = Arc::new(
        MockBackend::new()
            .respond("getUser", json!({ "employeeId": "E1" }))
            .respond("getDashboardStats", json!({}))
            .respond("getStores", json!([]))
            .respond("getUsers", json!([]))
            .respond("getTimesheet", json!([])),
    );
    let state = app(&backend, logged_in());

    load_dashboard(&state).await;
    load_resource(&state, Resource::Timesheet).await.unwrap();
    let dashboard = refresh_dashboard(&state).await;
    load_resource(&state, Resource::Timesheet).await.unwrap();

    assert_eq!(dashboard.failed_panels(), 0);
    for action in ["getUser", "getDashboardStats", "getStores", "getUsers"] {
        assert_eq!(backend.calls_for(action), 2, "{action}");
    }
    assert_eq!(backend.calls_for("getTimesheet"), 1);
}
