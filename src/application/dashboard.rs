use crate::domain::error::HrmError;
use crate::domain::model::{DashboardStats, Resource, Store, UserProfile};
use crate::state::AppState;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// One dashboard widget: its data, or the error panel shown in its place.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum Panel<T> {
    Ready { data: Arc<T> },
    Failed { error: PanelError },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelError {
    pub message: String,
    /// The session is gone; retrying won't help until the user logs in again.
    pub login_required: bool,
}

impl<T> Panel<T> {
    pub fn data(&self) -> Option<&Arc<T>> {
        match self {
            Panel::Ready { data } => Some(data),
            Panel::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PanelError> {
        match self {
            Panel::Ready { .. } => None,
            Panel::Failed { error } => Some(error),
        }
    }
}

impl<T> From<Result<Arc<T>, HrmError>> for Panel<T> {
    fn from(result: Result<Arc<T>, HrmError>) -> Self {
        match result {
            Ok(data) => Panel::Ready { data },
            Err(e) => Panel::Failed {
                error: PanelError {
                    message: e.to_string(),
                    login_required: e.needs_login(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub user: Panel<UserProfile>,
    pub stats: Panel<DashboardStats>,
    pub stores: Panel<Vec<Store>>,
    pub users: Panel<Vec<UserProfile>>,
}

impl Dashboard {
    pub fn failed_panels(&self) -> usize {
        [
            self.user.error().is_some(),
            self.stats.error().is_some(),
            self.stores.error().is_some(),
            self.users.error().is_some(),
        ]
        .iter()
        .filter(|failed| **failed)
        .count()
    }
}

/// Resources behind the dashboard's panels.
pub const DASHBOARD_RESOURCES: [Resource; 4] = [
    Resource::CurrentUser,
    Resource::DashboardStats,
    Resource::StoreList,
    Resource::UserList,
];

/// Load the home dashboard's panels concurrently.
///
/// A failing panel turns into an error panel; the dashboard itself always loads.
pub async fn load_dashboard(state: &AppState) -> Dashboard {
    let cache = &state.cache;
    let (user, stats, stores, users) = tokio::join!(
        cache.current_user(),
        cache.dashboard_stats(),
        cache.store_list(),
        cache.user_list(),
    );

    let dashboard = Dashboard {
        user: user.into(),
        stats: stats.into(),
        stores: stores.into(),
        users: users.into(),
    };
    info!(failed = dashboard.failed_panels(), "dashboard loaded");
    dashboard
}

/// Drop the panels' cached copies, then load the dashboard again.
pub async fn refresh_dashboard(state: &AppState) -> Dashboard {
    for resource in DASHBOARD_RESOURCES {
        state.cache.clear_resource(resource);
    }
    load_dashboard(state).await
}
