use crate::domain::error::HrmError;
use crate::domain::model::{
    AttendanceRequest, DashboardStats, Resource, Store, TimesheetEntry, UserProfile, WorkTask,
};
use crate::state::AppState;
use serde::Serialize;
use std::sync::Arc;

/// A loaded resource, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "resource", content = "data", rename_all = "camelCase")]
pub enum ResourceData {
    CurrentUser(Arc<UserProfile>),
    UserList(Arc<Vec<UserProfile>>),
    StoreList(Arc<Vec<Store>>),
    DashboardStats(Arc<DashboardStats>),
    Timesheet(Arc<Vec<TimesheetEntry>>),
    AttendanceRequests(Arc<Vec<AttendanceRequest>>),
    WorkTasks(Arc<Vec<WorkTask>>),
}

impl ResourceData {
    pub fn resource(&self) -> Resource {
        match self {
            ResourceData::CurrentUser(_) => Resource::CurrentUser,
            ResourceData::UserList(_) => Resource::UserList,
            ResourceData::StoreList(_) => Resource::StoreList,
            ResourceData::DashboardStats(_) => Resource::DashboardStats,
            ResourceData::Timesheet(_) => Resource::Timesheet,
            ResourceData::AttendanceRequests(_) => Resource::AttendanceRequests,
            ResourceData::WorkTasks(_) => Resource::WorkTasks,
        }
    }
}

/// Load one resource through the session cache.
pub async fn load_resource(state: &AppState, resource: Resource) -> Result<ResourceData, HrmError> {
    let cache = &state.cache;
    Ok(match resource {
        Resource::CurrentUser => ResourceData::CurrentUser(cache.current_user().await?),
        Resource::UserList => ResourceData::UserList(cache.user_list().await?),
        Resource::StoreList => ResourceData::StoreList(cache.store_list().await?),
        Resource::DashboardStats => ResourceData::DashboardStats(cache.dashboard_stats().await?),
        Resource::Timesheet => ResourceData::Timesheet(cache.timesheet().await?),
        Resource::AttendanceRequests => {
            ResourceData::AttendanceRequests(cache.attendance_requests().await?)
        }
        Resource::WorkTasks => ResourceData::WorkTasks(cache.work_tasks().await?),
    })
}

/// Drop the cached copy first so the API is asked again.
pub async fn refresh_resource(
    state: &AppState,
    resource: Resource,
) -> Result<ResourceData, HrmError> {
    state.cache.clear_resource(resource);
    load_resource(state, resource).await
}
