use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

// Every payload keeps the fields it does not model in `extra`, the API adds fields freely.

// Ids come back as strings from the new endpoints and as numbers from some legacy ones.
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}

fn opt_id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string or numeric id, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(deserialize_with = "id_string")]
    pub employee_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(
        default,
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub store_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[serde(deserialize_with = "id_string")]
    pub store_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_employees: u64,
    #[serde(default)]
    pub today_schedules: u64,
    #[serde(default)]
    pub pending_requests: u64,
    #[serde(default)]
    pub recent_messages: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_in: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_out: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hours_worked: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRequest {
    #[serde(
        default,
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkTask {
    #[serde(
        default,
        deserialize_with = "opt_id_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The logged-in user as persisted by the login flow.
///
/// Older sessions store the id under `loginEmployeeId`; both spellings are
/// folded into `employee_id` here and nowhere else.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawIdentity")]
pub struct Identity {
    pub employee_id: String,
    /// Everything the login flow stored, used as the offline profile.
    pub snapshot: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawIdentity {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl TryFrom<RawIdentity> for Identity {
    type Error = String;

    fn try_from(raw: RawIdentity) -> Result<Self, Self::Error> {
        let employee_id = ["employeeId", "loginEmployeeId"]
            .iter()
            .find_map(|field| id_field(raw.fields.get(*field)))
            .ok_or_else(|| "no employeeId or loginEmployeeId".to_string())?;

        Ok(Self {
            employee_id,
            snapshot: raw.fields,
        })
    }
}

fn id_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

impl Identity {
    pub fn new(employee_id: impl Into<String>) -> Self {
        let employee_id = employee_id.into();
        let mut snapshot = Map::new();
        snapshot.insert("employeeId".into(), Value::String(employee_id.clone()));
        Self {
            employee_id,
            snapshot,
        }
    }

    /// Best-effort profile built from the stored login data.
    pub fn to_profile(&self) -> UserProfile {
        let mut fields = self.snapshot.clone();
        fields.remove("loginEmployeeId");
        fields.insert(
            "employeeId".into(),
            Value::String(self.employee_id.clone()),
        );

        serde_json::from_value(Value::Object(fields.clone())).unwrap_or_else(|_| UserProfile {
            employee_id: self.employee_id.clone(),
            full_name: None,
            position: None,
            email: None,
            phone: None,
            department: None,
            store_id: None,
            store_name: None,
            extra: fields,
        })
    }
}

/// Resources served through the request cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    CurrentUser,
    UserList,
    StoreList,
    DashboardStats,
    Timesheet,
    AttendanceRequests,
    WorkTasks,
}

impl Resource {
    pub const ALL: [Resource; 7] = [
        Resource::CurrentUser,
        Resource::UserList,
        Resource::StoreList,
        Resource::DashboardStats,
        Resource::Timesheet,
        Resource::AttendanceRequests,
        Resource::WorkTasks,
    ];

    /// Backend action that produces this resource.
    pub fn action(self) -> &'static str {
        match self {
            Resource::CurrentUser => "getUser",
            Resource::UserList => "getUsers",
            Resource::StoreList => "getStores",
            Resource::DashboardStats => "getDashboardStats",
            Resource::Timesheet => "getTimesheet",
            Resource::AttendanceRequests => "getAttendanceRequests",
            Resource::WorkTasks => "getWorkTasks",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Resource::CurrentUser => "current user",
            Resource::UserList => "user list",
            Resource::StoreList => "store list",
            Resource::DashboardStats => "dashboard stats",
            Resource::Timesheet => "timesheet",
            Resource::AttendanceRequests => "attendance requests",
            Resource::WorkTasks => "work tasks",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
