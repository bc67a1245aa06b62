//! Request-coalescing TTL cache for the HRM dashboard API.
//!
//! [`RequestCache`] serves the dashboard's resources (current user, users,
//! stores, stats, timesheet, attendance requests, work tasks) from memory
//! for five minutes and folds concurrent requests for the same resource
//! into one API call.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod presentation;
pub mod state;

pub use domain::error::HrmError;
pub use domain::model::{Identity, Resource};
pub use domain::traits::{ApiRequest, Backend, Clock, SessionStore};
pub use infrastructure::clock::{ManualClock, SystemClock};
pub use infrastructure::storage::{CacheStatus, MemorySessionStore, RequestCache, CACHE_TTL};
