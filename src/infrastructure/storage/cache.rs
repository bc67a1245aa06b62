//! Request cache for the dashboard resources.
//!
//! Each resource has one slot holding the last good value and when it was
//! fetched. A miss either joins the fetch already running for the same key
//! or starts one; the check and the registration happen under the slot lock,
//! so two callers can never both decide to fetch. Fetches run on their own
//! task and always deregister themselves when they settle.

use crate::domain::error::HrmError;
use crate::domain::model::{
    AttendanceRequest, DashboardStats, Identity, Resource, Store, TimesheetEntry, UserProfile,
    WorkTask,
};
use crate::domain::traits::{ApiRequest, Backend, Clock, SessionStore};
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::network::envelope::{decode_list, decode_object};
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// How long a fetched value is served without asking the API again.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

type FetchResult<T> = Result<Arc<T>, Arc<HrmError>>;
type SharedFetch<T> = Shared<BoxFuture<'static, FetchResult<T>>>;
type Selector<T> = fn(&Inner) -> &Slot<T>;

/// Snapshot of one resource slot, for status output.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub resource: Resource,
    pub cached: bool,
    pub fresh: bool,
    pub age: Option<Duration>,
    pub in_flight: usize,
}

struct CacheEntry<T> {
    value: Option<Arc<T>>,
    fetched_at: Option<Instant>,
}

impl<T> CacheEntry<T> {
    fn empty() -> Self {
        Self {
            value: None,
            fetched_at: None,
        }
    }

    // Exactly TTL old counts as stale.
    fn fresh(&self, now: Instant) -> Option<Arc<T>> {
        let fetched_at = self.fetched_at?;
        let value = self.value.as_ref()?;
        (now.saturating_duration_since(fetched_at) < CACHE_TTL).then(|| Arc::clone(value))
    }
}

struct InFlight<T> {
    id: u64,
    fetch: SharedFetch<T>,
}

struct SlotState<T> {
    entry: CacheEntry<T>,
    in_flight: HashMap<String, InFlight<T>>,
    /// Bumped on clear; fetches started before that don't write back.
    generation: u64,
    next_id: u64,
}

enum Lookup<T> {
    Fresh(Arc<T>),
    Pending(SharedFetch<T>),
}

struct Slot<T> {
    resource: Resource,
    state: Mutex<SlotState<T>>,
}

impl<T> Slot<T> {
    fn new(resource: Resource) -> Self {
        Self {
            resource,
            state: Mutex::new(SlotState {
                entry: CacheEntry::empty(),
                in_flight: HashMap::new(),
                generation: 0,
                next_id: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh(&self, now: Instant) -> Option<Arc<T>> {
        self.lock().entry.fresh(now)
    }

    /// Serve fresh, join the running fetch for `key`, or register a new one.
    ///
    /// `start` gets the fetch id and generation and must not block.
    fn join_or_start(
        &self,
        key: &str,
        now: Instant,
        start: impl FnOnce(u64, u64) -> SharedFetch<T>,
    ) -> Lookup<T> {
        let mut state = self.lock();

        if let Some(value) = state.entry.fresh(now) {
            return Lookup::Fresh(value);
        }
        if let Some(running) = state.in_flight.get(key) {
            debug!(resource = %self.resource, "joining in-flight fetch");
            return Lookup::Pending(running.fetch.clone());
        }

        let id = state.next_id;
        state.next_id += 1;
        let fetch = start(id, state.generation);
        state.in_flight.insert(
            key.to_string(),
            InFlight {
                id,
                fetch: fetch.clone(),
            },
        );
        debug!(resource = %self.resource, "started fetch");
        Lookup::Pending(fetch)
    }

    fn store(&self, value: Arc<T>, generation: u64, now: Instant) {
        let mut state = self.lock();
        if state.generation != generation {
            debug!(resource = %self.resource, "dropping result of a fetch started before clear");
            return;
        }
        state.entry = CacheEntry {
            value: Some(value),
            fetched_at: Some(now),
        };
    }

    fn finish(&self, key: &str, id: u64) {
        let mut state = self.lock();
        if state.in_flight.get(key).is_some_and(|running| running.id == id) {
            state.in_flight.remove(key);
        }
    }
}

/// Type-erased slot operations used by `clear` and `status`.
trait SlotControl {
    fn clear(&self);
    fn status(&self, now: Instant) -> CacheStatus;
}

impl<T> SlotControl for Slot<T> {
    fn clear(&self) {
        let mut state = self.lock();
        state.entry = CacheEntry::empty();
        state.in_flight.clear();
        state.generation += 1;
    }

    fn status(&self, now: Instant) -> CacheStatus {
        let state = self.lock();
        CacheStatus {
            resource: self.resource,
            cached: state.entry.value.is_some(),
            fresh: state.entry.fresh(now).is_some(),
            age: state
                .entry
                .fetched_at
                .map(|at| now.saturating_duration_since(at)),
            in_flight: state.in_flight.len(),
        }
    }
}

/// Deregisters a fetch when its task ends, however it ends.
struct InFlightGuard<T: 'static> {
    inner: Arc<Inner>,
    select: Selector<T>,
    key: String,
    id: u64,
}

impl<T: 'static> Drop for InFlightGuard<T> {
    fn drop(&mut self) {
        (self.select)(&*self.inner).finish(&self.key, self.id);
    }
}

struct Inner {
    backend: Arc<dyn Backend>,
    session: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    current_user: Slot<UserProfile>,
    user_list: Slot<Vec<UserProfile>>,
    store_list: Slot<Vec<Store>>,
    dashboard_stats: Slot<DashboardStats>,
    timesheet: Slot<Vec<TimesheetEntry>>,
    attendance_requests: Slot<Vec<AttendanceRequest>>,
    work_tasks: Slot<Vec<WorkTask>>,
}

impl Inner {
    fn slot(&self, resource: Resource) -> &dyn SlotControl {
        match resource {
            Resource::CurrentUser => &self.current_user,
            Resource::UserList => &self.user_list,
            Resource::StoreList => &self.store_list,
            Resource::DashboardStats => &self.dashboard_stats,
            Resource::Timesheet => &self.timesheet,
            Resource::AttendanceRequests => &self.attendance_requests,
            Resource::WorkTasks => &self.work_tasks,
        }
    }
}

/// Session-scoped cache in front of the HRM API.
///
/// Cloning is cheap and clones share state. Every fetch of these
/// resources should go through one instance, otherwise concurrent
/// requests can't be coalesced.
#[derive(Clone)]
pub struct RequestCache {
    inner: Arc<Inner>,
}

impl RequestCache {
    pub fn new(
        backend: Arc<dyn Backend>,
        session: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                backend,
                session,
                clock,
                current_user: Slot::new(Resource::CurrentUser),
                user_list: Slot::new(Resource::UserList),
                store_list: Slot::new(Resource::StoreList),
                dashboard_stats: Slot::new(Resource::DashboardStats),
                timesheet: Slot::new(Resource::Timesheet),
                attendance_requests: Slot::new(Resource::AttendanceRequests),
                work_tasks: Slot::new(Resource::WorkTasks),
            }),
        }
    }

    pub fn with_system_clock(backend: Arc<dyn Backend>, session: Arc<dyn SessionStore>) -> Self {
        Self::new(backend, session, Arc::new(SystemClock))
    }

    /// Profile of the logged-in user.
    ///
    /// When the API is unreachable this resolves to the profile stored at
    /// login instead of failing, and that fallback is cached like a real
    /// answer.
    pub async fn current_user(&self) -> Result<Arc<UserProfile>, HrmError> {
        self.load(
            |inner| &inner.current_user,
            |inner| {
                let identity = inner.session.identity().ok_or(HrmError::MissingIdentity)?;
                let key = resource_key(Resource::CurrentUser.action(), &identity.employee_id);
                let fetch = fetch_current_user(
                    Arc::clone(&inner.backend),
                    inner.session.auth_token(),
                    identity,
                );
                Ok((key, fetch))
            },
        )
        .await
    }

    pub async fn user_list(&self) -> Result<Arc<Vec<UserProfile>>, HrmError> {
        self.load_authorized(Resource::UserList, |inner| &inner.user_list, decode_list)
            .await
    }

    pub async fn store_list(&self) -> Result<Arc<Vec<Store>>, HrmError> {
        self.load_authorized(Resource::StoreList, |inner| &inner.store_list, decode_list)
            .await
    }

    pub async fn dashboard_stats(&self) -> Result<Arc<DashboardStats>, HrmError> {
        self.load_authorized(
            Resource::DashboardStats,
            |inner| &inner.dashboard_stats,
            decode_object,
        )
        .await
    }

    pub async fn timesheet(&self) -> Result<Arc<Vec<TimesheetEntry>>, HrmError> {
        self.load_authorized(Resource::Timesheet, |inner| &inner.timesheet, decode_list)
            .await
    }

    pub async fn attendance_requests(&self) -> Result<Arc<Vec<AttendanceRequest>>, HrmError> {
        self.load_authorized(
            Resource::AttendanceRequests,
            |inner| &inner.attendance_requests,
            decode_list,
        )
        .await
    }

    pub async fn work_tasks(&self) -> Result<Arc<Vec<WorkTask>>, HrmError> {
        self.load_authorized(Resource::WorkTasks, |inner| &inner.work_tasks, decode_list)
            .await
    }

    /// Forget everything; used on logout and for forced refreshes.
    ///
    /// Fetches already running are left alone but their results are discarded.
    pub fn clear(&self) {
        for resource in Resource::ALL {
            self.inner.slot(resource).clear();
        }
        debug!("request cache cleared");
    }

    pub fn clear_resource(&self, resource: Resource) {
        self.inner.slot(resource).clear();
        debug!(resource = %resource, "cache entry cleared");
    }

    pub fn status(&self) -> Vec<CacheStatus> {
        let now = self.inner.clock.now();
        Resource::ALL
            .iter()
            .map(|resource| self.inner.slot(*resource).status(now))
            .collect()
    }

    // Token-keyed resources: no fallback, failures go to the caller.
    async fn load_authorized<T>(
        &self,
        resource: Resource,
        select: Selector<T>,
        decode: fn(Value) -> Result<T, HrmError>,
    ) -> Result<Arc<T>, HrmError>
    where
        T: Send + Sync + 'static,
    {
        self.load(select, move |inner| {
            let token = inner
                .session
                .auth_token()
                .ok_or(HrmError::MissingAuthToken)?;
            let key = resource_key(resource.action(), &token_digest(&token));
            let fetch = fetch_authorized(Arc::clone(&inner.backend), resource, token, decode);
            Ok((key, fetch))
        })
        .await
    }

    async fn load<T, P, F>(&self, select: Selector<T>, prepare: P) -> Result<Arc<T>, HrmError>
    where
        T: Send + Sync + 'static,
        P: FnOnce(&Inner) -> Result<(String, F), HrmError>,
        F: Future<Output = Result<T, HrmError>> + Send + 'static,
    {
        let slot = select(&*self.inner);
        if let Some(value) = slot.fresh(self.inner.clock.now()) {
            debug!(resource = %slot.resource, "cache hit");
            return Ok(value);
        }

        let (key, fetch) = prepare(&*self.inner)?;

        let lookup = slot.join_or_start(&key, self.inner.clock.now(), |id, generation| {
            self.spawn_fetch(select, key.clone(), id, generation, fetch)
        });

        match lookup {
            Lookup::Fresh(value) => Ok(value),
            Lookup::Pending(fetch) => fetch
                .await
                .map_err(|source| HrmError::UpstreamFetchFailed {
                    resource: slot.resource.name(),
                    source,
                }),
        }
    }

    fn spawn_fetch<T, F>(
        &self,
        select: Selector<T>,
        key: String,
        id: u64,
        generation: u64,
        fetch: F,
    ) -> SharedFetch<T>
    where
        T: Send + Sync + 'static,
        F: Future<Output = Result<T, HrmError>> + Send + 'static,
    {
        let guard = InFlightGuard {
            inner: Arc::clone(&self.inner),
            select,
            key,
            id,
        };

        let handle = tokio::spawn(async move {
            let result: FetchResult<T> = fetch.await.map(Arc::new).map_err(Arc::new);
            if let Ok(value) = &result {
                let now = guard.inner.clock.now();
                (guard.select)(&*guard.inner).store(Arc::clone(value), generation, now);
            }
            drop(guard);
            result
        });

        handle
            .map(|joined| joined.unwrap_or_else(|e| Err(Arc::new(HrmError::Task(e.to_string())))))
            .boxed()
            .shared()
    }
}

async fn fetch_current_user(
    backend: Arc<dyn Backend>,
    token: Option<String>,
    identity: Identity,
) -> Result<UserProfile, HrmError> {
    let mut request = ApiRequest::get(Resource::CurrentUser.action())
        .param("employeeId", identity.employee_id.clone());
    if let Some(token) = token {
        request = request.token(token);
    }

    let fetched = match backend.call(request).await {
        Ok(value) => decode_object::<UserProfile>(value),
        Err(e) => Err(e),
    };

    match fetched {
        Ok(profile) => Ok(profile),
        Err(e) => {
            warn!(error = %e, "API not available, using stored login profile");
            Ok(identity.to_profile())
        }
    }
}

async fn fetch_authorized<T>(
    backend: Arc<dyn Backend>,
    resource: Resource,
    token: String,
    decode: fn(Value) -> Result<T, HrmError>,
) -> Result<T, HrmError> {
    let request = ApiRequest::get(resource.action()).token(token);
    let result = backend.call(request).await.and_then(decode);
    if let Err(e) = &result {
        error!(resource = %resource, error = %e, "fetch failed");
    }
    result
}

/// Coalescing key: the action plus the parameter that selects the response.
fn resource_key(action: &str, param: &str) -> String {
    format!("{}_{}", action, param)
}

// Tokens stay out of map keys and logs; equal tokens still map to equal keys.
fn token_digest(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
