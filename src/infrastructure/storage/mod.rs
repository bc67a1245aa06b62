pub mod cache;
pub mod session;

pub use cache::{CacheStatus, RequestCache, CACHE_TTL};
pub use session::{FileSessionStore, MemorySessionStore};
