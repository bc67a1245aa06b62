pub mod client;
pub mod envelope;
pub mod http;

pub use client::HttpBackend;
pub use envelope::{decode_list, decode_object};
