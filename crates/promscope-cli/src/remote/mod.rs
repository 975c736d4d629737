//! Access to the Prometheus HTTP API.

mod blocking;
mod http;

pub use blocking::BlockingClient;
pub use http::{ClientOptions, PromClient, QueryRange, DEFAULT_URL};
