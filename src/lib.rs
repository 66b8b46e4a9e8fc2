//! CORS relay library.
//!
//! Replays JSON-described HTTP requests from browser tools against arbitrary
//! target URLs and returns the target's response as JSON.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
