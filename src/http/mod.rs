//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! Browser request
//!     → request.rs (request ID, tracing span)
//!     → cors.rs (preflight, CORS headers)
//!     → routes.rs (route → RouteProfile → relay)
//!     → response.rs (RelayReply / RelayError → JSON response)
//!     → Send to browser
//! ```

pub mod cors;
pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
