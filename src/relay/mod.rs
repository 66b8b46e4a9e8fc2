//! Relay subsystem.
//!
//! # Data Flow
//! ```text
//! inbound JSON body
//!     → types.rs (CommandRequest / TokenRefreshRequest, RouteProfile)
//!     → outbound.rs (headers + body assembly, URL checks)
//!     → client.rs (one reqwest call, no retries)
//!     → response.rs (JSON passthrough or status/reason envelope)
//!     → RelayReply (status + JSON body)
//! ```
//!
//! Every `/auth/*` and `/tools/*` route is the same operation configured by a
//! different [`RouteProfile`].

pub mod client;
pub mod error;
pub mod outbound;
pub mod response;
pub mod types;

pub use client::RelayClient;
pub use error::{RelayError, RelayResult};
pub use outbound::{OutboundBody, OutboundCall};
pub use response::{RelayReply, RelayResponse};
pub use types::{BodyMode, CommandRequest, RouteProfile, TokenRefreshRequest};
