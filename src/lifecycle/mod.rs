//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Init logging → Build relay client → Bind listener
//!
//! Shutdown:
//!     Ctrl+C / SIGTERM (signals.rs) or Shutdown::trigger (shutdown.rs)
//!     → Stop accepting → Finish in-flight relays → Exit
//! ```

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
pub use signals::shutdown_signal;
