//! System-level modules
//!
//! Process setup that is not part of the analytics domain: currently the
//! tracing subscriber.

pub mod logging;

pub use logging::init_logging;
