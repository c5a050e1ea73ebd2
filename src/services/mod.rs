//! Service layer
//!
//! Aggregation, capture and snippet rendering shared by the CLI commands.

mod analytics_service;
pub mod capture;
pub mod script;

pub use analytics_service::*;
pub use capture::{CaptureRequest, ClientInfo};
pub use script::{SnippetOptions, render_snippet, write_snippet};
