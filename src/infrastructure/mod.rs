//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client and its middleware, the session
//! token store, configuration and logging setup.

pub mod config;
pub mod http;
pub mod middleware;
pub mod persistence;
pub mod session;
pub mod telemetry;

pub use config::*;
pub use http::*;
pub use middleware::*;
pub use persistence::*;
pub use session::*;
pub use telemetry::*;
