//! backoffice - admin console client library
//!
//! A shared API client with bearer-token middleware and session handling,
//! plus the product and account submission workflows built on top of it.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;

pub use domain::*;
pub use application::*;
