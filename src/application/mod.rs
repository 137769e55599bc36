//! Application layer managing form workflows and console state.
//!
//! This module coordinates between the domain layer and the API client,
//! turning form input into requests and responses into user-facing state.

pub mod account_form;
pub mod product_form;
pub mod state;

pub use account_form::*;
pub use product_form::*;
pub use state::*;
