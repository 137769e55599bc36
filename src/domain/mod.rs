pub mod models;
pub mod payload;
pub mod errors;

pub use models::*;
pub use payload::*;
pub use errors::*;
