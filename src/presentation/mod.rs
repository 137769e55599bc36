//! Presentation layer handling terminal UI and user input.
//!
//! This module renders the console forms using ratatui and maps
//! keyboard input onto the application state.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
