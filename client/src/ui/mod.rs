//! # Console UI
//!
//! - `view`: renders an [`crate::app::AppState`] snapshot as text
//! - `console`: command parsing, stdin reader and the interactive prompt

pub mod console;
pub mod view;

pub use console::{spawn_stdin_reader, Command, ConsolePrompt, HELP};
pub use view::render;
