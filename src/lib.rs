//! simpletodo CLI library
//!
//! Commands, the controller and the console view. The binary is in
//! `main.rs` and uses this library.

pub mod commands;
pub mod console;
pub mod controller;
mod id;
pub mod output;
pub mod view;

pub use commands::Command;
pub use console::ConsoleView;
pub use controller::TodoController;
pub use view::TodoView;
