//! Bookshelf application library
//!
//! The books module (validation, repository, HTTP handlers) and the
//! bootstrap that wires it to storage and the HTTP server.

pub mod bootstrap;
pub mod modules;

pub use bootstrap::Application;
pub use modules::*;
