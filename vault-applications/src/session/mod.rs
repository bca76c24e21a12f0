//! Session Management Module
//!
//! At most one current session per storage scope, plus an append-only
//! history of every session ever started.

pub mod manager;
pub mod types;

pub use manager::SessionManager;
pub use types::*;
