//! Vault Core - shared types, errors, configuration and logging
//!
//! The pieces every layer of the Vault Africa data layer depends on: the
//! [`Role`] model, the [`KeyValueStore`] backend trait, structured errors and
//! the tracing setup.

pub mod config;
pub mod error;
pub mod logging;
pub mod traits;
pub mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use traits::*;
pub use types::*;

// Re-export commonly used external types
pub use tracing;
