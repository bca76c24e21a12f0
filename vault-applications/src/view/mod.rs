//! Role-scoped view composition

pub mod composer;
pub mod types;

pub use composer::{compose, format_time_ago};
pub use types::*;
