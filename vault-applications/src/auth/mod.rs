//! Users, roles and permissions
//!
//! - `identity`: the stored user record and role-derived defaults
//! - `users`: persistence of user records
//! - `permissions`: which role may perform which action
//! - `context`: the explicit role/user context passed to views

pub mod context;
pub mod identity;
pub mod permissions;
pub mod users;

pub use context::ViewContext;
pub use identity::{NewUser, User, UserStats};
pub use permissions::{require, role_can, Action};
pub use users::UserStore;
