//! Shared library for `CampusRecords`
//!
//! Academic records domain: certificate upload and verification, activity
//! tracking, analytics, notifications, and portfolio export over a generic
//! record store.

pub mod core;
pub mod logger;
pub mod shared;

pub use core::get_version;
pub use shared::*;
