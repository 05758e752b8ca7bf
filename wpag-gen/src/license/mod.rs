//! Edition-based licensing and monthly usage accounting
//!
//! Each edition has a fixed technology allowlist, feature allowlist and
//! monthly article quota. Usage is counted per calendar month and kept in
//! one JSON file per edition under the root folder.

pub mod edition;
pub mod manager;
pub mod messages;
pub mod usage_store;

pub use edition::{Edition, EditionSpec, Quota};
pub use manager::{LicenseManager, UsageStats};
pub use messages::{UpsellNotice, UpsellReason};
pub use usage_store::{UsageRecord, UsageStore};
