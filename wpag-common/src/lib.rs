//! # WPAG Common Library
//!
//! Shared code for the WordPress auto generator crates:
//! - Error type used across crates
//! - TOML configuration model, loading and atomic writes
//! - Root folder resolution
//! - Calendar period keys for usage accounting

pub mod config;
pub mod error;
pub mod time;

pub use error::{Error, Result};
pub use time::PeriodKey;
