//! wpag-gen: technical article generation for WordPress
//!
//! Generates articles through a chat completion API and publishes them
//! over the WordPress REST API. Before anything is generated, candidate
//! topics are screened against titles already on the site and the run is
//! checked against the license edition's entitlements and monthly quota.

pub mod bulk;
pub mod config;
pub mod dedup;
pub mod error;
pub mod generators;
pub mod license;
pub mod orchestrator;
pub mod services;
pub mod types;

pub use crate::bulk::{BulkPublishOutcome, BulkPublishRequest, BulkPublishSummary};
pub use crate::error::{GenError, GenResult};
pub use crate::orchestrator::{
    DenialReason, GenerationOrchestrator, PublishOptions, RunOutcome, RunRequest, RunSummary,
};
pub use crate::types::{Feature, PostStatus, Technology};
