//! Core domain model for assetpress
//!
//! This crate contains:
//! - Domain models (ImageAsset, ImageFormat, usage policy)
//! - Run statistics and the end-of-run report
//! - The shared error type

pub mod asset;
pub mod error;
pub mod format;
pub mod policy;
pub mod stats;

pub use asset::{ImageAsset, VariantDescriptor};
pub use error::{Error, Result};
pub use format::ImageFormat;
pub use policy::UsagePolicy;
pub use stats::{FileOutcome, Report, RunStats, SkipReason};
