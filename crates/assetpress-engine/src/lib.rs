//! Resize/transcode engine and responsive variant generation.
//!
//! All canonical-path mutations go through a write-to-temp-then-rename step,
//! so an interrupted run never leaves a half-written file at a path the site
//! serves from.

pub mod backup;
pub mod codec;
pub mod orient;
pub mod replace;
pub mod resize;
pub mod variants;

pub use backup::{BackupGuard, BackupRecord};
pub use resize::resize_in_place;
pub use variants::{VariantConfig, VariantSet, generate_variants};
