//! Candidate discovery for the optimization pipeline.

pub mod exclude;
pub mod walker;

pub use exclude::ExcludeList;
pub use walker::{DiscoverOptions, discover};
