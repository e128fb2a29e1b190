pub mod optimize;
pub mod resize;
pub mod resolve;
