//! Request/response models

pub mod prediction;
pub mod upload;

pub use prediction::*;
pub use upload::*;
