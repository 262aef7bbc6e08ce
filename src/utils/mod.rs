// Utility functions
pub mod error;
pub mod pdf;

pub use error::*;
