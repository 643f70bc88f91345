pub mod core;
pub mod utils;

// Re-export everything from core for ergonomic library use
// Users can write `lbcicd::pipeline` instead of `lbcicd::core::pipeline`
pub use crate::core::*;
pub use crate::utils::*;
