// Public modules
pub mod area;
pub mod changelog;
pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod sqlcl;
pub mod wallet;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
