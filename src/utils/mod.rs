//! Generic utility primitives with zero domain knowledge.
//!
//! - `command` - Process execution with stdin input and explicit child env
//! - `io` - File I/O with consistent error handling

pub mod command;
pub mod io;
