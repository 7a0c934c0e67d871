//! JavaScript-facing API
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and serialization wrappers
//! - `types`: result types returned to JavaScript
//! - `core`: document storage and the exported query functions

pub mod helpers;
pub mod types;
pub mod core;

pub use self::core::*;
pub use types::{InfoKind, LoadSummary};
