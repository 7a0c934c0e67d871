//! Diagnostics for spine and rhythm analysis
//!
//! Fatal analysis errors and the best-effort wrapper used by lenient parsers.

pub mod errors;

pub use errors::*;
