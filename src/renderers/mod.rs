//! Output and diagnostic renderings
//!
//! - `info`: per-token spine, track, type and duration tables
//! - `csv`: delimited text output
//! - `summary`: serializable snapshot for JSON and the JS API

pub mod info;
pub mod csv;
pub mod summary;

pub use csv::to_csv;
pub use info::{data_type_info, duration_info, spine_info, track_info};
pub use summary::{to_summary_json, FileSummary, LineSummary, TokenSummary};
