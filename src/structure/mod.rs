//! Spine structure and timing analysis
//!
//! [`HumdrumFile`] owns the lines of a document and the tables derived from
//! them. The analysis passes live in their own modules as `impl` blocks on
//! the file:
//!
//! - `spines`: track numbers, spine paths and sub-tracks
//! - `links`: next/previous token links across manipulator lines
//! - `nulls`: non-null resolution for null data tokens
//! - `strands`: strand decomposition
//! - `parameters`: local and global layout parameters
//! - `rhythm`: start times, line durations and barline timing
//! - `timing`: score-level timing queries
//! - `sequence`: filtered per-track token sequences

pub mod file;
pub mod spines;
pub mod links;
pub mod nulls;
pub mod strands;
pub mod parameters;
pub mod rhythm;
pub mod timing;
pub mod sequence;

pub use file::{HumdrumFile, Strand};
pub use sequence::TrackFilter;
